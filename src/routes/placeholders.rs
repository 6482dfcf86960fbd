//! Frontend endpoints that are reserved but not built yet.
//!
//! Each answers 501 with an error body so clients can tell "not built" apart
//! from "no data".

use crate::errors::{AppError, ErrorResponse};

#[utoipa::path(
    get,
    path = "/api/solar-irradience",
    tag = "Reserved",
    responses(
        (status = 501, description = "Not implemented", body = ErrorResponse),
    )
)]
pub async fn get_solar_irradience() -> AppError {
    AppError::NotImplemented("Solar irradiance summary is not implemented".to_string())
}

#[utoipa::path(
    get,
    path = "/api/total-energy-demand",
    tag = "Reserved",
    responses(
        (status = 501, description = "Not implemented", body = ErrorResponse),
    )
)]
pub async fn get_total_energy_demand() -> AppError {
    AppError::NotImplemented("Total energy demand is not implemented".to_string())
}

#[utoipa::path(
    get,
    path = "/api/energy-demand",
    tag = "Reserved",
    responses(
        (status = 501, description = "Not implemented", body = ErrorResponse),
    )
)]
pub async fn get_energy_demand() -> AppError {
    AppError::NotImplemented("Energy demand is not implemented".to_string())
}

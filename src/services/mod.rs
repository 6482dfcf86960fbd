pub mod climate;
pub mod noaa;
pub mod prediction;
pub mod wind;

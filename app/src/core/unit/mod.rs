mod cost;
mod degree_celsius;
mod efficiency;
mod kwh;
mod liquid;
mod mass;

pub use cost::{Cost, PricePerKg};
pub use degree_celsius::DegreeCelsius;
pub use efficiency::EfficiencyIndex;
pub use kwh::KiloWattHours;
pub use liquid::Liters;
pub use mass::{Kilograms, KilogramsPerHour};

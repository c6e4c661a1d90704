pub mod baseline;
pub mod engine;
pub mod oracle;

pub use baseline::BaselineOracle;
pub use engine::ForecastEngine;
pub use oracle::ForecastOracle;

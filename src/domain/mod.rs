pub mod anomaly;
pub mod forecast;
pub mod series;

pub use anomaly::*;
pub use forecast::*;
pub use series::*;

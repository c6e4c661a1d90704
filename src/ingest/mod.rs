pub mod frame;
pub mod normalize;

pub use frame::{Column, Frame};
pub use normalize::normalize;

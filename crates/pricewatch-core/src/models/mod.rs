//! Data models for Pricewatch

mod alert;
mod item;
mod reading;

pub use alert::*;
pub use item::*;
pub use reading::*;

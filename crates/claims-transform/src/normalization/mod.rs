//! Field cleaners for raw claim cells.
//!
//! - **numeric**: billed amount and age parsing
//! - **datetime**: admission/discharge date parsing with day/month fallback

pub mod datetime;
pub mod numeric;

pub use datetime::parse_date;
pub use numeric::{clean_amount, parse_age};

pub mod enums;
pub mod models;
pub mod reports;
pub mod timestamp;

pub use enums::*;
pub use models::*;
pub use reports::*;
pub use timestamp::{format_timestamp, parse_timestamp, TIMESTAMP_FORMAT};

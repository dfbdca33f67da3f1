pub mod config;
pub mod enums;
pub mod escrow;
pub mod record;

pub use config::*;
pub use enums::*;
pub use escrow::*;
pub use record::*;

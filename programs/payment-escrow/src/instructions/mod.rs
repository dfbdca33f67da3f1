pub mod initialize_config;
pub mod lock;
pub mod settle;
pub mod update_config;

pub use initialize_config::*;
pub use lock::*;
pub use settle::*;
pub use update_config::*;

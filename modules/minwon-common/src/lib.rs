pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, IntakeOptions};
pub use error::IntakeError;
pub use types::*;

pub mod config;
pub mod error;
pub mod keywords;
pub mod types;

pub use config::DossierConfig;
pub use error::{DossierError, Result};
pub use types::*;

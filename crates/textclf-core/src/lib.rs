//! textclf Core
//!
//! Types shared across the textclf crates:
//! - Error types and result handling
//! - Request and response bodies of the prediction endpoint

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ErrorResponse, PredictRequest, PredictResponse};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ErrorResponse, PredictRequest, PredictResponse};
}

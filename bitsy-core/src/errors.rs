pub use bitsy_error::{DistroError, DistroResult, HalError, ReadError};

/// Result type alias for CLI-level operations
pub type Result<T> = anyhow::Result<T>;

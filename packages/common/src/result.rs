use crate::error::StoreError;

/// Common Result type alias
pub type StoreResult<T> = Result<T, StoreError>;

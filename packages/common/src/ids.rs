use crate::error::StoreError;

const MAX_ID_LEN: usize = 128;

/// Check that a user or site id is safe to use as a storage path segment.
///
/// Ids are restricted to ASCII alphanumerics, `-` and `_`.
pub fn validate_id(id: &str) -> Result<(), StoreError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

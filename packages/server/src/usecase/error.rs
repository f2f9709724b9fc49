//! UseCase error types.

use thiserror::Error;

use crate::domain::BlobStoreError;

/// File share failures. The frame is dropped; other peers are unaffected.
#[derive(Debug, Error)]
pub enum ShareFileError {
    #[error("File payload is not valid base64: {0}")]
    InvalidPayload(#[from] base64::DecodeError),

    #[error("Failed to store shared file: {0}")]
    Storage(#[from] BlobStoreError),
}

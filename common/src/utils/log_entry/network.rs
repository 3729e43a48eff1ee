use std::io::Error as IOError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkEntry {
    #[error("Failed to bind port: {0}")]
    BindPortError(IOError),
    #[error("Received invalid multipart payload: {0}")]
    InvalidPayload(String),
    #[error("Upload {0} rejected: {1}")]
    UploadRejected(String, String),
}

impl From<NetworkEntry> for String {
    #[inline(always)]
    fn from(value: NetworkEntry) -> Self {
        value.to_string()
    }
}

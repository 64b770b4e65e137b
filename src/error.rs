use thiserror::Error;

/// Failures of the persistent key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("storage I/O failed: {0}")]
  Io(#[from] std::io::Error),
  #[error("storage file is not a JSON object of strings: {0}")]
  Json(#[from] serde_json::Error),
}

/// A remote Data API call that did not produce a usable payload.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("API request failed with status {0}")]
  Status(reqwest::StatusCode),
  #[error("API request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("API response was not valid JSON: {0}")]
  Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum FeedError {
  #[error("No API key saved!")]
  MissingCredential,
  #[error(transparent)]
  Api(#[from] ApiError),
  #[error(transparent)]
  Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum SettingsError {
  #[error("Please enter an API key!")]
  EmptyKey,
  #[error(transparent)]
  Storage(#[from] StorageError),
}

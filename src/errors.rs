use std::path::PathBuf;
use thiserror::Error;

pub type LowerResult<T, E = LowerError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum LowerError {
  #[error("file '{}' not found or not readable", .0.display())]
  FileNotFound(PathBuf),

  #[error("mbstring is required for case folding with encoding '{0}'")]
  ExtensionUnavailable(String),

  #[error("unsupported encoding: '{0}'")]
  UnsupportedEncoding(String),

  #[error("content of '{}' is not valid {encoding}", .path.display())]
  MalformedContent { path: PathBuf, encoding: String },

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("config error: {0}")]
  Config(#[from] toml::de::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("other: {0}")]
  Other(String),
}

impl From<&str> for LowerError {
  fn from(msg: &str) -> Self {
    LowerError::Other(msg.to_owned())
  }
}

#[test]
fn not_found_message_names_the_path() {
  let err = LowerError::FileNotFound(PathBuf::from("/tmp/missing.txt"));
  let msg = err.to_string();
  assert!(msg.contains("/tmp/missing.txt"));
  assert!(msg.contains("not found"));
}

#[test]
fn extension_message_mentions_mbstring() {
  let err = LowerError::ExtensionUnavailable("ISO-8859-1".into());
  assert!(err.to_string().contains("mbstring is required"));
}

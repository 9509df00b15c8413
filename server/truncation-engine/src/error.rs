//! Structured error types for the truncation engine.

use thiserror::Error;

/// Which way an analyze failure should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Prompt too large for the provider; retried at the next truncation level.
  ContextWindowExceeded,
  /// Anything else; surfaced immediately.
  Fatal,
}

/// Failure reported by the injected analyze call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalyzeError {
  #[error("context window exceeded: {provider} returned status {status_code}: {message}")]
  ContextWindowExceeded {
    provider: String,
    status_code: u16,
    message: String,
  },

  #[error("{0}")]
  Fatal(String),
}

impl AnalyzeError {
  pub fn context_window(provider: &str, status_code: u16, message: impl Into<String>) -> Self {
    Self::ContextWindowExceeded {
      provider: provider.to_string(),
      status_code,
      message: message.into(),
    }
  }

  pub fn fatal(msg: impl Into<String>) -> Self {
    Self::Fatal(msg.into())
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::ContextWindowExceeded { .. } => ErrorKind::ContextWindowExceeded,
      Self::Fatal(_) => ErrorKind::Fatal,
    }
  }
}

/// Terminal outcome of progressive truncation.
#[derive(Debug, Error)]
pub enum CoordinatorError {
  /// The model rejected the request for a reason other than its size.
  #[error("analysis failed: {0}")]
  Analyze(#[source] AnalyzeError),

  /// Every truncation level was tried and the prompt still did not fit.
  #[error(
    "diff could not be reduced enough to fit the model context window: \
     exhausted all truncation levels (last error: {last})"
  )]
  Exhausted {
    #[source]
    last: AnalyzeError,
  },
}

/// Errors at the engine's I/O boundary (stdin/stdout, HTTP bodies).
#[derive(Debug, Error)]
pub enum EngineError {
  #[error("validation: {field}: {reason}")]
  Validation { field: String, reason: String },

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io: {0}")]
  Io(#[from] std::io::Error),
}

impl EngineError {
  pub fn validation(field: &str, reason: &str) -> Self {
    Self::Validation {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kinds_are_distinguished() {
    let cw = AnalyzeError::context_window("anthropic", 400, "prompt is too long");
    assert_eq!(cw.kind(), ErrorKind::ContextWindowExceeded);
    assert_eq!(AnalyzeError::fatal("401 unauthorized").kind(), ErrorKind::Fatal);
  }

  #[test]
  fn exhausted_message_is_distinct_from_analyze() {
    let last = AnalyzeError::context_window("openai", 413, "too large");
    let exhausted = CoordinatorError::Exhausted { last }.to_string();
    assert!(exhausted.contains("could not be reduced enough"));
    assert!(exhausted.contains("openai"));

    let fatal = CoordinatorError::Analyze(AnalyzeError::fatal("rate limited")).to_string();
    assert!(!fatal.contains("could not be reduced"));
    assert!(fatal.contains("rate limited"));
  }
}

//! Engine configuration with sane defaults.

use std::time::Duration;

use crate::prompt::PromptTemplate;

/// Built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
  /// Text wrapped around the diff and documentation when rendering prompts.
  pub prompt: PromptTemplate,
  /// Upper bound on a single analyze call. `None` leaves it to the analyzer.
  pub analyze_timeout: Option<Duration>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      prompt: PromptTemplate::default(),
      analyze_timeout: None,
    }
  }
}

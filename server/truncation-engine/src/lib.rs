//! Release Risk Truncation Engine: fits release diffs into an LLM context window.
//!
//! Classifies changed files by risk, shortens oversized patches at one of four
//! escalating levels, drops linked documentation at the aggressive levels, and
//! retries an injected analyze call until the prompt fits.
//!
//! No network, no DB; the analyze call and source-control fetchers are injected.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod level;
pub mod metadata;
pub mod patch;
pub mod prompt;
pub mod risk;
pub mod source;
pub mod truncate;
pub mod types;

pub use config::Config;
pub use coordinator::{Analysis, Analyzer, Attempt, AttemptOutcome, Coordinator};
pub use error::{AnalyzeError, CoordinatorError, EngineError, ErrorKind};
pub use level::{should_truncate_file, LevelParams, TruncationLevel};
pub use metadata::{combine_metadata, TruncationMetadata};
pub use patch::truncate_patch;
pub use prompt::{PromptInput, PromptTemplate};
pub use risk::{classify_file_risk, FileRiskLevel};
pub use truncate::{truncate_documentation, truncate_multiple_comparisons};
pub use types::{Comparison, Documentation, FileChange, Input, Output};

/// Run one truncation pass on parsed input (no I/O).
pub fn run(input: &Input) -> Output {
  let level = input
    .level
    .as_deref()
    .map(TruncationLevel::from_name)
    .unwrap_or_default();
  let (comparisons, metadata) = truncate_multiple_comparisons(&input.comparisons, level);
  let documentation = truncate_documentation(&input.documentation, level);

  Output {
    level,
    comparisons,
    documentation,
    metadata,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn run_returns_valid_output_shape() {
    let patch: String = (0..120).map(|i| format!("+{}\n", i)).collect();
    let input: Input = serde_json::from_value(serde_json::json!({
      "level": "moderate",
      "comparisons": [
        {
          "repo_url": "https://github.com/acme/api",
          "files": [
            {"filename": "src/auth/jwt.go", "patch": patch},
            {"filename": "src/server.go", "patch": patch}
          ]
        },
        null
      ],
      "documentation": [null]
    }))
    .unwrap();

    let out = run(&input);
    assert_eq!(out.level, TruncationLevel::Moderate);
    assert_eq!(out.comparisons.len(), 2);
    assert_eq!(out.documentation, vec![None]);
    assert_eq!(out.metadata.total_files, 2);
    assert_eq!(out.metadata.truncated_files, vec!["src/server.go"]);
  }

  #[test]
  fn missing_or_unknown_level_means_low() {
    let input: Input = serde_json::from_str(r#"{"comparisons": []}"#).unwrap();
    assert_eq!(run(&input).level, TruncationLevel::Low);

    let input: Input = serde_json::from_str(r#"{"level": "ludicrous"}"#).unwrap();
    assert_eq!(run(&input).level, TruncationLevel::Low);
  }
}

//! Request/response types for the truncation service.

use serde::{Deserialize, Serialize};
use truncation_engine::{Comparison, Documentation, FileRiskLevel, TruncationMetadata};

#[derive(Debug, Deserialize)]
pub struct ClassifyPayload {
  pub files: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ClassifiedFile {
  pub filename: String,
  pub risk: FileRiskLevel,
}

/// Render the prompt for one attempt. With no `level` the data is sent
/// untouched and no truncation notice is included.
#[derive(Debug, Deserialize)]
pub struct PromptPayload {
  #[serde(default)]
  pub comparisons: Vec<Option<Comparison>>,
  #[serde(default)]
  pub documentation: Vec<Option<Documentation>>,
  #[serde(default)]
  pub guidance: String,
  #[serde(default)]
  pub level: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
  pub prompt: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub truncation: Option<TruncationMetadata>,
  /// Markdown warning for the report header, present when files were cut.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub banner: Option<String>,
}

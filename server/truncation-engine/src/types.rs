//! Core types for the truncation engine (JSON contracts + release data models).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::level::TruncationLevel;
use crate::metadata::TruncationMetadata;

// ---------------------------------------------------------------------------
// Source-control data (already fetched by a collaborator)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
  Added,
  #[default]
  Modified,
  #[serde(alias = "removed")]
  Deleted,
  Renamed,
}

/// One file's change within a comparison. `patch` is empty for binary or
/// rename-only changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
  pub filename: String,
  #[serde(default)]
  pub patch: String,
  #[serde(default)]
  pub additions: u32,
  #[serde(default)]
  pub deletions: u32,
  #[serde(default)]
  pub status: FileStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub previous_filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
  pub sha: String,
  #[serde(default)]
  pub message: String,
  #[serde(default)]
  pub author: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
  pub additions: u32,
  pub deletions: u32,
  pub total: u32,
}

/// One repository's code delta for the release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
  pub repo_url: String,
  #[serde(default)]
  pub diff_url: String,
  #[serde(default)]
  pub commits: Vec<Commit>,
  #[serde(default)]
  pub files: Vec<FileChange>,
  #[serde(default)]
  pub stats: Stats,
}

// ---------------------------------------------------------------------------
// Documentation bundles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
  pub url: String,
  #[serde(default)]
  pub default_branch: String,
}

/// Release notes for one repository: the main document plus linked documents.
///
/// `doc_order` lists the keys of `additional_docs` in the order they were
/// discovered; rendering follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documentation {
  pub repository: Repository,
  pub main_doc_file: String,
  pub main_doc_content: String,
  #[serde(default)]
  pub additional_docs: HashMap<String, String>,
  #[serde(default)]
  pub doc_order: Vec<String>,
}

impl Documentation {
  /// Add a linked document, keeping discovery order. Re-adding a name
  /// replaces its content without moving it.
  pub fn push_doc(&mut self, name: impl Into<String>, content: impl Into<String>) {
    let name = name.into();
    if !self.additional_docs.contains_key(&name) {
      self.doc_order.push(name.clone());
    }
    self.additional_docs.insert(name, content.into());
  }

  /// Linked documents in discovery order, each at most once. Names missing
  /// from `doc_order` come last, sorted, so output stays deterministic.
  pub fn ordered_docs(&self) -> Vec<(&str, &str)> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out: Vec<(&str, &str)> = self
      .doc_order
      .iter()
      .filter(|name| seen.insert(name.as_str()))
      .filter_map(|name| {
        self
          .additional_docs
          .get(name)
          .map(|content| (name.as_str(), content.as_str()))
      })
      .collect();

    let mut stragglers: Vec<&String> = self
      .additional_docs
      .keys()
      .filter(|k| !self.doc_order.contains(k))
      .collect();
    stragglers.sort();
    for name in stragglers {
      out.push((name.as_str(), self.additional_docs[name].as_str()));
    }
    out
  }
}

// ---------------------------------------------------------------------------
// stdin/stdout contract
// ---------------------------------------------------------------------------

/// Input: one JSON object. `level` is a level name; unknown names fall back
/// to `low`.
#[derive(Debug, Clone, Deserialize)]
pub struct Input {
  #[serde(default)]
  pub comparisons: Vec<Option<Comparison>>,
  #[serde(default)]
  pub documentation: Vec<Option<Documentation>>,
  #[serde(default)]
  pub level: Option<String>,
}

/// Output: the truncated copies plus combined metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Output {
  pub level: TruncationLevel,
  pub comparisons: Vec<Option<Comparison>>,
  pub documentation: Vec<Option<Documentation>>,
  pub metadata: TruncationMetadata,
}

/// Structured error output for invalid input.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
    }
  }
}

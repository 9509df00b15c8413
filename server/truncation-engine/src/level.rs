//! Truncation levels and their per-level thresholds.

use serde::{Deserialize, Serialize};

use crate::risk::FileRiskLevel;

/// Escalating compression strength, tried in declaration order.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TruncationLevel {
  #[default]
  Low,
  Moderate,
  High,
  Extreme,
}

/// Per-level thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelParams {
  /// Patch lines kept from the top.
  pub keep_start: usize,
  /// Patch lines kept from the bottom.
  pub keep_end: usize,
  /// Patches with fewer lines than this are never truncated.
  pub small_file_threshold: usize,
}

impl TruncationLevel {
  /// Escalation order.
  pub const ALL: [TruncationLevel; 4] = [Self::Low, Self::Moderate, Self::High, Self::Extreme];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Low => "low",
      Self::Moderate => "moderate",
      Self::High => "high",
      Self::Extreme => "extreme",
    }
  }

  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "low" => Some(Self::Low),
      "moderate" | "medium" => Some(Self::Moderate),
      "high" => Some(Self::High),
      "extreme" | "max" => Some(Self::Extreme),
      _ => None,
    }
  }

  /// Parse a level name; anything unrecognized gets `Low`, the level that
  /// keeps the most content.
  pub fn from_name(s: &str) -> Self {
    Self::from_str_loose(s).unwrap_or(Self::Low)
  }

  pub fn params(self) -> LevelParams {
    let (keep_start, keep_end, small_file_threshold) = match self {
      Self::Low => (50, 20, 100),
      Self::Moderate => (20, 10, 75),
      Self::High => (10, 5, 50),
      Self::Extreme => (5, 3, 20),
    };
    LevelParams {
      keep_start,
      keep_end,
      small_file_threshold,
    }
  }

  pub fn next(self) -> Option<Self> {
    match self {
      Self::Low => Some(Self::Moderate),
      Self::Moderate => Some(Self::High),
      Self::High => Some(Self::Extreme),
      Self::Extreme => None,
    }
  }

  /// Linked documentation is dropped from `High` upward.
  pub fn keeps_additional_docs(self) -> bool {
    self < Self::High
  }
}

impl std::fmt::Display for TruncationLevel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Whether a file of this risk tier may be shortened at this level.
/// Critical files are never shortened.
pub fn should_truncate_file(risk: FileRiskLevel, level: TruncationLevel) -> bool {
  match risk {
    FileRiskLevel::Critical => false,
    FileRiskLevel::High => level >= TruncationLevel::High,
    FileRiskLevel::Medium => level >= TruncationLevel::Moderate,
    FileRiskLevel::Low => true,
  }
}

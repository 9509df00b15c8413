//! Truncation metadata: what a pass cut, and how per-comparison results fold together.

use serde::{Deserialize, Serialize};

use crate::level::TruncationLevel;

/// Result of one truncation pass. Invariant:
/// `files_preserved + files_truncated == total_files`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruncationMetadata {
  pub truncated: bool,
  pub level: TruncationLevel,
  pub total_files: usize,
  pub files_preserved: usize,
  pub files_truncated: usize,
  /// Shortened files, in comparison then file order.
  pub truncated_files: Vec<String>,
}

impl TruncationMetadata {
  pub fn new(level: TruncationLevel, total_files: usize, truncated_files: Vec<String>) -> Self {
    let files_truncated = truncated_files.len();
    Self {
      truncated: files_truncated > 0,
      level,
      total_files,
      files_preserved: total_files.saturating_sub(files_truncated),
      files_truncated,
      truncated_files,
    }
  }

  /// Markdown warning block for the report header. `None` when nothing was cut.
  pub fn impact_banner(&self) -> Option<String> {
    if !self.truncated {
      return None;
    }
    let mut out = format!(
      "> **Warning: diff truncated ({} level).** {} of {} files are shown in full; \
       {} were shortened to fit the model's context window. Findings for shortened \
       files may miss changes in the omitted sections.\n",
      self.level, self.files_preserved, self.total_files, self.files_truncated
    );
    if !self.truncated_files.is_empty() {
      out.push_str(">\n> Shortened files:\n");
      for name in &self.truncated_files {
        out.push_str(&format!("> - `{}`\n", name));
      }
    }
    Some(out)
  }
}

/// Fold per-comparison metadata into one value for the whole pass.
///
/// Counts sum, file lists concatenate in input order, `None` entries are
/// skipped. The combined `level` is the pass level.
pub fn combine_metadata(
  level: TruncationLevel,
  items: &[Option<TruncationMetadata>],
) -> TruncationMetadata {
  let mut combined = TruncationMetadata {
    level,
    ..TruncationMetadata::default()
  };
  for item in items.iter().flatten() {
    combined.truncated |= item.truncated;
    combined.total_files += item.total_files;
    combined.files_preserved += item.files_preserved;
    combined.files_truncated += item.files_truncated;
    combined
      .truncated_files
      .extend(item.truncated_files.iter().cloned());
  }
  combined
}

#[cfg(test)]
mod tests {
  use super::*;

  fn meta(total: usize, truncated: &[&str]) -> TruncationMetadata {
    TruncationMetadata::new(
      TruncationLevel::Moderate,
      total,
      truncated.iter().map(|s| s.to_string()).collect(),
    )
  }

  #[test]
  fn combines_counts_and_lists() {
    let combined = combine_metadata(
      TruncationLevel::Moderate,
      &[Some(meta(10, &["a.rs", "b.rs", "c.rs"])), None, Some(meta(5, &[]))],
    );
    assert!(combined.truncated);
    assert_eq!(combined.total_files, 15);
    assert_eq!(combined.files_truncated, 3);
    assert_eq!(combined.files_preserved, 12);
    assert_eq!(combined.truncated_files, vec!["a.rs", "b.rs", "c.rs"]);
  }

  #[test]
  fn only_none_yields_zero_metadata() {
    let combined = combine_metadata(TruncationLevel::High, &[None, None]);
    assert!(!combined.truncated);
    assert_eq!(combined.total_files, 0);
    assert_eq!(combined.files_preserved, 0);
    assert_eq!(combined.files_truncated, 0);
    assert!(combined.truncated_files.is_empty());
    assert_eq!(combined.level, TruncationLevel::High);
  }

  #[test]
  fn banner_only_when_truncated() {
    assert!(meta(4, &[]).impact_banner().is_none());

    let banner = meta(4, &["src/big.rs"]).impact_banner().unwrap();
    assert!(banner.contains("moderate level"));
    assert!(banner.contains("3 of 4 files"));
    assert!(banner.contains("`src/big.rs`"));
  }
}

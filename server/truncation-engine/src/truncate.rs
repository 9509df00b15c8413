//! Truncation passes over comparisons and documentation bundles.
//!
//! Every pass builds new values; inputs are never modified, so independent
//! comparisons can be handed to separate threads.

use crate::level::{should_truncate_file, TruncationLevel};
use crate::metadata::{combine_metadata, TruncationMetadata};
use crate::patch::{count_lines, truncate_patch};
use crate::risk::classify_file_risk;
use crate::types::{Comparison, Documentation, FileChange};

/// Truncate one comparison's patches at `level`.
///
/// Small patches (below the level's threshold) are kept regardless of risk.
/// Larger ones are shortened when their risk tier allows it at this level.
pub fn truncate_comparison(
  comparison: &Comparison,
  level: TruncationLevel,
) -> (Comparison, TruncationMetadata) {
  let params = level.params();
  let mut truncated_files = Vec::new();

  let files: Vec<FileChange> = comparison
    .files
    .iter()
    .map(|file| {
      if count_lines(&file.patch) < params.small_file_threshold {
        return file.clone();
      }
      if !should_truncate_file(classify_file_risk(&file.filename), level) {
        return file.clone();
      }
      let patch = truncate_patch(&file.patch, params.keep_start, params.keep_end);
      if patch != file.patch {
        truncated_files.push(file.filename.clone());
      }
      FileChange {
        patch,
        ..file.clone()
      }
    })
    .collect();

  let metadata = TruncationMetadata::new(level, files.len(), truncated_files);
  let out = Comparison {
    repo_url: comparison.repo_url.clone(),
    diff_url: comparison.diff_url.clone(),
    commits: comparison.commits.clone(),
    files,
    stats: comparison.stats,
  };
  (out, metadata)
}

/// Truncate every comparison at `level` and combine the metadata.
/// `None` entries stay `None` at the same index.
pub fn truncate_multiple_comparisons(
  comparisons: &[Option<Comparison>],
  level: TruncationLevel,
) -> (Vec<Option<Comparison>>, TruncationMetadata) {
  let (out, per_comparison): (Vec<_>, Vec<_>) = comparisons
    .iter()
    .map(|c| match c {
      Some(c) => {
        let (t, m) = truncate_comparison(c, level);
        (Some(t), Some(m))
      }
      None => (None, None),
    })
    .unzip();

  (out, combine_metadata(level, &per_comparison))
}

/// Copy documentation bundles for `level`.
///
/// The main document is always kept. Linked documents are kept below
/// `High` and dropped entirely from `High` upward.
pub fn truncate_documentation(
  docs: &[Option<Documentation>],
  level: TruncationLevel,
) -> Vec<Option<Documentation>> {
  docs
    .iter()
    .map(|d| {
      d.as_ref().map(|d| {
        if level.keeps_additional_docs() {
          d.clone()
        } else {
          Documentation {
            repository: d.repository.clone(),
            main_doc_file: d.main_doc_file.clone(),
            main_doc_content: d.main_doc_content.clone(),
            additional_docs: Default::default(),
            doc_order: Vec::new(),
          }
        }
      })
    })
    .collect()
}

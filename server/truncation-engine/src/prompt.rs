//! Prompt rendering for the analyze call.
//!
//! The template is a plain value owned by `Config`, so tests and callers can
//! swap it without touching global state.

use std::fmt::Write;

use crate::level::TruncationLevel;
use crate::metadata::TruncationMetadata;
use crate::truncate::{truncate_documentation, truncate_multiple_comparisons};
use crate::types::{Comparison, Documentation, FileStatus};

/// Fixed text placed around the rendered release data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
  pub preamble: String,
  pub instructions: String,
}

impl Default for PromptTemplate {
  fn default() -> Self {
    Self {
      preamble: "You are reviewing a proposed software release. Assess the deployment risk \
                 of the changes below using the release notes, linked documentation, and \
                 code diffs."
        .into(),
      instructions: "Respond with a markdown risk report: an overall risk rating \
                     (low/medium/high/critical), the specific changes driving that rating, \
                     recommended pre-deploy checks, and a rollback plan. Cite file names for \
                     every finding."
        .into(),
    }
  }
}

/// Everything that varies between attempts.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
  pub diff: &'a str,
  pub documentation: &'a str,
  pub guidance: &'a str,
  pub truncation: Option<&'a TruncationMetadata>,
}

impl PromptTemplate {
  /// Render the exact text sent to the analyzer.
  pub fn render(&self, input: &PromptInput<'_>) -> String {
    let mut out = String::with_capacity(input.diff.len() + input.documentation.len() + 2048);
    out.push_str(&self.preamble);
    out.push_str("\n\n");

    let guidance = input.guidance.trim();
    if !guidance.is_empty() {
      out.push_str("## Reviewer guidance\n\n");
      out.push_str(guidance);
      out.push_str("\n\n");
    }

    if let Some(meta) = input.truncation {
      out.push_str(&truncation_notice(meta));
      out.push('\n');
    }

    out.push_str("## Documentation\n\n");
    if input.documentation.trim().is_empty() {
      out.push_str("(no documentation provided)\n");
    } else {
      out.push_str(input.documentation);
    }
    out.push('\n');

    out.push_str("## Code changes\n\n");
    if input.diff.trim().is_empty() {
      out.push_str("(no code changes)\n");
    } else {
      out.push_str(input.diff);
    }
    out.push('\n');

    out.push_str(&self.instructions);
    out.push('\n');
    out
  }
}

/// Render the prompt for one attempt. `level == None` sends the data untouched
/// with no truncation notice; otherwise the data is truncated at `level` and
/// the pass metadata is returned alongside the prompt.
pub fn render_attempt(
  template: &PromptTemplate,
  comparisons: &[Option<Comparison>],
  documentation: &[Option<Documentation>],
  guidance: &str,
  level: Option<TruncationLevel>,
) -> (String, Option<TruncationMetadata>) {
  let (diff, docs, truncation) = match level {
    None => (
      format_comparisons(comparisons),
      format_documentation(documentation),
      None,
    ),
    Some(level) => {
      let (comparisons, metadata) = truncate_multiple_comparisons(comparisons, level);
      let documentation = truncate_documentation(documentation, level);
      (
        format_comparisons(&comparisons),
        format_documentation(&documentation),
        Some(metadata),
      )
    }
  };

  let prompt = template.render(&PromptInput {
    diff: &diff,
    documentation: &docs,
    guidance,
    truncation: truncation.as_ref(),
  });
  (prompt, truncation)
}

/// The section telling the model what was cut.
fn truncation_notice(meta: &TruncationMetadata) -> String {
  let mut out = String::from("## Truncation notice\n\n");
  let _ = writeln!(
    out,
    "The input was truncated at the **{}** level to fit the context window. \
     {} of {} files are shown in full; {} were shortened.",
    meta.level, meta.files_preserved, meta.total_files, meta.files_truncated
  );
  let _ = writeln!(
    out,
    "A line of the form `... [TRUNCATED: N lines omitted] ...` marks where N lines \
     were removed from the middle of a patch. Do not assume the omitted lines are \
     harmless; call out any finding that depends on them."
  );
  if !meta.level.keeps_additional_docs() {
    out.push_str("Linked documentation was dropped; only each repository's main release notes remain.\n");
  }
  if !meta.truncated_files.is_empty() {
    out.push_str("\nShortened files:\n");
    for name in &meta.truncated_files {
      let _ = writeln!(out, "- {}", name);
    }
  }
  out
}

/// Render comparisons as markdown. `None` entries are skipped.
pub fn format_comparisons(comparisons: &[Option<Comparison>]) -> String {
  let mut out = String::new();
  for c in comparisons.iter().flatten() {
    let _ = writeln!(out, "### Repository: {}", c.repo_url);
    if !c.diff_url.is_empty() {
      let _ = writeln!(out, "Compare: {}", c.diff_url);
    }
    let _ = writeln!(
      out,
      "Stats: +{} -{} across {} files\n",
      c.stats.additions,
      c.stats.deletions,
      c.files.len()
    );

    if !c.commits.is_empty() {
      out.push_str("#### Commits\n\n");
      for commit in &c.commits {
        let sha: String = commit.sha.chars().take(7).collect();
        let subject = commit.message.lines().next().unwrap_or("");
        if commit.author.is_empty() {
          let _ = writeln!(out, "- {} {}", sha, subject);
        } else {
          let _ = writeln!(out, "- {} {} ({})", sha, subject, commit.author);
        }
      }
      out.push('\n');
    }

    out.push_str("#### Files\n\n");
    for f in &c.files {
      let status = match f.status {
        FileStatus::Added => "added",
        FileStatus::Modified => "modified",
        FileStatus::Deleted => "deleted",
        FileStatus::Renamed => "renamed",
      };
      match &f.previous_filename {
        Some(prev) => {
          let _ = writeln!(
            out,
            "##### {} ({} from {}, +{} -{})",
            f.filename, status, prev, f.additions, f.deletions
          );
        }
        None => {
          let _ = writeln!(
            out,
            "##### {} ({}, +{} -{})",
            f.filename, status, f.additions, f.deletions
          );
        }
      }
      if f.patch.is_empty() {
        out.push_str("(no textual diff)\n\n");
      } else {
        out.push_str("```diff\n");
        out.push_str(&f.patch);
        if !f.patch.ends_with('\n') {
          out.push('\n');
        }
        out.push_str("```\n\n");
      }
    }
  }
  out
}

/// Render documentation bundles as markdown, linked docs in discovery order.
pub fn format_documentation(docs: &[Option<Documentation>]) -> String {
  let mut out = String::new();
  for d in docs.iter().flatten() {
    let _ = writeln!(out, "### {} ({})\n", d.main_doc_file, d.repository.url);
    out.push_str(&d.main_doc_content);
    if !d.main_doc_content.ends_with('\n') {
      out.push('\n');
    }
    out.push('\n');
    for (name, content) in d.ordered_docs() {
      let _ = writeln!(out, "#### Linked: {}\n", name);
      out.push_str(content);
      if !content.ends_with('\n') {
        out.push('\n');
      }
      out.push('\n');
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{Commit, FileChange, Repository};

  #[test]
  fn no_notice_without_metadata() {
    let prompt = PromptTemplate::default().render(&PromptInput {
      diff: "d",
      documentation: "doc",
      guidance: "",
      truncation: None,
    });
    assert!(!prompt.contains("Truncation notice"));
    assert!(!prompt.contains("Reviewer guidance"));
  }

  #[test]
  fn notice_discloses_level_and_counts() {
    let meta = TruncationMetadata::new(TruncationLevel::High, 12, vec!["src/a.rs".into()]);
    let prompt = PromptTemplate::default().render(&PromptInput {
      diff: "d",
      documentation: "",
      guidance: "focus on payments",
      truncation: Some(&meta),
    });
    assert!(prompt.contains("**high** level"));
    assert!(prompt.contains("11 of 12 files"));
    assert!(prompt.contains("[TRUNCATED: N lines omitted]"));
    assert!(prompt.contains("- src/a.rs"));
    assert!(prompt.contains("Linked documentation was dropped"));
    assert!(prompt.contains("focus on payments"));
  }

  #[test]
  fn alternate_template_is_used() {
    let template = PromptTemplate {
      preamble: "PRE".into(),
      instructions: "POST".into(),
    };
    let prompt = template.render(&PromptInput {
      diff: "",
      documentation: "",
      guidance: "",
      truncation: None,
    });
    assert!(prompt.starts_with("PRE\n"));
    assert!(prompt.ends_with("POST\n"));
    assert!(prompt.contains("(no code changes)"));
  }

  #[test]
  fn comparisons_render_commits_and_patches() {
    let c = Comparison {
      repo_url: "https://github.com/acme/api".into(),
      diff_url: String::new(),
      commits: vec![Commit {
        sha: "abcdef1234".into(),
        message: "fix: token refresh\n\nlong body".into(),
        author: "dev".into(),
        date: None,
      }],
      files: vec![
        FileChange {
          filename: "src/a.rs".into(),
          patch: "+x".into(),
          additions: 1,
          deletions: 0,
          status: FileStatus::Modified,
          previous_filename: None,
        },
        FileChange {
          filename: "logo.png".into(),
          patch: String::new(),
          additions: 0,
          deletions: 0,
          status: FileStatus::Added,
          previous_filename: None,
        },
      ],
      ..Comparison::default()
    };
    let text = format_comparisons(&[None, Some(c)]);
    assert!(text.contains("- abcdef1 fix: token refresh (dev)"));
    assert!(text.contains("```diff\n+x\n```"));
    assert!(text.contains("##### logo.png (added, +0 -0)\n(no textual diff)"));
    assert!(!text.contains("long body"));
  }

  #[test]
  fn documentation_follows_doc_order() {
    let mut d = Documentation {
      repository: Repository {
        url: "https://github.com/acme/api".into(),
        default_branch: "main".into(),
      },
      main_doc_file: "RELEASE.md".into(),
      main_doc_content: "main".into(),
      ..Documentation::default()
    };
    d.push_doc("b.md", "B");
    d.push_doc("a.md", "A");
    let text = format_documentation(&[Some(d)]);
    let b = text.find("Linked: b.md").unwrap();
    let a = text.find("Linked: a.md").unwrap();
    assert!(text.starts_with("### RELEASE.md"));
    assert!(b < a);
  }
}

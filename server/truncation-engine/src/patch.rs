//! Line-oriented patch shortening.
//!
//! A line is everything up to and including `\n`. Empty input has zero lines;
//! a final line without `\n` still counts as one. Hunk boundaries are not
//! respected: the report tells the reader middle sections may be cut.

/// Count lines using the rule above.
pub fn count_lines(patch: &str) -> usize {
  patch.split_inclusive('\n').count()
}

/// The marker inserted where lines were removed.
pub fn omission_marker(omitted: usize) -> String {
  format!("... [TRUNCATED: {} lines omitted] ...\n", omitted)
}

/// Keep the first `keep_start` and last `keep_end` lines, joined by one
/// marker line. Patches that already fit are returned unchanged.
pub fn truncate_patch(patch: &str, keep_start: usize, keep_end: usize) -> String {
  let lines: Vec<&str> = patch.split_inclusive('\n').collect();
  let total = lines.len();
  if total <= keep_start.saturating_add(keep_end) {
    return patch.to_string();
  }

  let omitted = total - keep_start - keep_end;
  let head = &lines[..keep_start];
  let tail = &lines[total - keep_end..];

  let mut out = String::with_capacity(patch.len());
  for line in head {
    out.push_str(line);
  }
  out.push_str(&omission_marker(omitted));
  for line in tail {
    out.push_str(line);
  }
  out
}

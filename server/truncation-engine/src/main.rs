//! Binary entrypoint: read one JSON object from stdin, write one to stdout.
//!
//! Input: `{ "comparisons": [...], "documentation": [...], "level": "high" }`.
//! Output: the truncated copies plus combined truncation metadata, or an
//! `ErrorOutput` when the input cannot be parsed.

use std::io::{self, Read, Write};

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use truncation_engine::types::ErrorOutput;
use truncation_engine::{run, EngineError, Input};

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_target(false)
    .with_writer(io::stderr)
    .init();

  if let Err(e) = run_binary() {
    let err = ErrorOutput::new(e.to_string());
    let _ = serde_json::to_writer(io::stdout(), &err);
    let _ = writeln!(io::stdout());
    let _ = writeln!(io::stderr(), "truncation-engine error: {}", e);
    std::process::exit(1);
  }
}

fn run_binary() -> Result<(), EngineError> {
  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  if raw.trim().is_empty() {
    return Err(EngineError::validation("stdin", "expected one JSON object"));
  }
  let input: Input = serde_json::from_str(&raw)?;
  debug!(
    comparisons = input.comparisons.len(),
    documentation = input.documentation.len(),
    "input parsed"
  );

  let out = run(&input);
  info!(
    level = %out.level,
    total_files = out.metadata.total_files,
    files_truncated = out.metadata.files_truncated,
    "truncation pass complete"
  );

  let json = serde_json::to_vec(&out)?;
  let mut stdout = io::stdout().lock();
  stdout.write_all(&json)?;
  stdout.flush()?;
  Ok(())
}

//! HTTP handlers for the truncation service.

use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::{info, warn};
use truncation_engine::prompt::render_attempt;
use truncation_engine::{classify_file_risk, run, Input, Output, TruncationLevel};

use crate::state::AppState;
use crate::types::{ClassifiedFile, ClassifyPayload, PromptPayload, PromptResponse};

pub async fn health() -> &'static str {
  "ok"
}

pub async fn classify(Json(payload): Json<ClassifyPayload>) -> Json<Vec<ClassifiedFile>> {
  let out = payload
    .files
    .into_iter()
    .map(|filename| ClassifiedFile {
      risk: classify_file_risk(&filename),
      filename,
    })
    .collect();
  Json(out)
}

pub async fn truncate(Json(input): Json<Input>) -> Json<Output> {
  warn_unknown_level(input.level.as_deref());
  let out = run(&input);
  info!(
    level = %out.level,
    total_files = out.metadata.total_files,
    files_truncated = out.metadata.files_truncated,
    "truncate"
  );
  Json(out)
}

pub async fn prompt(
  State(state): State<Arc<AppState>>,
  Json(payload): Json<PromptPayload>,
) -> Json<PromptResponse> {
  warn_unknown_level(payload.level.as_deref());
  let level = payload.level.as_deref().map(TruncationLevel::from_name);

  let (prompt, truncation) = render_attempt(
    &state.config.prompt,
    &payload.comparisons,
    &payload.documentation,
    &payload.guidance,
    level,
  );
  let banner = truncation.as_ref().and_then(|m| m.impact_banner());
  info!(
    level = level.map(|l| l.as_str()).unwrap_or("none"),
    prompt_bytes = prompt.len(),
    "prompt"
  );

  Json(PromptResponse {
    prompt,
    truncation,
    banner,
  })
}

fn warn_unknown_level(name: Option<&str>) {
  if let Some(name) = name {
    if TruncationLevel::from_str_loose(name).is_none() {
      warn!(level = name, "unknown truncation level, using low");
    }
  }
}

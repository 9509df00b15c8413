//! Source-control providers, as seen by the engine.
//!
//! Concrete clients (GitHub, GitLab) live with the caller; the engine only
//! needs to pick one per compare URL and gather the results.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

use crate::types::{Comparison, Documentation};

/// Everything fetched for one compare URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseData {
  pub comparison: Option<Comparison>,
  pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
  #[error("no source-control provider recognizes {0}")]
  Unsupported(String),

  #[error("{provider}: fetching {url}: {reason}")]
  Fetch {
    provider: String,
    url: String,
    reason: String,
  },
}

#[async_trait]
pub trait ReleaseSource: Send + Sync {
  fn name(&self) -> &str;

  fn is_compare_url(&self, url: &str) -> bool;

  async fn fetch_release_data(&self, url: &str) -> Result<ReleaseData, SourceError>;
}

/// First provider that claims the URL.
pub fn select_source<'a>(
  url: &str,
  sources: &'a [Arc<dyn ReleaseSource>],
) -> Option<&'a Arc<dyn ReleaseSource>> {
  sources.iter().find(|s| s.is_compare_url(url))
}

/// Fetch every URL on its own task and merge the results.
///
/// Output order matches `urls`. Fails with the first error in URL order;
/// an unrecognized URL fails before anything is fetched.
pub async fn fetch_all(
  urls: &[String],
  sources: &[Arc<dyn ReleaseSource>],
) -> Result<(Vec<Option<Comparison>>, Vec<Option<Documentation>>), SourceError> {
  let mut plan = Vec::with_capacity(urls.len());
  for url in urls {
    let source = select_source(url, sources)
      .ok_or_else(|| SourceError::Unsupported(url.clone()))?
      .clone();
    plan.push((url.clone(), source));
  }

  let merged: Arc<Mutex<Vec<Option<Result<ReleaseData, SourceError>>>>> =
    Arc::new(Mutex::new(vec![None; urls.len()]));
  let mut tasks = JoinSet::new();
  for (idx, (url, source)) in plan.into_iter().enumerate() {
    let merged = merged.clone();
    tasks.spawn(async move {
      let result = source.fetch_release_data(&url).await;
      merged.lock().await[idx] = Some(result);
    });
  }
  while let Some(joined) = tasks.join_next().await {
    if let Err(e) = joined {
      return Err(SourceError::Fetch {
        provider: "task".into(),
        url: String::new(),
        reason: e.to_string(),
      });
    }
  }

  let results = std::mem::take(&mut *merged.lock().await);
  let mut comparisons = Vec::with_capacity(results.len());
  let mut documentation = Vec::with_capacity(results.len());
  for (slot, url) in results.into_iter().zip(urls) {
    let data = slot.ok_or_else(|| SourceError::Fetch {
      provider: "task".into(),
      url: url.clone(),
      reason: "task finished without a result".into(),
    })??;
    comparisons.push(data.comparison);
    documentation.push(data.documentation);
  }
  Ok((comparisons, documentation))
}

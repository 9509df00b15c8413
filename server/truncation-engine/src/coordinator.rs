//! Progressive truncation: retry the analyze call at escalating levels until
//! the prompt fits the model's context window.
//!
//! States: `Attempting(level)` and `Done`. The first attempt sends untouched
//! data (`level == None`). A context-window failure moves to the next level
//! (Low, Moderate, High, Extreme, each at most once); any other failure, or
//! a context-window failure at Extreme, ends the run.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::{AnalyzeError, CoordinatorError, ErrorKind};
use crate::level::TruncationLevel;
use crate::metadata::TruncationMetadata;
use crate::prompt::render_attempt;
use crate::types::{Comparison, Documentation};

/// The LLM call, injected by the caller.
#[async_trait]
pub trait Analyzer: Send + Sync {
  async fn analyze(&self, prompt: &str) -> Result<String, AnalyzeError>;
}

#[async_trait]
impl<T: Analyzer + ?Sized> Analyzer for Arc<T> {
  async fn analyze(&self, prompt: &str) -> Result<String, AnalyzeError> {
    (**self).analyze(prompt).await
  }
}

#[async_trait]
impl<'r, T: Analyzer + ?Sized> Analyzer for &'r T {
  async fn analyze(&self, prompt: &str) -> Result<String, AnalyzeError> {
    (**self).analyze(prompt).await
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
  Succeeded,
  ContextWindowExceeded,
  Failed,
}

/// One analyze call. `level` is `None` for the untruncated first attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
  pub level: Option<TruncationLevel>,
  pub prompt_bytes: usize,
  pub outcome: AttemptOutcome,
}

/// Successful run.
#[derive(Debug, Clone)]
pub struct Analysis {
  pub response: String,
  /// Metadata for the level that succeeded; `None` if no truncation was needed.
  pub truncation: Option<TruncationMetadata>,
  pub attempts: Vec<Attempt>,
}

enum State {
  Attempting(Option<TruncationLevel>),
  Done(Result<Analysis, CoordinatorError>),
}

pub struct Coordinator<'a, A> {
  analyzer: A,
  config: &'a Config,
}

impl<'a, A: Analyzer> Coordinator<'a, A> {
  pub fn new(analyzer: A, config: &'a Config) -> Self {
    Self { analyzer, config }
  }

  /// Analyze the release, truncating progressively on context-window errors.
  pub async fn analyze_with_progressive_truncation(
    &self,
    comparisons: &[Option<Comparison>],
    documentation: &[Option<Documentation>],
    guidance: &str,
  ) -> Result<Analysis, CoordinatorError> {
    let mut attempts = Vec::new();
    let mut state = State::Attempting(None);

    loop {
      state = match state {
        State::Done(result) => return result,
        State::Attempting(level) => {
          let (prompt, truncation) = render_attempt(
            &self.config.prompt,
            comparisons,
            documentation,
            guidance,
            level,
          );
          let result = self.call(&prompt).await;
          let prompt_bytes = prompt.len();

          match result {
            Ok(response) => {
              attempts.push(Attempt {
                level,
                prompt_bytes,
                outcome: AttemptOutcome::Succeeded,
              });
              State::Done(Ok(Analysis {
                response,
                truncation,
                attempts: std::mem::take(&mut attempts),
              }))
            }
            Err(err) if err.kind() == ErrorKind::ContextWindowExceeded => {
              attempts.push(Attempt {
                level,
                prompt_bytes,
                outcome: AttemptOutcome::ContextWindowExceeded,
              });
              match escalate(level) {
                Some(next) => State::Attempting(Some(next)),
                None => State::Done(Err(CoordinatorError::Exhausted { last: err })),
              }
            }
            Err(err) => {
              attempts.push(Attempt {
                level,
                prompt_bytes,
                outcome: AttemptOutcome::Failed,
              });
              State::Done(Err(CoordinatorError::Analyze(err)))
            }
          }
        }
      };
    }
  }

  async fn call(&self, prompt: &str) -> Result<String, AnalyzeError> {
    match self.config.analyze_timeout {
      Some(limit) => tokio::time::timeout(limit, self.analyzer.analyze(prompt))
        .await
        .map_err(|_| AnalyzeError::fatal(format!("analyze timed out after {:?}", limit)))?,
      None => self.analyzer.analyze(prompt).await,
    }
  }
}

/// Next level to try after a context-window failure at `level`.
fn escalate(level: Option<TruncationLevel>) -> Option<TruncationLevel> {
  match level {
    None => Some(TruncationLevel::Low),
    Some(level) => level.next(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Mutex;
  use std::time::Duration;

  struct Scripted {
    replies: Mutex<Vec<Result<String, AnalyzeError>>>,
    prompts: Mutex<Vec<String>>,
  }

  impl Scripted {
    fn new(mut replies: Vec<Result<String, AnalyzeError>>) -> Self {
      replies.reverse();
      Self {
        replies: Mutex::new(replies),
        prompts: Mutex::new(Vec::new()),
      }
    }
  }

  #[async_trait]
  impl Analyzer for Scripted {
    async fn analyze(&self, prompt: &str) -> Result<String, AnalyzeError> {
      self.prompts.lock().unwrap().push(prompt.to_string());
      self
        .replies
        .lock()
        .unwrap()
        .pop()
        .unwrap_or_else(|| Err(AnalyzeError::fatal("script exhausted")))
    }
  }

  fn too_big() -> Result<String, AnalyzeError> {
    Err(AnalyzeError::context_window("anthropic", 400, "prompt is too long"))
  }

  #[test]
  fn escalate_order() {
    assert_eq!(escalate(None), Some(TruncationLevel::Low));
    assert_eq!(escalate(Some(TruncationLevel::High)), Some(TruncationLevel::Extreme));
    assert_eq!(escalate(Some(TruncationLevel::Extreme)), None);
  }

  #[tokio::test]
  async fn first_attempt_success_has_no_metadata() {
    let config = Config::default();
    let analyzer = Scripted::new(vec![Ok("report".into())]);
    let coordinator = Coordinator::new(analyzer, &config);

    let analysis = coordinator
      .analyze_with_progressive_truncation(&[], &[], "")
      .await
      .unwrap();
    assert_eq!(analysis.response, "report");
    assert!(analysis.truncation.is_none());
    assert_eq!(analysis.attempts.len(), 1);
    assert_eq!(analysis.attempts[0].level, None);
  }

  #[tokio::test]
  async fn exhaustion_after_extreme() {
    let config = Config::default();
    let analyzer = Arc::new(Scripted::new(vec![
      too_big(),
      too_big(),
      too_big(),
      too_big(),
      too_big(),
      Ok("never reached".into()),
    ]));
    let coordinator = Coordinator::new(analyzer.clone(), &config);

    let err = coordinator
      .analyze_with_progressive_truncation(&[], &[], "")
      .await
      .unwrap_err();
    assert!(matches!(err, CoordinatorError::Exhausted { .. }));
    assert!(err.to_string().contains("exhausted all truncation levels"));
    // Untruncated + four levels.
    assert_eq!(analyzer.prompts.lock().unwrap().len(), 5);
  }

  struct Slow;

  #[async_trait]
  impl Analyzer for Slow {
    async fn analyze(&self, _prompt: &str) -> Result<String, AnalyzeError> {
      tokio::time::sleep(Duration::from_secs(5)).await;
      Ok("late".into())
    }
  }

  #[tokio::test(start_paused = true)]
  async fn timeout_is_fatal() {
    let config = Config {
      analyze_timeout: Some(Duration::from_millis(50)),
      ..Config::default()
    };
    let coordinator = Coordinator::new(Slow, &config);
    let err = coordinator
      .analyze_with_progressive_truncation(&[], &[], "")
      .await
      .unwrap_err();
    assert!(matches!(err, CoordinatorError::Analyze(AnalyzeError::Fatal(_))));
    assert!(err.to_string().contains("timed out"));
  }
}

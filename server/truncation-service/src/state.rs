//! Shared, read-only service state.

use truncation_engine::Config;

pub struct AppState {
  pub config: Config,
}

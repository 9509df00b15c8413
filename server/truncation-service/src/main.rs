//! Binary entrypoint for the truncation service.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use truncation_engine::Config;
use truncation_service::{router, AppState};

#[derive(Debug, Parser)]
#[command(name = "truncation-service", about = "Internal diff truncation service")]
struct Cli {
  /// Port to listen on.
  #[arg(long, env = "PORT", default_value_t = 5005)]
  port: u16,

  /// Address to bind. Keep this on loopback unless fronted by a proxy.
  #[arg(long, env = "BIND", default_value = "127.0.0.1")]
  bind: IpAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("truncation_service=info,tower_http=info")),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let state = Arc::new(AppState {
    config: Config::default(),
  });
  let app = router(state);

  let addr = SocketAddr::new(cli.bind, cli.port);
  info!("truncation-service listening on http://{}", addr);

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}

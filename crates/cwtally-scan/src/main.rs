//! cwtally: estimate data points ingested per CloudWatch namespace over the
//! last hour.
//!
//! - Lists every metric (paginated), then queries each one's sample count
//! - At most `scan.worker_limit` queries in flight
//! - Report on stdout, logs on stderr (`RUST_LOG`, default `info`)

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use cwtally_scan::{app::App, config, report, source::CloudWatchSource};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cfg = match config::load_or_default(config::DEFAULT_CONFIG_PATH) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    let source = Arc::new(CloudWatchSource::from_env().await);
    let app = App::new(cfg, source);

    match app.run().await {
        Ok(totals) => {
            print!("{}", report::render(&totals));
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "scan aborted, no report");
            ExitCode::FAILURE
        }
    }
}

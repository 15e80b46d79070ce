//! Sieve viewer server binary
//!
//! Serves a workbook as an HTML table with filter, subsheet and download
//! controls.

use clap::Parser;
use sheet_sieve::api::{run_server, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "sieve-server")]
#[command(version)]
#[command(about = "Sieve viewer - browse, filter and download spreadsheet rows over HTTP")]
#[command(long_about = r#"
Sieve viewer - HTTP front end for sieve

Loads the workbook in the background, then serves:
  - GET  /          - Table page with filter, subsheet and download controls
  - POST /filter    - Apply a filter (primary, columns, mode, coerce_falsy)
  - POST /subsheet  - Show a subsheet (empty name = primary sheet)
  - GET  /download  - Download the filter result (?filename=&format=xlsx|csv)
  - GET  /sheets    - Sheet names as JSON
  - GET  /health    - Readiness as JSON

Until the workbook is loaded, operations answer 503.

Example usage:
  sieve-server inventory.xlsx
  sieve-server https://example.com/inventory.xlsx --host 0.0.0.0 --port 3000
"#)]
struct Args {
    /// Workbook path or http(s) URL
    #[arg(env = "SIEVE_SOURCE")]
    source: String,

    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "SIEVE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "SIEVE_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        source: args.source,
    };

    run_server(config).await
}

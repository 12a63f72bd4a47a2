//! Misweb main entry point

use clap::Parser;
use misweb_api::start_server;
use misweb_client::HttpReportSource;
use misweb_config::Config;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "misweb")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight MIS reporting portal with CSV and print export", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = match Config::load(args.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[ERROR] [{}] {}", e.code(), e);
            eprintln!("[ERROR] {}", e.suggestion());
            std::process::exit(1);
        }
    };

    // RUST_LOG still wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.logging.level),
    )
    .init();

    eprintln!(
        "[INFO] Config loaded: upstream={}, timeout={}s",
        config.upstream.base_url, config.upstream.timeout_secs
    );

    let rt = Runtime::new()?;
    rt.block_on(async {
        let source = Arc::new(HttpReportSource::new(
            config.upstream.base_url.clone(),
            Duration::from_secs(config.upstream.timeout_secs),
        ));

        start_server(config, source).await;
    });

    Ok(())
}

use clap::Parser;
use log::{info, warn};
use rentdesk::Provider;
use rentdesk::core::config::{self, CliOverrides, RentDeskConfig};
use rentdesk::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "rentdesk", about = "Phone rental dashboard for the terminal")]
struct Args {
    /// Text-generation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<Provider>,

    /// Model name sent to the provider
    #[arg(short, long)]
    model: Option<String>,

    /// Start without the sample inventory and rental
    #[arg(long)]
    empty: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to rentdesk.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("rentdesk.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("{e}; falling back to defaults");
        RentDeskConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            provider: args.provider,
            model: args.model,
            empty: args.empty,
        },
    );

    info!(
        "RentDesk starting up with provider {:?}, model {}",
        resolved.provider, resolved.model_name
    );

    tui::run(resolved)
}

// Category CLI: Profile Scraper
//
// Scrapes one public profile URL and appends the record to the configured
// output file. Logs go to stderr; the record is printed to stdout.

use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

use profile_scraper::{ChromiumSessionFactory, Config, JsonFileStore, ProfileRecord};

const EXIT_USAGE: u8 = 1;
const EXIT_CONFIG: u8 = 5;

#[derive(Parser)]
#[command(name = "profile-scraper", version, about = "Scrape a public profile page into JSON")]
struct Cli {
    /// Profile URL, e.g. https://www.linkedin.com/in/<profile>
    url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(url) = cli.url else {
        eprintln!("{}", Cli::command().render_usage());
        return ExitCode::from(EXIT_USAGE);
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let factory = ChromiumSessionFactory::new(&config);
    match profile_scraper::run(&config, &factory, &JsonFileStore, &url).await {
        Ok(record) => {
            if print_record(&record) {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(4)
            }
        }
        Err(e) => {
            if let Some(record) = e.record() {
                print_record(record);
            }
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn print_record(record: &ProfileRecord) -> bool {
    match serde_json::to_string_pretty(record) {
        Ok(json) => {
            println!("{json}");
            true
        }
        Err(e) => {
            error!("Failed to render record: {}", e);
            false
        }
    }
}

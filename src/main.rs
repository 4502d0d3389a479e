use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use placescout::{
    configuration::get_configuration,
    startup::{run, ScrapeJob},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Scrape places and their reviews from Google Maps")]
struct Cli {
    /// Search query to run
    #[arg(short, long, default_value = "Gyms in Lahore")]
    search: String,

    /// Number of places to collect
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    total: u32,

    /// Places CSV file
    #[arg(short, long, value_name = "FILE", default_value = "result.csv")]
    output: PathBuf,

    /// Append to the output file instead of overwriting it
    #[arg(long, default_value_t = false)]
    append: bool,

    /// Run the browser without a window
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// WebDriver endpoint, overrides the configured one
    #[arg(long, value_name = "URL")]
    webdriver_url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut configuration = get_configuration().expect("Failed to read configuration.");

    if cli.headless {
        configuration.webdriver.headless = true;
    }
    if let Some(url) = cli.webdriver_url {
        configuration.webdriver.url = url;
    }

    let job = ScrapeJob {
        search: cli.search,
        total: cli.total as usize,
        output: cli.output,
        append: cli.append,
    };

    let places = run(configuration, job).await?;
    log::info!("Done, {} places saved", places.len());

    Ok(())
}

mod models;
mod scrapers;
mod sink;

use anyhow::Result;
use scrapers::{ApartmentsComScraper, ScrapeConfig, Scraper, ZrsApartmentsScraper};
use std::env;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use tracing::{info, Level};

/// Menu label and pipeline argument for each available scraper
const PIPELINES: [(&str, &str); 2] = [
    ("Apartment Scraper", "apartments"),
    ("ZRS Apartments", "zrs"),
];

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = env::args().skip(1);

    match args.next().as_deref() {
        Some("apartments") => {
            init_logging();
            run(ApartmentsComScraper::new(ScrapeConfig::default())?).await
        }
        Some("zrs") => {
            init_logging();
            run(ZrsApartmentsScraper::new(ScrapeConfig::default())?).await
        }
        Some(other) => {
            eprintln!("Unknown scraper '{}'. Expected 'apartments' or 'zrs'.", other);
            std::process::exit(2)
        }
        None => choose_and_spawn(),
    }
}

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

async fn run(scraper: impl Scraper) -> Result<()> {
    info!("🏠 Apartment Scout - {}", scraper.source_name());

    let listings = scraper.scrape().await?;

    info!(
        "✅ Scraping completed: {} listings from {}",
        listings.len(),
        scraper.source_name()
    );
    Ok(())
}

/// Interactive launcher: pick a pipeline, run it as a child process,
/// stream its output, and report how it exited.
fn choose_and_spawn() -> Result<()> {
    println!("Choose a scraper to run:");
    for (index, (name, _)) in PIPELINES.iter().enumerate() {
        println!("{}: {}", index + 1, name);
    }
    print!("Enter the number of the scraper you want to run: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let selection = input
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| PIPELINES.get(index));

    let Some(&(name, pipeline)) = selection else {
        println!("Invalid selection. Please try again.");
        return Ok(());
    };

    println!("Running {}...", name);
    let status = Command::new(env::current_exe()?)
        .arg(pipeline)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    match status.code() {
        Some(code) => println!("{} finished with exit code {}", name, code),
        None => println!("{} was terminated by a signal", name),
    }

    Ok(())
}

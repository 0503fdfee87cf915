// src/bin/feature_report.rs
//
// Prints, per award, the extracted features and the gate a message has to pass
// to be routed to it. Useful when tuning FEATURE_MAX / REQUIRED_FEATURES.

use anyhow::{Context, Result};
use awards_lib::config::CeremonyConfig;
use awards_lib::ingest::fetch_reference_page;
use awards_lib::matching::router::AwardRouter;
use awards_lib::matching::build_award_features;
use awards_lib::models::core::Ceremony;
use awards_lib::utils::env::load_env;
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct ReportArgs {
    /// Read award titles from a file, one per line, instead of scraping
    #[arg(long)]
    titles: Option<PathBuf>,

    /// Ceremony year to scrape (overrides CEREMONY_YEAR)
    #[arg(long)]
    year: Option<i32>,

    /// Features per award (overrides FEATURE_MAX)
    #[arg(long)]
    feature_max: Option<usize>,

    /// Gate size (overrides REQUIRED_FEATURES)
    #[arg(long)]
    required: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    load_env();

    let args = ReportArgs::parse();
    let mut config = CeremonyConfig::from_env();
    if let Some(year) = args.year {
        config.year = year;
    }
    if let Some(feature_max) = args.feature_max {
        config.feature_max = feature_max;
    }
    if let Some(required) = args.required {
        config.required_features = required;
    }

    let mut ceremony = Ceremony::new(config);

    match &args.titles {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read titles from {}", path.display()))?;
            let titles: Vec<String> = raw
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
            info!("Read {} award titles from {}", titles.len(), path.display());
            ceremony.populate(titles, Vec::new());
        }
        None => {
            let page = fetch_reference_page(&ceremony)
                .await
                .context("Failed to scrape the reference page")?;
            ceremony.populate(page.awards, page.hosts);
        }
    }

    build_award_features(&ceremony);

    println!("{}", ceremony);
    println!("{:<60} {:<45} gate", "award", "features");
    for award in &ceremony.awards {
        let router = AwardRouter::new(award, &ceremony.config)?;
        println!(
            "{:<60} {:<45} {}{}",
            award.title,
            award.features().join(" "),
            router.required_features().join(" AND "),
            if router.is_person_award() { "  [person]" } else { "" }
        );
    }

    Ok(())
}

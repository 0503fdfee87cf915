use anyhow::{Context, Result};
use awards_lib::config::CeremonyConfig;
use awards_lib::ingest::{fetch_reference_page, load_corpus, parse_reference_page, MessageCorpus};
use awards_lib::matching::{build_award_features, classify_messages, EntityExtractor};
use awards_lib::models::core::Ceremony;
use awards_lib::synthesis::build_results;
use awards_lib::utils::logging::{PipelineLogger, Stage};
use awards_lib::utils::progress_config::ProgressConfig;
use awards_lib::utils::{env::load_env, instantiate_run::create_initial_run};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ceremony year (overrides CEREMONY_YEAR)
    #[arg(long)]
    year: Option<i32>,

    /// Message corpus file (overrides CORPUS_PATH)
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Parse a saved copy of the reference page instead of fetching it
    #[arg(long)]
    reference_html: Option<PathBuf>,

    /// Space-separated words added to the person-noise filter
    #[arg(long)]
    extra_person_noise: Option<String>,

    /// Print results and run statistics as JSON after the text report
    #[arg(long)]
    json: bool,

    /// Disable progress bars
    #[arg(long)]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    info!("Starting awards inference run");
    load_env();

    let args = Args::parse();

    let mut config = CeremonyConfig::from_env();
    if let Some(year) = args.year {
        config.year = year;
    }
    if let Some(corpus) = args.corpus {
        config.corpus_path = corpus;
    }
    if let Some(extra) = args.extra_person_noise.as_deref() {
        config.add_person_noise_words(extra);
    }
    config.log_config();

    let mut progress_config = ProgressConfig::from_env();
    if args.no_progress {
        progress_config.enabled = false;
    }

    let mut stats = create_initial_run(&config, Some("Awards inference run"));
    let total_start = Instant::now();
    let mut ceremony = Ceremony::new(config);

    // Phase 1: reference page
    let scrape_logger = PipelineLogger::new(Stage::Scrape);
    scrape_logger.log_start(&ceremony.display_name());
    let page = match &args.reference_html {
        Some(path) => {
            let html = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read reference page {}", path.display()))?;
            parse_reference_page(&html, &path.display().to_string(), &ceremony.config)
                .context("Failed to parse saved reference page")?
        }
        None => fetch_reference_page(&ceremony)
            .await
            .context("Failed to scrape the reference page")?,
    };
    ceremony.populate(page.awards, page.hosts);
    stats.total_awards = ceremony.awards.len();
    stats.total_hosts = ceremony.hosts.len();
    stats.scrape_time = scrape_logger.elapsed_secs();
    scrape_logger.log_completion(&format!(
        "{} awards, {} hosts",
        stats.total_awards, stats.total_hosts
    ));

    // Phase 2: message corpus
    let corpus_logger = PipelineLogger::new(Stage::Corpus);
    corpus_logger.log_start(&ceremony.config.corpus_path.display().to_string());
    let messages = load_corpus(&ceremony.config.corpus_path)
        .await
        .context("Failed to load the message corpus")?;
    let corpus = MessageCorpus::from_messages(messages);
    stats.messages_loaded = corpus.loaded_count();
    stats.unique_messages = corpus.len();
    stats.corpus_load_time = corpus_logger.elapsed_secs();
    corpus_logger.log_data_loaded(corpus.len(), "unique messages");
    corpus_logger.log_completion(&format!(
        "{} duplicates removed",
        stats.messages_loaded - stats.unique_messages
    ));

    // Phase 3: award features
    let feature_logger = PipelineLogger::new(Stage::Features);
    feature_logger.log_start(&format!("{} award titles", ceremony.awards.len()));
    let with_features = build_award_features(&ceremony);
    stats.feature_extraction_time = feature_logger.elapsed_secs();
    feature_logger.log_completion(&format!(
        "{} of {} awards have features",
        with_features,
        ceremony.awards.len()
    ));

    // Phase 4: routing and candidate extraction
    let classify_start = Instant::now();
    let extractor = EntityExtractor::default();
    let pb = progress_config.create_bar(ceremony.awards.len() as u64, "Classifying messages");
    let classification = classify_messages(&mut ceremony, &corpus, &extractor, pb.as_ref())
        .context("Failed to classify messages")?;
    if let Some(pb) = &pb {
        pb.finish_with_message("Classification complete");
    }
    stats.matched_messages = classification.matched_messages;
    stats.discarded_messages = classification.discarded_messages;
    stats.extraction_failures = classification.extraction_failures;
    for award in &ceremony.awards {
        let (distinct, mentions) = award.candidate_counts();
        stats.distinct_candidates += distinct;
        stats.candidate_mentions += mentions;
    }
    stats.classification_time = classify_start.elapsed().as_secs_f64();

    // Phase 5: results
    let synthesis_start = Instant::now();
    let results = build_results(&ceremony).context("Failed to build results")?;
    stats.awards_without_winner = results.iter().filter(|r| !r.has_winner()).count();
    stats.synthesis_time = synthesis_start.elapsed().as_secs_f64();
    stats.total_processing_time = total_start.elapsed().as_secs_f64();

    println!("{}", ceremony);
    println!("The host is {}", ceremony.hosts.join(", "));
    println!("----------------------------------");
    for result in &results {
        println!("{}", result);
        println!("----------------------------------");
    }

    if args.json {
        let report = serde_json::json!({
            "ceremony": ceremony.display_name(),
            "hosts": ceremony.hosts,
            "results": results,
            "stats": stats,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize results")?
        );
    }

    info!("=== Run Summary ===");
    info!("Run ID: {}", stats.run_id);
    info!("Awards: {} ({} without a winner)", stats.total_awards, stats.awards_without_winner);
    info!(
        "Messages: {} loaded, {} unique, {} gate matches, {} discarded, {} tagger failures",
        stats.messages_loaded,
        stats.unique_messages,
        stats.matched_messages,
        stats.discarded_messages,
        stats.extraction_failures
    );
    info!(
        "Candidates: {} distinct, {} counted",
        stats.distinct_candidates, stats.candidate_mentions
    );
    info!("=== Timing Breakdown ===");
    info!("Scrape: {:.2}s", stats.scrape_time);
    info!("Corpus load: {:.2}s", stats.corpus_load_time);
    info!("Feature extraction: {:.2}s", stats.feature_extraction_time);
    info!("Classification: {:.2}s", stats.classification_time);
    info!("Synthesis: {:.2}s", stats.synthesis_time);
    info!("Total execution time: {:.2} mins", stats.total_processing_time / 60.0);
    info!("Run completed successfully!");

    Ok(())
}

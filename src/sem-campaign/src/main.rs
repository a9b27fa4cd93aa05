//! SEM campaign planner: synthesizes keywords, scores them and plans
//! search, Performance Max and shopping campaigns within a monthly budget.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sem_core::money::format_currency;
use sem_core::CampaignConfig;
use sem_keywords::{GenerationSummary, KeywordGenerator};
use sem_planner::CampaignBuilder;
use sem_reporting::{Deliverables, ExportManager};
use sem_scoring::{KeywordProcessor, ProcessingSummary};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "sem-campaign")]
#[command(about = "Build SEM keyword, search, PMax and shopping campaign plans")]
#[command(version)]
struct Cli {
    /// Configuration file (YAML, TOML or JSON)
    #[arg(long, default_value = "config.yaml", env = "SEM_CAMPAIGN_CONFIG")]
    config: PathBuf,

    /// Output directory (overrides config)
    #[arg(long)]
    output_dir: Option<String>,

    /// Seed for simulated keyword metrics (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Debug-level logging
    #[arg(long, default_value_t = false)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn init_tracing(cli: &Cli) {
    let default_filter = if cli.verbose {
        "sem_campaign=debug,sem_=debug"
    } else {
        "sem_campaign=info,sem_=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    info!(config = %cli.config.display(), "SEM campaign planner starting");

    let mut config = CampaignConfig::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(dir) = cli.output_dir {
        config.output_settings.directory = dir;
    }
    if let Some(seed) = cli.seed {
        config.generator.seed = seed;
    }

    if !config.validate_budget_allocation() {
        warn!("Continuing with over-allocated channel budgets");
    }
    info!(
        brand = %config.brand.name,
        competitor = %config.competitor.name,
        seed = config.generator.seed,
        total_budget = config.budgets.total_monthly,
        "Configuration loaded"
    );

    let generator = KeywordGenerator::new(&config).context("building keyword generator")?;
    let mut rng = StdRng::seed_from_u64(config.generator.seed);
    let raw_keywords = generator.generate(&mut rng);
    let generation = GenerationSummary::from_records(&raw_keywords);
    info!(
        total = generation.total_keywords,
        avg_volume = generation.avg_volume,
        "Keyword generation complete"
    );

    let processor = KeywordProcessor::new(&config).context("building keyword processor")?;
    let scored = processor.process(&raw_keywords).context("scoring keywords")?;
    let processing = ProcessingSummary::from_scored(&scored);
    info!(
        total = processing.total_processed_keywords,
        "Keyword processing complete"
    );

    let plan = CampaignBuilder::new(&config).build(&scored);

    let exporter = ExportManager::new(&config.output_settings);
    info!(
        dir = %exporter.output_dir().display(),
        formats = ?exporter.formats(),
        "Exporting deliverables"
    );
    let deliverables = Deliverables {
        raw_keywords: &raw_keywords,
        scored_keywords: &scored,
        plan: &plan,
    };
    let files = exporter
        .export_all(&config, &deliverables)
        .context("exporting deliverables")?;

    println!("{}", config.summary());
    println!();
    println!("Keywords generated:  {}", raw_keywords.len());
    println!("Keywords processed:  {}", scored.len());
    println!("Search ad groups:    {} keywords", plan.search.len());
    println!("PMax themes:         {}", plan.pmax.len());
    println!("Shopping categories: {}", plan.shopping.len());
    println!(
        "Projected clicks:    {:.0}",
        plan.search_clicks() + plan.pmax_clicks() + plan.shopping_clicks()
    );
    println!(
        "Projected spend:     {}",
        format_currency(config.budgets.search_ads + config.budgets.pmax_ads + config.budgets.shopping_ads)
    );
    if let Some(top) = processing.top_performing_keywords.first() {
        println!("Top keyword:         {top}");
    }
    println!();
    println!("Exported {} files to {}:", files.len(), exporter.output_dir().display());
    for file in &files {
        println!("  {}", file.display());
    }

    info!(files = files.len(), "SEM campaign planner finished");
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use threatscope_core::{
    extract_freeform, extract_structured, Catalog, ExtractedIntel, IntelFetcher, ThreatActor,
};

#[derive(Parser)]
#[command(name = "tscope", about = "Threat-actor intelligence extraction and cataloging")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract structured actor records from an HTML file or URL
    Extract {
        /// Path to a saved page or report
        file: Option<PathBuf>,
        /// Fetch the page from a URL instead
        #[arg(long)]
        url: Option<String>,
        /// Emit records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the freeform intelligence sweep over prose
    Sweep {
        /// Path to a text file
        file: Option<PathBuf>,
        /// Fetch the text from a URL instead
        #[arg(long)]
        url: Option<String>,
        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// List or search the actor catalog
    List {
        /// Case-insensitive search query
        query: Option<String>,
        /// Merge a JSON record file into the catalog before listing
        #[arg(long)]
        import: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { file, url, json } => {
            let content = load_input(file.as_deref(), url.as_deref()).await?;
            run_extract(&content, json)
        }
        Commands::Sweep { file, url, json } => {
            let content = load_input(file.as_deref(), url.as_deref()).await?;
            run_sweep(&content, url.as_deref(), json)
        }
        Commands::List { query, import } => run_list(query.as_deref(), import.as_deref()).await,
    }
}

async fn load_input(file: Option<&Path>, url: Option<&str>) -> Result<String> {
    match (file, url) {
        (Some(path), _) => {
            tracing::debug!(path = %path.display(), "reading local input");
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))
        }
        (None, Some(url)) => {
            let fetcher = IntelFetcher::new()?;
            Ok(fetcher.fetch_page(url).await?)
        }
        (None, None) => bail!("provide a file path or --url"),
    }
}

fn run_extract(content: &str, json: bool) -> Result<()> {
    let records = extract_structured(content);

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No actor records found.");
        return Ok(());
    }

    for record in &records {
        print_record(record);
    }
    println!("{} record(s) extracted.", records.len());
    Ok(())
}

fn run_sweep(content: &str, source: Option<&str>, json: bool) -> Result<()> {
    let intel = extract_freeform(content, source);

    if json {
        println!("{}", serde_json::to_string_pretty(&intel)?);
        return Ok(());
    }

    print_intel(&intel);
    Ok(())
}

async fn run_list(query: Option<&str>, import: Option<&Path>) -> Result<()> {
    let mut catalog = Catalog::with_seed();

    if let Some(path) = import {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let incoming: Vec<ThreatActor> = serde_json::from_str(&raw)?;
        let report = catalog.import(incoming, &path.display().to_string());
        println!(
            "Imported {} record(s), skipped {} duplicate(s).",
            report.log.imported, report.log.skipped
        );
    }

    let results = catalog.search(query.unwrap_or(""));
    for actor in &results {
        println!(
            "{:<24} {:<12} {:<10} {}",
            actor.name,
            actor.actor_type,
            actor.status,
            actor.origin
        );
    }
    println!("{} actor(s).", results.len());
    Ok(())
}

fn print_record(record: &ThreatActor) {
    println!("{} [{}]", record.name, record.id);
    println!("  type: {}  status: {}  origin: {}", record.actor_type, record.status, record.origin);
    if !record.aliases.is_empty() {
        println!("  aliases: {}", record.aliases.join(", "));
    }
    if !record.malware_used.is_empty() {
        println!("  malware: {}", record.malware_used.join(", "));
    }
    if !record.techniques.is_empty() {
        println!("  techniques: {}", record.techniques.join(", "));
    }
    if !record.description.is_empty() {
        println!("  {}", record.description);
    }
}

fn print_intel(intel: &ExtractedIntel) {
    println!("{} ({} confidence)", intel.actor_name, intel.confidence);
    if !intel.aliases.is_empty() {
        println!("  aliases: {}", intel.aliases.join(", "));
    }
    if !intel.malware.is_empty() {
        println!("  malware: {}", intel.malware.join(", "));
    }
    if !intel.techniques.is_empty() {
        println!("  techniques: {}", intel.techniques.join(", "));
    }
    if !intel.industries.is_empty() {
        println!("  industries: {}", intel.industries.join(", "));
    }
    if !intel.countries.is_empty() {
        println!("  countries: {}", intel.countries.join(", "));
    }
    if !intel.indicators.is_empty() {
        println!("  indicators: {}", intel.indicators.join(", "));
    }
    if !intel.summary.is_empty() {
        println!("  {}", intel.summary);
    }
}

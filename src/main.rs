use clap::Parser;
use log::error;
use std::io;
use tokio::io::{AsyncBufReadExt, BufReader};

use kitchen_finder::{DetailFailure, FinderConfig, HtmlSink, RecipeFinder, TerminalSink};

#[derive(Parser)]
#[command(name = "kitchen-finder")]
#[command(about = "Find recipes for the ingredients in your kitchen", long_about = None)]
struct Cli {
    /// Ingredients to search for, e.g. "eggs, spinach". Reads one query per
    /// line from stdin when omitted.
    ingredients: Vec<String>,

    /// Print the results as an HTML fragment instead of plain text
    #[arg(long)]
    html: bool,

    /// Number of recipes to request
    #[arg(long)]
    limit: Option<u32>,

    /// Show a "details unavailable" card instead of dropping the recipe
    #[arg(long)]
    placeholder_on_missing_details: bool,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = FinderConfig::load()?;

    let mut builder = RecipeFinder::builder().config(&config);
    if let Some(limit) = cli.limit {
        builder = builder.limit(limit);
    }
    if cli.placeholder_on_missing_details {
        builder = builder.detail_failure(DetailFailure::Placeholder);
    }
    let finder = builder.build()?;

    if !cli.ingredients.is_empty() {
        let query = cli.ingredients.join(" ");
        search_once(&finder, &query, cli.html).await;
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        search_once(&finder, &line, cli.html).await;
    }

    Ok(())
}

async fn search_once(finder: &RecipeFinder, query: &str, html: bool) {
    if html {
        let mut sink = HtmlSink::new();
        finder.run(query, &mut sink).await;
        for warning in sink.warnings() {
            eprintln!("Warning: {}", warning);
        }
        println!("{}", sink.document());
    } else {
        let mut sink = TerminalSink::new(io::stdout());
        finder.run(query, &mut sink).await;
    }
}

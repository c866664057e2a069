use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use packlink::{
    ProjectReport, ReferenceLookup, RelationshipResolver, Settings, build_report, load_project,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Folder holding the resource and behavior packs to check
    dir: PathBuf,

    /// Print the merged project and built-in references for a category instead
    #[arg(long)]
    lookup: Option<String>,

    /// Print machine-readable JSON
    #[arg(long)]
    json: bool,

    /// Log resolution details to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(flatten)]
    settings: Settings,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{}", format!("{:#}", e).red());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if Settings::init_global(cli.settings).is_err() {
        tracing::warn!("settings were already initialized");
    }
    let settings = Settings::global();
    let project = load_project(&cli.dir)?;

    if let Some(category) = cli.lookup {
        let lookup = ReferenceLookup::from_settings(settings);
        let Some(references) = lookup.get_lookup(&project, &category).await? else {
            anyhow::bail!("Unknown lookup category {}", category);
        };
        if cli.json {
            println!("{}", serde_json::to_string_pretty(references.as_ref())?);
        } else {
            for reference in references.iter() {
                match &reference.description {
                    Some(description) => {
                        println!("{} {}", reference.id.bold(), description.dimmed())
                    }
                    None => println!("{}", reference.id.bold()),
                }
            }
        }
        return Ok(());
    }

    let resolver = RelationshipResolver::from_settings(settings);
    let report = build_report(&project, &resolver).await?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ProjectReport) {
    for item in &report.items {
        if item.children.is_empty() && item.unfulfilled.is_empty() {
            continue;
        }
        println!("{} {}", item.path.bold(), format!("({})", item.kind).dimmed());
        for child in &item.children {
            println!("  {} {}", "->".green(), child);
        }
        for missing in &item.unfulfilled {
            if missing.is_vanilla_token {
                println!("  {} {} {}", "~".blue(), missing.identifier, "(built-in)".dimmed());
            } else {
                println!("  {} {}", "!".red(), missing.identifier.red());
            }
        }
    }

    let broken = report.broken_count();
    let summary = format!(
        "{} items, {} references resolved, {} unfulfilled, {} broken",
        report.summary.items, report.summary.resolved, report.summary.unfulfilled, broken
    );
    if broken == 0 {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.yellow());
    }
}

//! Symbolic Discovery CLI
//!
//! `sym-discover demo` prints the worked derivations, `sym-discover search`
//! runs the constant-relation matcher over a table.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{debug, info};
use std::path::PathBuf;
use symbolic_discovery_core::loader::load_table;
use symbolic_discovery_core::narrative::{self, PART_COUNT};
use symbolic_discovery_core::search::parse_operator_list;
use symbolic_discovery_core::{
    ConstantMatcher, ConstantTable, DerivationTrace, MatchResult, MatcherConfig,
};

#[derive(Parser)]
#[command(name = "sym-discover")]
#[command(version, about = "Derive connections between formulae and search constant tables")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the worked derivations
    Demo {
        /// Only run this part (1-6)
        #[arg(long)]
        part: Option<u8>,
    },

    /// Search a constant table for a relation to its target
    Search {
        /// Constant table (JSON); the built-in table when omitted
        #[arg(long)]
        table: Option<PathBuf>,

        /// Matcher configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the discovery tolerance
        #[arg(long)]
        tolerance: Option<f64>,

        /// Comma-separated operators, e.g. "mul,sqrt"
        #[arg(long)]
        ops: Option<String>,

        /// Write the match result as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .filter_level(level)
        .init();

    debug!("sym-discover v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Demo { part } => run_demo(part),
        Command::Search {
            table,
            config,
            tolerance,
            ops,
            json,
        } => run_search(table, config, tolerance, ops, json),
    }
}

fn run_demo(part: Option<u8>) -> Result<()> {
    let traces = match part {
        Some(number) => vec![narrative::run_part(number)
            .with_context(|| format!("Part {number} failed"))?],
        None => narrative::run_all().context("Narrative failed")?,
    };

    for (i, trace) in traces.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_trace(trace);
    }
    Ok(())
}

fn print_trace(trace: &DerivationTrace) {
    let part = trace.get_metadata("part").unwrap_or("?");
    println!("--- Part {part}/{PART_COUNT}: {} ---", trace.title);
    for step in &trace.steps {
        match &step.explanation {
            Some(explanation) => println!("{} [{}] {}", step.id, step.operation, explanation),
            None => println!("{} [{}]", step.id, step.operation),
        }
        println!("    {}", step.result);
    }
    if let Some(conclusion) = &trace.conclusion {
        println!("=> {conclusion}");
    }
}

fn run_search(
    table_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    tolerance: Option<f64>,
    ops: Option<String>,
    json: Option<PathBuf>,
) -> Result<()> {
    let table = match &table_path {
        Some(path) => load_table(path)
            .with_context(|| format!("Failed to load table {}", path.display()))?,
        None => ConstantTable::builtin(),
    };

    let mut config = match &config_path {
        Some(path) => MatcherConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MatcherConfig::default(),
    };
    if let Some(tolerance) = tolerance {
        config.tolerance = tolerance;
    }
    if let Some(ops) = ops {
        config.operators = parse_operator_list(&ops)?;
        if config.operators.is_empty() {
            bail!("--ops must name at least one operator");
        }
    }
    info!(
        "table {} ({} constants), {} operators",
        table.id(),
        table.len(),
        config.operators.len()
    );

    let result = ConstantMatcher::new(config)
        .search(&table)
        .context("Constant search failed")?;
    print_match(&result, &table)?;

    if let Some(path) = json {
        result
            .to_json_file(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("wrote match result to {}", path.display());
    }
    Ok(())
}

fn print_match(result: &MatchResult, table: &ConstantTable) -> Result<()> {
    println!(
        "Target {} = {} ({} candidates, tolerance {})",
        result.target, result.target_value, result.candidates_evaluated, result.tolerance
    );

    if result.has_discovery() {
        for found in &result.discoveries {
            println!(
                "Discovery: {} = {} ~ {} (error {:.6})",
                result.target, found.expression, found.value, found.error
            );
        }
    } else {
        println!("No candidate within tolerance");
    }

    match &result.best {
        Some(best) => {
            println!(
                "Best match: {} -> {} (error {:.6})",
                best.candidate, best.expression, best.error
            );
            if let Some(value) = result.best_value_from_references(table)? {
                println!("Re-evaluated: {} = {}", best.expression, value);
            }
        }
        None => println!("No candidates to evaluate"),
    }
    Ok(())
}

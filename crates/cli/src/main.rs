//! U-Stowage scenario CLI

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use u_stowage_cli::{
    Loaded, LogsResponse, PlacementResponse, RetrieveResponse, RunnerConfig, ScenarioParser,
    ScenarioRunner, SearchResponse, SimulateResponse, WasteResponse, WasteView,
};
use u_stowage_core::{format_date, RestorePolicy};
use u_stowage_engine::SearchCriteria;

#[derive(Parser)]
#[command(name = "stowage")]
#[command(about = "Cargo stowage engine driven by JSON scenario files")]
#[command(version)]
struct Cli {
    /// Print JSON responses instead of text
    #[arg(long, global = true)]
    json: bool,

    /// How displaced items are put back after a retrieval
    #[arg(long, value_enum, default_value = "original", global = true)]
    restore_policy: RestorePolicyArg,

    /// Place items in their declared orientation only
    #[arg(long, global = true)]
    no_rotation: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place the scenario's items and print the placements
    Place {
        /// Scenario file (JSON)
        file: PathBuf,
    },

    /// Search for an item by id or name
    Search {
        /// Scenario file (JSON)
        file: PathBuf,

        /// Item ID
        #[arg(short, long)]
        item_id: Option<String>,

        /// Item name (case-insensitive)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Retrieve an item and print the moves needed
    Retrieve {
        /// Scenario file (JSON)
        file: PathBuf,

        /// Item ID
        item_id: String,
    },

    /// Advance the simulated date
    Simulate {
        /// Scenario file (JSON)
        file: PathBuf,

        /// Number of days to advance
        #[arg(short, long, allow_negative_numbers = true)]
        days: i64,
    },

    /// List waste items
    Waste {
        /// Scenario file (JSON)
        file: PathBuf,

        /// Reclaim all waste after listing it
        #[arg(short, long)]
        reclaim: bool,
    },

    /// Print the event log after running the scenario
    Logs {
        /// Scenario file (JSON)
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RestorePolicyArg {
    /// Put displaced items back where they were
    Original,
    /// Re-place displaced items as close to the access face as possible
    Shallowest,
}

impl From<RestorePolicyArg> for RestorePolicy {
    fn from(arg: RestorePolicyArg) -> Self {
        match arg {
            RestorePolicyArg::Original => RestorePolicy::Original,
            RestorePolicyArg::Shallowest => RestorePolicy::Shallowest,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = RunnerConfig::new()
        .with_restore_policy(cli.restore_policy.into())
        .with_rotation(!cli.no_rotation);
    let runner = ScenarioRunner::new(config);

    let file = match &cli.command {
        Commands::Place { file }
        | Commands::Search { file, .. }
        | Commands::Retrieve { file, .. }
        | Commands::Simulate { file, .. }
        | Commands::Waste { file, .. }
        | Commands::Logs { file } => file,
    };
    let scenario = ScenarioParser::new().parse_file(file)?;
    let Loaded {
        mut stowage,
        placement,
    } = runner.load(&scenario)?;

    match cli.command {
        Commands::Place { .. } => {
            let response = PlacementResponse::from(&placement);
            if cli.json {
                print_json(&response)?;
            } else {
                println!(
                    "Placed {} of {} items",
                    placement.placed_count(),
                    placement.placed_count() + placement.failed_count()
                );
                for p in &response.placements {
                    println!(
                        "  {:<12} -> {:<8} at ({}, {}, {}){}",
                        p.item_id,
                        p.container_id,
                        p.position.width,
                        p.position.depth,
                        p.position.height,
                        if p.rotated { " rotated" } else { "" }
                    );
                }
                for f in &response.failed {
                    println!("  {:<12} FAILED: {}", f.item_id, f.reason);
                }
            }
        }

        Commands::Search { item_id, name, .. } => {
            runner.run_steps(&mut stowage, &scenario.steps);
            let criteria = SearchCriteria { item_id, name };
            let response = match stowage.search(&criteria) {
                Ok(hit) => SearchResponse::found(&hit),
                Err(err) => SearchResponse::not_found(err.to_string()),
            };
            if cli.json {
                print_json(&response)?;
            } else if let Some(item) = &response.item {
                println!("{} ({})", item.item_id, item.name);
                match &item.placement {
                    Some(p) => println!(
                        "  in {} at ({}, {}, {}), {} item(s) in the way",
                        p.container_id,
                        p.position.width,
                        p.position.depth,
                        p.position.height,
                        response.retrieval_cost.unwrap_or(0)
                    ),
                    None if item.reclaimed => println!("  reclaimed as waste"),
                    None => println!("  not stowed"),
                }
            } else {
                println!("{}", response.message.unwrap_or_default());
            }
        }

        Commands::Retrieve { item_id, .. } => {
            runner.run_steps(&mut stowage, &scenario.steps);
            let response = match stowage.retrieve(&item_id) {
                Ok(plan) => RetrieveResponse::retrieved(&plan),
                Err(err) => RetrieveResponse::failed(err.to_string()),
            };
            if cli.json {
                print_json(&response)?;
            } else {
                println!("{}", response.message);
                for step in &response.steps {
                    println!("  {:>3}. {:<10} {}", step.step, step.action, step.item_id);
                }
            }
        }

        Commands::Simulate { days, .. } => {
            runner.run_steps(&mut stowage, &scenario.steps);
            let report = stowage.advance_time(days)?;
            let response = SimulateResponse::from(&report);
            if cli.json {
                print_json(&response)?;
            } else {
                println!(
                    "{} -> {}",
                    format_date(report.previous_date),
                    response.new_date
                );
                println!("  expired: {}", response.items_expired.join(", "));
                println!("  waste:   {}", response.waste_items.join(", "));
            }
        }

        Commands::Waste { reclaim, .. } => {
            runner.run_steps(&mut stowage, &scenario.steps);
            let today = stowage.today();
            let waste_items: Vec<WasteView> = stowage
                .identify_waste()
                .into_iter()
                .map(|item| WasteView::new(item, stowage.catalog().placement(item.id()), today))
                .collect();
            let reclaimed = if reclaim {
                stowage
                    .reclaim_all_waste()?
                    .into_iter()
                    .map(|r| r.item_id)
                    .collect()
            } else {
                Vec::new()
            };
            let response = WasteResponse {
                success: true,
                waste_items,
                reclaimed,
            };
            if cli.json {
                print_json(&response)?;
            } else {
                println!("Waste on {}:", format_date(today));
                for w in &response.waste_items {
                    println!("  {:<12} {:<20} {}", w.item_id, w.name, w.reason);
                }
                if !response.reclaimed.is_empty() {
                    println!("Reclaimed: {}", response.reclaimed.join(", "));
                }
            }
        }

        Commands::Logs { .. } => {
            for outcome in runner.run_steps(&mut stowage, &scenario.steps) {
                if let Some(err) = outcome.error {
                    eprintln!("step {:?} failed: {}", outcome.step, err);
                }
            }
            let response = LogsResponse {
                logs: stowage.logs().to_vec(),
            };
            if cli.json {
                print_json(&response)?;
            } else {
                for record in &response.logs {
                    println!(
                        "#{:<4} {} {:<12?} {:<30} {:?}",
                        record.sequence,
                        format_date(record.date),
                        record.kind,
                        record.affected.join(","),
                        record.outcome
                    );
                }
            }
        }
    }

    Ok(())
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

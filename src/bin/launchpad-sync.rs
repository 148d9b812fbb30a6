use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use launchpad_sync::common::config::Config;
use launchpad_sync::common::log;
use launchpad_sync::model::{LaunchpadLayout, LayoutFormat, Placement};
use launchpad_sync::storage::SqliteStore;
use launchpad_sync::sync::{BuildPlan, Comparison, KindSummary, SyncPlan, Synchronizer};
use launchpad_sync::sys::dock::{self, Dock, Shell};
use launchpad_sync::sys::paths;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "launchpad-sync")]
#[command(about = "Build, extract and compare the macOS Launchpad layout")]
struct Cli {
    /// Launchpad database to use instead of the configured or default one
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the Launchpad database using the layout provided
    Build {
        /// The layout file to apply
        config_path: PathBuf,
        /// Print the planned changes without touching the database
        #[arg(long)]
        dry_run: bool,
        /// Do not restart the Dock afterwards
        #[arg(long)]
        no_restart: bool,
        /// Let the Dock recreate its database before building
        #[arg(long)]
        rebuild_db: bool,
    },
    /// Extract the Launchpad database into a layout file
    Extract {
        /// Where to write the layout
        config_path: PathBuf,
        /// The format to extract the layout to
        #[arg(short, long, value_enum)]
        format: Option<LayoutFormat>,
    },
    /// Compare the Launchpad database with a layout file
    Compare {
        /// The layout file to compare against
        config_path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    log::init_logging();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut config = Config::load()?;
    for issue in config.validate() {
        warn!("Config: {}", issue);
    }
    config.auto_fix_values();
    let settings = config.settings;

    let db_path = match cli.db.or(settings.db_path.clone()) {
        Some(path) => path,
        None => paths::launchpad_db_path()?,
    };
    info!("Using Launchpad database {}", db_path.display());

    match cli.command {
        Commands::Build {
            config_path,
            dry_run,
            no_restart,
            rebuild_db,
        } => {
            let layout = read_layout(&config_path)?;
            let mut shell = Dock;

            if (rebuild_db || settings.rebuild_db) && !dry_run {
                let db_dir = db_path.parent().unwrap_or_else(|| Path::new("."));
                dock::rebuild_database(&mut shell, db_dir, settings.restart_delay())?;
            }

            let mut sync = Synchronizer::new(SqliteStore::open(&db_path)?);
            if dry_run {
                let plan = sync.plan(&layout)?;
                print_plan(&plan);
                return Ok(0);
            }

            let report = sync.build(&layout)?;
            print_summary(&report.widgets);
            print_summary(&report.apps);

            if settings.restart_dock && !no_restart {
                shell.restart_dock()?;
            }
            println!(
                "Successfully built the Launchpad layout defined in {}",
                config_path.display()
            );
            Ok(0)
        }
        Commands::Extract { config_path, format } => {
            let mut sync = Synchronizer::new(SqliteStore::open(&db_path)?);
            let layout = sync.extract()?;
            let format = format.unwrap_or(settings.extract_format);
            layout
                .write(&config_path, format)
                .with_context(|| format!("Could not write {}", config_path.display()))?;
            println!("Successfully wrote Launchpad layout to {}", config_path.display());
            Ok(0)
        }
        Commands::Compare { config_path } => {
            let layout = read_layout(&config_path)?;
            let mut sync = Synchronizer::new(SqliteStore::open(&db_path)?);
            match sync.compare(&layout)? {
                Comparison::Equal => {
                    println!("Launchpad matches {}", config_path.display());
                    Ok(0)
                }
                Comparison::Different(difference) => {
                    eprintln!("Launchpad differs from {}", config_path.display());
                    eprintln!("  {}", difference);
                    Ok(1)
                }
            }
        }
    }
}

fn read_layout(path: &Path) -> anyhow::Result<LaunchpadLayout> {
    LaunchpadLayout::read(path).with_context(|| format!("Could not load {}", path.display()))
}

fn print_summary(summary: &KindSummary) {
    println!(
        "{}: {} page(s), {} container(s), {} item(s) placed",
        summary.kind, summary.pages, summary.containers, summary.placed
    );
    if !summary.missing.is_empty() {
        println!("  Uncategorised items added to the last page(s):");
        for title in &summary.missing {
            println!("  - {}", title);
        }
    }
    for title in &summary.unresolved {
        println!("  Unable to find {}, skipped", title);
    }
}

fn print_plan(plan: &SyncPlan) {
    for diagnostic in &plan.diagnostics {
        println!("! {}", diagnostic);
    }
    print_kind_plan(&plan.widgets);
    print_kind_plan(&plan.apps);
    println!("Final container id: {}", plan.end_id());
}

fn print_kind_plan(plan: &BuildPlan) {
    println!("{} (root {}):", plan.kind, plan.root_id);
    for placement in &plan.placements {
        match placement {
            Placement::CreateContainer(c) => println!(
                "  create {} {} parent={} ordering={}{}",
                c.kind,
                c.id,
                c.parent_id,
                c.ordering,
                c.title.as_deref().map(|t| format!(" title={t:?}")).unwrap_or_default()
            ),
            Placement::ReassignItem(i) => println!(
                "  place {:?} ({}) parent={} ordering={}",
                i.title, i.id, i.parent_id, i.ordering
            ),
        }
    }
}

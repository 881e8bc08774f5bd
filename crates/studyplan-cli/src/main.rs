mod config;
mod execute_cmd;
mod plan_cmds;
mod projection_cmds;
mod source;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use uuid::Uuid;

use studyplan_db::{DbConfig, PgPlanStore, pool};

use config::StudyplanConfig;

#[derive(Parser)]
#[command(name = "studyplan", about = "Deterministic daily study-plan allocation")]
struct Cli {
    /// Database URL (overrides STUDYPLAN_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a studyplan config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = DbConfig::DEFAULT_URL)]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create the database if needed and apply migrations
    DbInit,
    /// Compose the plan for a context file and print it (no database)
    Compose {
        /// JSON file holding exactly one planning context
        #[arg(long)]
        context: PathBuf,
    },
    /// Print the canonical SHA-256 of a JSON document
    Hash {
        /// JSON file to hash
        file: PathBuf,
    },
    /// Generate and store the plan for one day
    Generate {
        #[command(flatten)]
        day: DayArgs,
        /// Free-form note stored in the generation log
        #[arg(long)]
        notes: Option<String>,
        /// Plan CICLO profiles and store the advanced rotation cursor
        #[arg(long)]
        cycle_rotation: bool,
    },
    /// Regenerate the plan for one day after a manual change
    Regenerate {
        #[command(flatten)]
        day: DayArgs,
        /// Free-form note stored in the generation log
        #[arg(long)]
        notes: Option<String>,
        /// Plan CICLO profiles and store the advanced rotation cursor
        #[arg(long)]
        cycle_rotation: bool,
    },
    /// Show the stored plan for one day
    Show {
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        date: String,
    },
    /// Record the factual outcome of a day
    Execute {
        #[command(flatten)]
        day: DayArgs,
        /// COMPLETED, PARTIAL, NOT_COMPLETED or REST_DAY
        #[arg(long)]
        status: String,
        /// Minutes actually studied
        #[arg(long)]
        minutes: u32,
        /// Factual summary as a JSON document
        #[arg(long)]
        summary: Option<String>,
    },
    /// Project and cache plans for a date range
    Project {
        /// JSON file holding one planning context per day of the range
        #[arg(long)]
        context: PathBuf,
        #[arg(long)]
        user: Uuid,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },
    /// Show a cached calendar projection
    Projection {
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
}

#[derive(clap::Args)]
struct DayArgs {
    /// JSON file holding the planning context(s)
    #[arg(long)]
    context: PathBuf,
    #[arg(long)]
    user: Uuid,
    /// Day to plan (YYYY-MM-DD)
    #[arg(long)]
    date: String,
}

/// Pretty-print any serializable value to stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Execute the `studyplan init` command: write config file.
fn cmd_init(db_url: &str, force: bool) -> Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_owned(),
        },
    };
    config::save_config_to(&path, &cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!();
    println!("Next: run `studyplan db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `studyplan db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> Result<()> {
    let resolved = StudyplanConfig::resolve(cli_db_url);

    println!("Initializing studyplan database...");
    pool::ensure_database_exists(&resolved.db_config).await?;

    let db_pool = pool::create_pool(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    db_pool.close().await;
    println!("studyplan db-init complete.");
    Ok(())
}

async fn connect(cli_db_url: Option<&str>) -> Result<PgPlanStore> {
    let resolved = StudyplanConfig::resolve(cli_db_url);
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    Ok(PgPlanStore::new(db_pool))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cli_db_url = cli.database_url.as_deref();

    match cli.command {
        Commands::Init { db_url, force } => cmd_init(&db_url, force)?,
        Commands::DbInit => cmd_db_init(cli_db_url).await?,
        Commands::Compose { context } => plan_cmds::run_compose(&context)?,
        Commands::Hash { file } => plan_cmds::run_hash(&file)?,
        Commands::Generate {
            day,
            notes,
            cycle_rotation,
        } => {
            let store = connect(cli_db_url).await?;
            let options = plan_cmds::GenerateOptions {
                notes,
                regenerate: false,
                cycle_rotation,
            };
            let result =
                plan_cmds::run_generate(&store, &day.context, day.user, &day.date, options).await;
            store.pool().close().await;
            result?;
        }
        Commands::Regenerate {
            day,
            notes,
            cycle_rotation,
        } => {
            let store = connect(cli_db_url).await?;
            let options = plan_cmds::GenerateOptions {
                notes,
                regenerate: true,
                cycle_rotation,
            };
            let result =
                plan_cmds::run_generate(&store, &day.context, day.user, &day.date, options).await;
            store.pool().close().await;
            result?;
        }
        Commands::Show { user, date } => {
            let store = connect(cli_db_url).await?;
            let result = plan_cmds::run_show(&store, user, &date).await;
            store.pool().close().await;
            result?;
        }
        Commands::Execute {
            day,
            status,
            minutes,
            summary,
        } => {
            let store = connect(cli_db_url).await?;
            let args = execute_cmd::ExecuteArgs {
                context_path: &day.context,
                user_id: day.user,
                date: &day.date,
                status: &status,
                minutes,
                summary: summary.as_deref(),
            };
            let result = execute_cmd::run_execute(&store, args).await;
            store.pool().close().await;
            result?;
        }
        Commands::Project {
            context,
            user,
            from,
            to,
        } => {
            let store = connect(cli_db_url).await?;
            let result = projection_cmds::run_project(&store, &context, user, &from, &to).await;
            store.pool().close().await;
            result?;
        }
        Commands::Projection { user, from, to } => {
            let store = connect(cli_db_url).await?;
            let result = projection_cmds::run_show_projection(&store, user, &from, &to).await;
            store.pool().close().await;
            result?;
        }
    }

    Ok(())
}

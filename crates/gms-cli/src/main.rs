mod client;
mod config;
mod list_cmds;
mod serve_cmd;
mod tui;

#[cfg(test)]
mod test_util;

use clap::{Parser, Subcommand};

use gms_db::pool;

use client::HttpApi;
use config::GmsConfig;
use list_cmds::{GardenCommands, PlantCommands};

#[derive(Parser)]
#[command(name = "gms", about = "Garden management: REST service, list views and dashboard")]
struct Cli {
    /// Database URL (overrides GMS_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// API base URL for client commands (overrides GMS_API_URL env var)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a gms config file (no database required); `--api-url` sets api.url
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = gms_db::config::DbConfig::DEFAULT_URL)]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create the database if needed and apply migrations
    DbInit,
    /// Serve the gardens and plants REST endpoints
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Garden list view
    Gardens {
        #[command(subcommand)]
        command: GardenCommands,
    },
    /// Plant list view
    Plants {
        #[command(subcommand)]
        command: PlantCommands,
    },
    /// Launch interactive TUI dashboard
    Dashboard,
}

/// Execute `gms init`: write the config file.
fn cmd_init(db_url: &str, api_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        api: config::ApiSection {
            url: api_url.to_string(),
        },
    };
    config::save_config_to(&path, &cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!("  api.url = {api_url}");
    println!();
    println!("Next: run `gms db-init` to create and migrate the database.");

    Ok(())
}

/// Execute `gms db-init`: create the database and run migrations.
async fn cmd_db_init(resolved: &GmsConfig) -> anyhow::Result<()> {
    println!("Initializing gms database...");

    pool::ensure_database_exists(&resolved.db_config).await?;
    let db_pool = pool::create_pool(&resolved.db_config).await?;

    let result = async {
        pool::run_migrations(&db_pool).await?;
        let counts = pool::table_counts(&db_pool).await?;
        println!("Database ready. Tables:");
        for (table, count) in &counts {
            println!("  {table}: {count} rows");
        }
        anyhow::Ok(())
    }
    .await;

    db_pool.close().await;
    result?;

    println!("gms db-init complete.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The dashboard owns the terminal; keep routine logs off it.
    let default_filter = match cli.command {
        Commands::Dashboard => "warn",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { db_url, force } => {
            let api_url = cli.api_url.as_deref().unwrap_or(config::DEFAULT_API_URL);
            cmd_init(&db_url, api_url, force)?;
        }
        Commands::DbInit => {
            let resolved = GmsConfig::resolve(cli.database_url.as_deref(), None)?;
            cmd_db_init(&resolved).await?;
        }
        Commands::Serve { bind, port } => {
            let resolved = GmsConfig::resolve(cli.database_url.as_deref(), None)?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = serve_cmd::run_serve(db_pool.clone(), &bind, port).await;
            db_pool.close().await;
            result?;
        }
        Commands::Gardens { command } => {
            let resolved = GmsConfig::resolve(None, cli.api_url.as_deref())?;
            let api = HttpApi::new(&resolved.api_url)?;
            list_cmds::run_garden_command(command, api).await?;
        }
        Commands::Plants { command } => {
            let resolved = GmsConfig::resolve(None, cli.api_url.as_deref())?;
            let api = HttpApi::new(&resolved.api_url)?;
            list_cmds::run_plant_command(command, api).await?;
        }
        Commands::Dashboard => {
            let resolved = GmsConfig::resolve(None, cli.api_url.as_deref())?;
            let api = HttpApi::new(&resolved.api_url)?;
            tui::run_dashboard(api).await?;
        }
    }

    Ok(())
}

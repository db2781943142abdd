use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use api_loader::config::{discover_config, load_config};
use api_loader::http::serve;
use api_loader::lifecycle::signals::spawn_signal_handler;
use api_loader::observability::init_logging;
use api_loader::{ApiLoader, AxumServer, LoaderConfig, RouteSummary, Shutdown};

#[derive(Parser)]
#[command(name = "api-loader")]
#[command(about = "Turn directory trees into HTTP routes", long_about = None)]
struct Cli {
    /// Configuration file. Discovered from the root when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory search paths are relative to.
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved route table
    Routes {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Bind the routes into axum and serve them
    Serve {
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config: LoaderConfig = match &cli.config {
        Some(path) => load_config(path)?,
        None => discover_config(&cli.root)?,
    };

    tracing::info!(
        root = %cli.root.display(),
        paths = config.paths.len(),
        loader = config.loader_name(),
        "Configuration loaded"
    );

    let loader = ApiLoader::axum(config).with_root(&cli.root);

    match cli.command {
        Commands::Routes { json } => {
            let mut routes: Vec<RouteSummary> = loader
                .resolve()
                .await?
                .iter()
                .map(|route| route.summary())
                .collect();
            routes.sort();

            if json {
                println!("{}", serde_json::to_string_pretty(&routes)?);
            } else {
                for route in routes {
                    println!(
                        "{:<8} /{:<40} {}",
                        route.method.to_uppercase(),
                        route.path.trim_start_matches('/'),
                        route.filepath.display()
                    );
                }
            }
        }
        Commands::Serve { bind } => {
            let mut server = AxumServer::new();
            loader.load(&mut server).await?;

            let listener = TcpListener::bind(&bind).await?;
            let shutdown = Shutdown::new();
            spawn_signal_handler(shutdown.clone());

            serve(listener, server, shutdown.signalled()).await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}

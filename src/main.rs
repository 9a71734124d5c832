use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use tunl::auth::TerminalPrompter;
use tunl::daemon::read_auth_key;
use tunl::{Config, DaemonClient, KeyringSecretStore, ProfileCatalog, Session, TunlError};

/// Get the config file path (respects XDG_CONFIG_HOME and HOME)
fn get_config_path() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("tunl").join("config.toml");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config").join("tunl").join("config.toml");
    }

    if let Some(config) = dirs::config_dir() {
        return config.join("tunl").join("config.toml");
    }

    PathBuf::from("tunl.toml")
}

#[derive(Parser)]
#[command(name = "tunl")]
#[command(about = "Command-line client for the Pritunl desktop daemon")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.config/tunl/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available profiles
    List,
    /// Connect a profile
    Connect {
        /// Profile identifier or list position
        profile: String,

        /// Username for profiles with plain credentials
        #[arg(short, long)]
        user: Option<String>,

        /// Password, or a static PIN/OTP value that skips prompting
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Disconnect a profile
    Disconnect {
        /// Profile identifier or list position
        profile: String,
    },
    /// Disconnect all profiles
    Stop,
    /// Show daemon status
    Status,
    /// Check that the daemon is reachable
    Ping,
    /// Show profiles the daemon is managing
    Connections,
    /// Generate default config file
    Init,
}

fn session(config: &Config) -> Result<Session<KeyringSecretStore>, TunlError> {
    let auth_key = read_auth_key(&config.daemon.auth_key_path)?;
    let daemon = DaemonClient::new(config.daemon.url.clone(), auth_key)?;
    Ok(Session::new(
        config.profiles.directory.clone(),
        daemon,
        KeyringSecretStore::new(config.secrets.service.clone()),
    ))
}

async fn run(command: Commands, config_path: PathBuf) -> Result<(), TunlError> {
    let load_config = || Config::load_or_default(&config_path);

    match command {
        Commands::Init => {
            info!("Generating default config...");
            Config::default().save(&config_path)?;
            println!("Created default config: {}", config_path.display());
        }
        Commands::List => {
            let config = load_config()?;
            let catalog = ProfileCatalog::load(&config.profiles.directory)?;
            if catalog.is_empty() {
                println!("No profiles found in {}", config.profiles.directory.display());
            }
            for (index, profile) in catalog.entries() {
                println!("{:>3}  {:<20} {}", index, profile.identifier, profile.display_name);
            }
        }
        Commands::Connect {
            profile,
            user,
            password,
        } => {
            let session = session(&load_config()?)?;
            let prepared = session
                .connect(
                    &profile,
                    user.as_deref().unwrap_or(""),
                    password.as_deref().unwrap_or(""),
                    &mut TerminalPrompter,
                )
                .await?;
            println!("Connection requested: {}", prepared.display_name);
        }
        Commands::Disconnect { profile } => {
            let id = session(&load_config()?)?.disconnect(&profile).await?;
            println!("Disconnected: {}", id);
        }
        Commands::Stop => {
            session(&load_config()?)?.daemon().stop().await?;
            println!("All profiles disconnected");
        }
        Commands::Status => {
            let status = session(&load_config()?)?.daemon().status().await?;
            println!("Daemon status: {}", status);
        }
        Commands::Ping => {
            if session(&load_config()?)?.daemon().ping().await? {
                println!("Daemon is running");
            } else {
                println!("Daemon answered with an unexpected response");
            }
        }
        Commands::Connections => {
            let session = session(&load_config()?)?;
            let connections = session.daemon().connections().await?;
            if connections.is_empty() {
                println!("No active connections");
                return Ok(());
            }

            // Names are best effort, the daemon may know profiles we don't
            let catalog = session.catalog().unwrap_or_default();
            let mut ids: Vec<_> = connections.keys().collect();
            ids.sort();
            for id in ids {
                let conn = &connections[id];
                let name = catalog
                    .get(id)
                    .map(|p| p.display_name.as_str())
                    .unwrap_or(id.as_str());
                println!("{}", name);
                println!("  Status: {}", conn.status);
                println!("  Server: {}", conn.server_addr);
                println!("  Client: {}", conn.client_addr);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.unwrap_or_else(get_config_path);

    if let Err(e) = run(cli.command, config_path).await {
        error!("{}", e);
        std::process::exit(1);
    }

    Ok(())
}

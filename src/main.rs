mod app;
mod cache;
mod config;
mod dogs;
mod error;
mod event;
mod logging;
mod state;
mod ui;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use url::Url;

use crate::cache::{LocalStore, SqliteStorage};
use crate::dogs::{CachedDogRepository, DogClient, GetDogs};
use crate::state::DogListStore;

#[derive(Parser, Debug)]
#[command(name = "dogview")]
#[command(about = "Browse a remote dog catalogue, cached locally")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/dogview/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Dogs endpoint URL
  #[arg(short, long)]
  url: Option<Url>,

  /// Path of the SQLite cache
  #[arg(short, long)]
  database: Option<PathBuf>,

  /// Print the dog list as JSON and exit
  #[arg(long)]
  list: bool,

  /// Delete all cached dogs and exit
  #[arg(long, conflicts_with = "list")]
  clear_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration, command line wins
  let mut config = config::Config::load(args.config.as_deref())?;
  if let Some(url) = args.url {
    config.api.url = url;
  }
  if let Some(database) = args.database {
    config.database = Some(database);
  }

  let db_path = config.database_path()?;
  let log_dir = db_path
    .parent()
    .map(|dir| dir.join("logs"))
    .ok_or_else(|| eyre!("Invalid database path: {}", db_path.display()))?;
  let _log_guard = logging::init(&log_dir, &config.log_level)?;
  info!(database = %db_path.display(), url = %config.api.url, "dogview starting");

  let storage = Arc::new(SqliteStorage::open(&db_path)?);

  if args.clear_cache {
    storage.clear()?;
    println!("Cleared dog cache at {}", db_path.display());
    return Ok(());
  }

  let client = DogClient::new(&config.api)?;
  let host = client.url().host_str().unwrap_or("local").to_string();
  let repository = CachedDogRepository::new(storage, client);
  let get_dogs = Arc::new(GetDogs::new(repository));

  if args.list {
    let dogs = get_dogs.execute().await?;
    println!("{}", serde_json::to_string_pretty(&dogs)?);
    return Ok(());
  }

  let mut app = app::App::new(DogListStore::from_use_case(get_dogs), host);
  app.run().await?;

  info!("dogview exiting");
  Ok(())
}

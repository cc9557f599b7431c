use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;
use keepsake_cell::LazyCell;
use keepsake_counter::{CounterFile, NoProvider};
use keepsake_store::{FileStore, SnapshotStore, StoreConfig};
use tracing::debug;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(cli.root.clone(), cli.config.as_deref())?;
    debug!(root = %config.root.display(), extension = %config.extension, "resolved storage config");
    match cli.command {
        Command::Path(args) => cmd_path(config, args),
        Command::Get(args) => cmd_get(config, args),
        Command::Set(args) => cmd_set(config, args),
        Command::Rm(args) => cmd_rm(config, args),
        Command::Ls => cmd_ls(config),
        Command::Counter(args) => cmd_counter(config, args).await,
    }
}

/// Config file (or defaults), then environment, then `--root`.
pub fn resolve_config(
    root: Option<PathBuf>,
    config_file: Option<&std::path::Path>,
) -> anyhow::Result<StoreConfig> {
    let config = match config_file {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StoreConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(root) = root {
        config.root = root;
    }
    Ok(config)
}

/// Text if the snapshot is UTF-8 and `hex` is off, hex otherwise.
pub fn render_snapshot(bytes: &[u8], hex: bool) -> String {
    if !hex {
        if let Ok(text) = std::str::from_utf8(bytes) {
            return text.to_string();
        }
    }
    hex::encode(bytes)
}

fn cmd_path(config: StoreConfig, args: KeyArgs) -> anyhow::Result<()> {
    let store = FileStore::new(config);
    println!("{}", store.location(&args.key)?.display());
    Ok(())
}

fn cmd_get(config: StoreConfig, args: GetArgs) -> anyhow::Result<()> {
    let store = FileStore::new(config);
    match store.read(&args.key)? {
        Some(bytes) => {
            println!("{}", render_snapshot(&bytes, args.hex));
            Ok(())
        }
        None => anyhow::bail!("no snapshot for {}", args.key),
    }
}

fn cmd_set(config: StoreConfig, args: SetArgs) -> anyhow::Result<()> {
    let cell = LazyCell::with_config(config, &args.key, String::new());
    cell.store(&args.value)
        .with_context(|| format!("writing {}", args.key))?;
    println!("{} {} ({} bytes)", "✓".green().bold(), cell.key().bold(), args.value.len());
    Ok(())
}

fn cmd_rm(config: StoreConfig, args: KeyArgs) -> anyhow::Result<()> {
    let store = FileStore::new(config);
    if store.remove(&args.key)? {
        println!("{} removed {}", "✓".green(), args.key.bold());
    } else {
        println!("{} no snapshot for {}", "·".dimmed(), args.key.bold());
    }
    Ok(())
}

fn cmd_ls(config: StoreConfig) -> anyhow::Result<()> {
    let store = FileStore::new(config);
    let keys = store.keys()?;
    if keys.is_empty() {
        println!("No snapshots in {}.", store.root().display());
    }
    for key in keys {
        println!("{key}");
    }
    Ok(())
}

async fn cmd_counter(config: StoreConfig, args: CounterArgs) -> anyhow::Result<()> {
    let dir = args.dir.unwrap_or_else(|| config.root.join("counter"));
    let counter = CounterFile::new(dir);
    let result = match args.action {
        CounterAction::Read { no_init } => counter.read(!no_init, &NoProvider).await,
        CounterAction::Write { id } => counter.write(Some(id)).await,
    };
    match result {
        Some(id) => {
            println!("{}", id.to_string().yellow());
            Ok(())
        }
        None => anyhow::bail!("counter at {} is unavailable", counter.path().display()),
    }
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "keepsake",
    about = "Keepsake: inspect and edit persistent cell snapshots",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Storage root (overrides config file and KEEPSAKE_ROOT)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// TOML file with `root` / `extension`
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the storage location for a key
    Path(KeyArgs),
    /// Print a stored snapshot
    Get(GetArgs),
    /// Store a text snapshot
    Set(SetArgs),
    /// Remove a snapshot
    Rm(KeyArgs),
    /// List stored keys
    Ls,
    /// Read or write a counter file
    Counter(CounterArgs),
}

#[derive(Args)]
pub struct KeyArgs {
    pub key: String,
}

#[derive(Args)]
pub struct GetArgs {
    pub key: String,
    /// Print as hex instead of UTF-8 text
    #[arg(long)]
    pub hex: bool,
}

#[derive(Args)]
pub struct SetArgs {
    pub key: String,
    pub value: String,
}

#[derive(Args)]
pub struct CounterArgs {
    #[command(subcommand)]
    pub action: CounterAction,
    /// Counter directory (defaults to `<root>/counter`)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum CounterAction {
    /// Read the counter
    Read {
        /// Do not try to initialize a missing counter
        #[arg(long)]
        no_init: bool,
    },
    /// Write the counter
    Write { id: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_get_hex() {
        let cli = Cli::try_parse_from(["keepsake", "get", "user/settings", "--hex"]).unwrap();
        if let Command::Get(args) = cli.command {
            assert!(args.hex);
            assert_eq!(args.key, "user/settings");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_set() {
        let cli = Cli::try_parse_from(["keepsake", "set", "theme", "dark"]).unwrap();
        if let Command::Set(args) = cli.command {
            assert_eq!(args.key, "theme");
            assert_eq!(args.value, "dark");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_root() {
        let cli = Cli::try_parse_from(["keepsake", "ls", "--root", "/tmp/ks"]).unwrap();
        assert!(matches!(cli.command, Command::Ls));
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/ks")));
    }

    #[test]
    fn parse_counter_read_no_init() {
        let cli = Cli::try_parse_from(["keepsake", "counter", "read", "--no-init"]).unwrap();
        if let Command::Counter(args) = cli.command {
            assert!(matches!(args.action, CounterAction::Read { no_init: true }));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_counter_write() {
        let cli = Cli::try_parse_from(["keepsake", "counter", "--dir", "/tmp/c", "write", "42"]).unwrap();
        if let Command::Counter(args) = cli.command {
            assert!(matches!(args.action, CounterAction::Write { id: 42 }));
            assert_eq!(args.dir, Some(PathBuf::from("/tmp/c")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_rm_requires_key() {
        assert!(Cli::try_parse_from(["keepsake", "rm"]).is_err());
    }
}

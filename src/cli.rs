use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "paymulator-core")]
#[command(about = "Payment transaction tracking service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve(ServeArgs),

    /// Load and validate configuration, then print it with secrets masked
    Config,
}

#[derive(Args, Default)]
pub struct ServeArgs {
    /// Keep transactions in memory instead of Postgres
    #[arg(long)]
    pub in_memory: bool,
}

impl Cli {
    /// The subcommand to run; a bare invocation serves against Postgres.
    pub fn into_command(self) -> Commands {
        self.command
            .unwrap_or_else(|| Commands::Serve(ServeArgs::default()))
    }
}

pub fn handle_config_validate(config: &Config) {
    println!("Configuration is valid:");
    println!("{:#?}", config);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_serves() {
        let cli = Cli::try_parse_from(["paymulator-core"]).unwrap();
        assert!(matches!(cli.into_command(), Commands::Serve(ServeArgs { in_memory: false })));
    }

    #[test]
    fn serve_accepts_in_memory_flag() {
        let cli = Cli::try_parse_from(["paymulator-core", "serve", "--in-memory"]).unwrap();
        assert!(matches!(cli.into_command(), Commands::Serve(ServeArgs { in_memory: true })));
    }

    #[test]
    fn config_subcommand_parses() {
        let cli = Cli::try_parse_from(["paymulator-core", "config"]).unwrap();
        assert!(matches!(cli.into_command(), Commands::Config));
    }
}

mod check;
mod config;
mod discover;
pub(crate) mod helpers;
mod version;

use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate every discovered entity and print its verdict.
    Check(check::CheckArgs),
    /// List the entities the collector output contains.
    Discover(discover::DiscoverArgs),
    #[command(subcommand)]
    Config(config::ConfigCmd),
    Version,
}

pub fn run(opts: crate::Opts) -> Result<()> {
    let mode = opts.output_mode();
    match opts.cmd {
        Commands::Check(args) => check::execute(args, mode, opts.config),
        Commands::Discover(args) => discover::execute(args, mode, opts.config),
        Commands::Config(cmd) => config::execute(cmd, mode, opts.config),
        Commands::Version => {
            version::execute(mode);
            Ok(())
        }
    }
}

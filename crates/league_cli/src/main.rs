use anyhow::Result;
use clap::Parser;

use league_cli::{run, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

use anyhow::Result;
use env_logger::Env;
use srcmerge::{cli, run_merge};

fn main() -> Result<()> {
    let config = cli::parse_args();

    let level = match config.verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if config.show_help {
        cli::print_usage();
        return Ok(());
    }

    run_merge(&config)?;
    Ok(())
}

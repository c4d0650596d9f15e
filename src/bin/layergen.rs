use clap::Parser;
use layergen::cli::{run_cli, Cli};
use layergen::logging::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = LogConfig::from_env();
    if cli.verbose() {
        config = config.verbose();
    }
    init_logging(&config)?;

    run_cli(cli)
}

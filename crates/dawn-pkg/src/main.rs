//! Binary entrypoint of `dawn-pkg`.

use clap::Parser as _;
use dawn_pkg::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    cli.command.run()
}

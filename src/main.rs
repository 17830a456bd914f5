use anyhow::Context;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = brandkit::cli::Cli::parse();
    brandkit::logging::init();
    brandkit::run(cli).context("brandkit failed")
}

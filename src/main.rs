use anyhow::Context;
use clap::Parser;
use taxi_ingest::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let table_name = cli.table_name.clone();
    run(cli).with_context(|| format!("failed to ingest data into table '{}'", table_name))
}

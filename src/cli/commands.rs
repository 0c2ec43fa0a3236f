use crate::cli::args::Cli;
use crate::error::Result;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::processors::load_source;
use crate::utils::progress::ProgressReporter;
use crate::writers::PostgresSink;
use tracing::{debug, info, Level};
use validator::Validate;

pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Download, then load chunk by chunk. Progress lines go to stdout, logs to
/// stderr.
pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    let config = cli.load_config().validated()?;
    let params = cli.connection_params();
    params.validate()?;
    debug!("Load configuration: {:?}", config);
    info!(
        "Ingesting {} into {}:{}/{} table {} (chunk size {})",
        cli.url, params.host, params.port, params.db, config.table_name, config.chunk_size
    );

    let progress = ProgressReporter::new_spinner("Downloading source file...", false);

    let fetcher = HttpFetcher::new(config.fetch.clone())?;
    let source = fetcher.fetch(&cli.url)?;

    progress.set_message("Connecting to PostgreSQL...");
    let sink = PostgresSink::connect(&params)?;

    let summary = load_source(&source, &config, sink, Some(&progress))?;
    progress.finish_with_message(&format!("Loaded {} rows", summary.rows_loaded));

    info!("Load complete\n{}", summary.summary());
    progress.println("Finished ingesting data into the PostgreSQL database");

    Ok(())
}

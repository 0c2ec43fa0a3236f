use crate::config::LoadConfig;
use crate::error::{ProcessingError, Result};
use crate::fetch::Fetcher;
use crate::models::SourceFile;
use crate::processors::table_loader::{LoadSummary, TableLoader};
use crate::readers::ChunkReader;
use crate::utils::progress::ProgressReporter;
use crate::writers::TableSink;
use std::time::Instant;
use tracing::info;

/// Fetch `url` and load it into the configured table.
pub fn ingest<F, S>(
    url: &str,
    config: &LoadConfig,
    fetcher: &F,
    sink: S,
    progress: Option<&ProgressReporter>,
) -> Result<LoadSummary>
where
    F: Fetcher + ?Sized,
    S: TableSink,
{
    if let Some(p) = progress {
        p.set_message("Downloading source file...");
    }

    let source = fetcher.fetch(url)?;
    load_source(&source, config, sink, progress)
}

/// Load an already-downloaded file, one chunk at a time.
///
/// The first chunk creates (or replaces) the table and is appended in the
/// same step; every following chunk is appended until the reader reports
/// exhaustion.
pub fn load_source<S: TableSink>(
    source: &SourceFile,
    config: &LoadConfig,
    sink: S,
    progress: Option<&ProgressReporter>,
) -> Result<LoadSummary> {
    let mut reader = ChunkReader::open(source, config.chunk_size)?;
    let mut loader = TableLoader::new(sink, config);

    if let Some(p) = progress {
        p.set_message("Loading chunks...");
    }

    let t_start = Instant::now();
    let first = reader
        .next_chunk()?
        .ok_or_else(|| ProcessingError::EmptySource(source.path.clone()))?;
    let rows = loader.load_first(&first)?;
    report(
        progress,
        &format!(
            "Created table {} and inserted first chunk of {} rows, took {:.3} seconds",
            config.table_name,
            rows,
            t_start.elapsed().as_secs_f64()
        ),
    );

    while let Some(chunk) = reader.next_chunk()? {
        let t_start = Instant::now();
        loader.append(&chunk)?;
        report(
            progress,
            &format!(
                "Inserted another chunk, took {:.3} seconds",
                t_start.elapsed().as_secs_f64()
            ),
        );
    }

    let summary = loader.finish()?;
    info!(
        "Loaded {} rows in {} chunks into {}",
        summary.rows_loaded, summary.chunks_loaded, summary.table_name
    );
    Ok(summary)
}

fn report(progress: Option<&ProgressReporter>, message: &str) {
    if let Some(p) = progress {
        p.println(message);
    }
}

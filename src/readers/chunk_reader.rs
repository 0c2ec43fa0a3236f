use crate::error::Result;
use crate::models::{Chunk, Compression, SourceFile};
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_CHUNK_SIZE};
use csv::{ReaderBuilder, StringRecord};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Reads a CSV file as a lazy sequence of fixed-size chunks.
///
/// The sequence is finite and cannot be restarted. `next_chunk` returns
/// `Ok(None)` once the file is exhausted; every chunk before that holds
/// exactly `chunk_size` rows except possibly the last.
pub struct ChunkReader {
    reader: csv::Reader<Box<dyn Read>>,
    headers: Arc<[String]>,
    chunk_size: usize,
    rows_read: u64,
    chunks_read: usize,
    exhausted: bool,
}

impl ChunkReader {
    /// Open a downloaded source file, decompressing gzip transparently
    pub fn open(source: &SourceFile, chunk_size: usize) -> Result<Self> {
        let file = File::open(&source.path)?;
        let buffered = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);

        let input: Box<dyn Read> = match source.compression {
            Compression::Gzip => Box::new(MultiGzDecoder::new(buffered)),
            Compression::None => Box::new(buffered),
        };

        debug!(
            "Opening {} (compression: {}) with chunk size {}",
            source.path.display(),
            source.compression,
            chunk_size
        );

        Self::from_reader(input, chunk_size)
    }

    /// Open a local path, inferring compression from its suffix
    pub fn open_path(path: &Path, chunk_size: usize) -> Result<Self> {
        Self::open(&SourceFile::from_path(path), chunk_size)
    }

    /// Wrap any reader producing CSV text with a header row
    pub fn from_reader<R: Read + 'static>(input: R, chunk_size: usize) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .buffer_capacity(DEFAULT_BUFFER_SIZE)
            .from_reader(Box::new(input) as Box<dyn Read>);

        let headers: Arc<[String]> = reader.headers()?.iter().map(String::from).collect();

        Ok(Self {
            reader,
            headers,
            chunk_size: chunk_size.max(1),
            rows_read: 0,
            chunks_read: 0,
            exhausted: false,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// True once the end of the file has been reached
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn chunks_read(&self) -> usize {
        self.chunks_read
    }

    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Read the next chunk, or `None` when no rows remain
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut rows = Vec::with_capacity(self.chunk_size.min(DEFAULT_CHUNK_SIZE));

        while rows.len() < self.chunk_size {
            let mut record = StringRecord::new();
            if !self.reader.read_record(&mut record)? {
                self.exhausted = true;
                break;
            }
            rows.push(record);
        }

        if rows.is_empty() {
            return Ok(None);
        }

        let chunk = Chunk::new(Arc::clone(&self.headers), self.rows_read, rows);
        self.rows_read += chunk.len() as u64;
        self.chunks_read += 1;

        debug!(
            "Read chunk {} ({} rows, starting at row {})",
            self.chunks_read,
            chunk.len(),
            chunk.start_index()
        );

        Ok(Some(chunk))
    }
}

impl Iterator for ChunkReader {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}

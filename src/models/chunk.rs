use csv::StringRecord;
use std::sync::Arc;

/// A bounded slice of rows read from the source file, processed as a unit.
///
/// Every chunk of one file shares the same header. `start_index` is the
/// global 0-based number of the chunk's first data row, so row `i` of the
/// chunk has row index `start_index + i`.
#[derive(Debug, Clone)]
pub struct Chunk {
    headers: Arc<[String]>,
    start_index: u64,
    rows: Vec<StringRecord>,
}

impl Chunk {
    pub fn new(headers: Arc<[String]>, start_index: u64, rows: Vec<StringRecord>) -> Self {
        Self {
            headers,
            start_index,
            rows,
        }
    }

    /// Build a chunk from string literals, mostly useful in tests
    pub fn from_rows<H, R, F>(headers: H, start_index: u64, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = F>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        let headers: Arc<[String]> = headers.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .map(|fields| fields.into_iter().collect::<StringRecord>())
            .collect();
        Self::new(headers, start_index, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn start_index(&self) -> u64 {
        self.start_index
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the values of one column, in row order
    pub fn column_values(&self, position: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(position).unwrap_or(""))
    }
}

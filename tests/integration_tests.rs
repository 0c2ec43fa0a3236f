use flate2::write::GzEncoder;
use flate2::Compression as GzLevel;
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use taxi_ingest::config::{FetchConfig, LoadConfig};
use taxi_ingest::fetch::{target_for_url, Fetcher};
use taxi_ingest::models::{ColumnType, SourceFile, Value};
use taxi_ingest::processors::ingest;
use taxi_ingest::readers::ChunkReader;
use taxi_ingest::writers::MemoryDatabase;
use taxi_ingest::{ProcessingError, Result};
use tempfile::TempDir;

const HEADER: &str = "VendorID,tpep_pickup_datetime,tpep_dropoff_datetime,passenger_count,trip_distance,store_and_fwd_flag,fare_amount";

/// Serves a local fixture in place of a download, writing it where the
/// HTTP fetcher would.
struct FixtureFetcher {
    fixture: PathBuf,
    config: FetchConfig,
}

impl Fetcher for FixtureFetcher {
    fn fetch(&self, url: &str) -> Result<SourceFile> {
        let target = target_for_url(url, &self.config);
        fs::copy(&self.fixture, &target.path)?;
        Ok(target)
    }
}

/// Mimics a failed download: the target is truncated and nothing written
struct FailingFetcher {
    config: FetchConfig,
}

impl Fetcher for FailingFetcher {
    fn fetch(&self, url: &str) -> Result<SourceFile> {
        let target = target_for_url(url, &self.config);
        fs::File::create(&target.path)?;
        Ok(target)
    }
}

fn taxi_csv(rows: usize) -> String {
    let mut content = format!("{}\n", HEADER);
    for i in 0..rows {
        content.push_str(&format!(
            "{},2021-01-01 00:{:02}:10,2021-01-01 01:{:02}:10,{},{}.5,N,{}.0\n",
            i % 2 + 1,
            i % 60,
            i % 60,
            i % 4,
            i,
            i + 3
        ));
    }
    content
}

fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if name.ends_with(".gz") {
        let mut encoder = GzEncoder::new(Vec::new(), GzLevel::default());
        encoder.write_all(content.as_bytes()).unwrap();
        fs::write(&path, encoder.finish().unwrap()).unwrap();
    } else {
        fs::write(&path, content).unwrap();
    }
    path
}

struct Harness {
    _fixtures: TempDir,
    downloads: TempDir,
    fixture: PathBuf,
}

impl Harness {
    fn new(name: &str, content: &str) -> Self {
        let fixtures = TempDir::new().expect("Failed to create temp directory");
        let downloads = TempDir::new().expect("Failed to create temp directory");
        let fixture = write_fixture(fixtures.path(), name, content);
        Self {
            _fixtures: fixtures,
            downloads,
            fixture,
        }
    }

    fn fetch_config(&self) -> FetchConfig {
        FetchConfig::default().with_output_dir(self.downloads.path())
    }

    fn config(&self, chunk_size: usize) -> LoadConfig {
        LoadConfig::new("yellow_taxi_data")
            .with_chunk_size(chunk_size)
            .with_fetch(self.fetch_config())
    }

    fn run(&self, url: &str, chunk_size: usize, db: &mut MemoryDatabase) -> Result<u64> {
        let fetcher = FixtureFetcher {
            fixture: self.fixture.clone(),
            config: self.fetch_config(),
        };
        let summary = ingest(url, &self.config(chunk_size), &fetcher, db, None)?;
        Ok(summary.rows_loaded)
    }
}

#[test]
fn test_all_rows_loaded() -> Result<()> {
    let harness = Harness::new("trips.csv", &taxi_csv(10));
    let mut db = MemoryDatabase::new();

    let rows = harness.run("https://example.com/trips.csv", 3, &mut db)?;

    let table = db.table("yellow_taxi_data").expect("table created");
    assert_eq!(rows, 10);
    assert_eq!(table.row_count(), 10);
    assert_eq!(db.append_count(), 4);
    Ok(())
}

#[test]
fn test_schema_matches_source_columns() -> Result<()> {
    let harness = Harness::new("trips.csv", &taxi_csv(4));
    let mut db = MemoryDatabase::new();
    harness.run("https://example.com/trips.csv", 100, &mut db)?;

    let table = db.table("yellow_taxi_data").expect("table created");
    let mut expected = vec!["index".to_string()];
    expected.extend(HEADER.split(',').map(String::from));

    assert_eq!(table.schema.column_names(), expected);
    assert_eq!(table.schema.column_type("VendorID"), Some(ColumnType::BigInt));
    assert_eq!(table.schema.column_type("trip_distance"), Some(ColumnType::Double));
    assert_eq!(table.schema.column_type("store_and_fwd_flag"), Some(ColumnType::Text));
    Ok(())
}

#[test]
fn test_datetime_columns_stored_as_timestamps() -> Result<()> {
    let content = format!(
        "{}\n\
         1,2021-01-01 00:30:10,2021-01-01T00:36:12,1,2.1,N,8.0\n\
         2,01/01/2021 12:51:20 AM,01/01/2021 01:52:19,1,0.2,N,3.0\n\
         1,2021-01-01,,1,0.0,N,2.5\n",
        HEADER
    );
    let harness = Harness::new("trips.csv", &content);
    let mut db = MemoryDatabase::new();
    harness.run("https://example.com/trips.csv", 2, &mut db)?;

    let table = db.table("yellow_taxi_data").expect("table created");
    for column in ["tpep_pickup_datetime", "tpep_dropoff_datetime"] {
        assert_eq!(table.schema.column_type(column), Some(ColumnType::Timestamp));
        let values = table.column(column).expect("column present");
        assert!(values
            .iter()
            .all(|v| matches!(v, Value::Timestamp(_) | Value::Null)));
    }

    let pickups: Vec<String> = table
        .column("tpep_pickup_datetime")
        .expect("column present")
        .iter()
        .map(|v| v.to_string())
        .collect();
    assert_eq!(
        pickups,
        vec![
            "2021-01-01 00:30:10",
            "2021-01-01 00:51:20",
            "2021-01-01 00:00:00"
        ]
    );
    assert_eq!(table.column("tpep_dropoff_datetime").unwrap()[2], &Value::Null);
    Ok(())
}

#[test]
fn test_rerun_replaces_table() -> Result<()> {
    let harness = Harness::new("trips.csv", &taxi_csv(7));
    let mut db = MemoryDatabase::new();

    harness.run("https://example.com/trips.csv", 3, &mut db)?;
    harness.run("https://example.com/trips.csv", 3, &mut db)?;

    let table = db.table("yellow_taxi_data").expect("table created");
    assert_eq!(table.row_count(), 7);
    Ok(())
}

#[test]
fn test_single_row_source() -> Result<()> {
    let harness = Harness::new("trips.csv", &taxi_csv(1));
    let mut db = MemoryDatabase::new();

    let rows = harness.run("https://example.com/trips.csv", 100, &mut db)?;

    assert_eq!(rows, 1);
    assert_eq!(db.append_count(), 1);
    assert_eq!(db.table_names(), vec!["yellow_taxi_data"]);
    Ok(())
}

#[test]
fn test_chunk_size_plus_one_rows() -> Result<()> {
    let chunk_size = 5;
    let harness = Harness::new("trips.csv", &taxi_csv(chunk_size + 1));

    let mut reader = ChunkReader::open_path(&harness.fixture, chunk_size)?;
    let sizes: Vec<usize> = reader
        .by_ref()
        .map(|chunk| chunk.map(|c| c.len()))
        .collect::<Result<_>>()?;
    assert_eq!(sizes, vec![chunk_size, 1]);
    assert!(reader.is_exhausted());

    let mut db = MemoryDatabase::new();
    harness.run("https://example.com/trips.csv", chunk_size, &mut db)?;
    assert_eq!(db.append_count(), 2);
    Ok(())
}

#[test]
fn test_gzip_source_matches_plain() -> Result<()> {
    let content = taxi_csv(9);
    let plain = Harness::new("trips.csv", &content);
    let gzipped = Harness::new("trips.csv.gz", &content);

    let mut plain_db = MemoryDatabase::new();
    let mut gzip_db = MemoryDatabase::new();
    plain.run("https://example.com/yellow_tripdata_2021-01.csv", 4, &mut plain_db)?;
    gzipped.run("https://example.com/yellow_tripdata_2021-01.csv.gz", 4, &mut gzip_db)?;

    assert!(gzipped.downloads.path().join("output.csv.gz").exists());
    assert_eq!(
        plain_db.table("yellow_taxi_data"),
        gzip_db.table("yellow_taxi_data")
    );
    Ok(())
}

#[test]
fn test_row_index_contiguous_across_chunks() -> Result<()> {
    let harness = Harness::new("trips.csv", &taxi_csv(11));
    let mut db = MemoryDatabase::new();
    harness.run("https://example.com/trips.csv", 4, &mut db)?;

    let table = db.table("yellow_taxi_data").expect("table created");
    let index: Vec<i64> = table
        .column("index")
        .expect("index column")
        .iter()
        .filter_map(|v| v.as_integer())
        .collect();
    assert_eq!(index, (0..11).collect::<Vec<i64>>());
    Ok(())
}

#[test]
fn test_later_chunk_type_conflict_aborts() {
    let content = format!(
        "{}\n\
         1,2021-01-01 00:30:10,2021-01-01 00:36:12,1,2.1,N,8.0\n\
         two,2021-01-01 00:51:20,2021-01-01 00:52:19,1,0.2,N,3.0\n",
        HEADER
    );
    let harness = Harness::new("trips.csv", &content);
    let mut db = MemoryDatabase::new();

    let result = harness.run("https://example.com/trips.csv", 1, &mut db);

    assert!(matches!(result, Err(ProcessingError::ValueCoercion { .. })));
    assert_eq!(db.table("yellow_taxi_data").map(|t| t.row_count()), Some(1));
}

#[test]
fn test_later_chunk_fractional_integer_is_rounded() -> Result<()> {
    let content = format!(
        "{}\n\
         1,2021-01-01 00:30:10,2021-01-01 00:36:12,1,2.1,N,8.0\n\
         2,2021-01-01 00:51:20,2021-01-01 00:52:19,2.5,0.2,N,3.0\n",
        HEADER
    );
    let harness = Harness::new("trips.csv", &content);
    let mut db = MemoryDatabase::new();

    let rows = harness.run("https://example.com/trips.csv", 1, &mut db)?;

    let table = db.table("yellow_taxi_data").expect("table created");
    assert_eq!(rows, 2);
    assert_eq!(table.schema.column_type("passenger_count"), Some(ColumnType::BigInt));
    assert_eq!(
        table.column("passenger_count"),
        Some(vec![&Value::Integer(1), &Value::Integer(3)])
    );
    Ok(())
}

#[test]
fn test_failed_download_surfaces_when_reading() {
    let downloads = TempDir::new().expect("Failed to create temp directory");
    let config = FetchConfig::default().with_output_dir(downloads.path());
    let fetcher = FailingFetcher {
        config: config.clone(),
    };
    let mut db = MemoryDatabase::new();

    let result = ingest(
        "https://example.com/missing.csv.gz",
        &LoadConfig::new("yellow_taxi_data").with_fetch(config),
        &fetcher,
        &mut db,
        None,
    );

    assert!(result.is_err());
    assert!(db.table("yellow_taxi_data").is_none());
}

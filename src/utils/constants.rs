/// Processing defaults
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Downloaded file names
pub const PLAIN_OUTPUT_FILE: &str = "output.csv";
pub const GZIP_OUTPUT_FILE: &str = "output.csv.gz";
pub const GZIP_CSV_SUFFIX: &str = ".csv.gz";
pub const GZIP_SUFFIX: &str = ".gz";

/// Trip datetime columns
pub const DEFAULT_PICKUP_COLUMN: &str = "tpep_pickup_datetime";
pub const DEFAULT_DROPOFF_COLUMN: &str = "tpep_dropoff_datetime";

/// Implicit row-index column added to every target table
pub const INDEX_COLUMN: &str = "index";

/// Field values read as NULL
pub const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>",
    "#N/A", "#NA", "#N/A N/A",
];

/// Accepted naive datetime layouts, tried in order
pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

/// Accepted date-only layouts, read as midnight
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

pub fn is_null_token(field: &str) -> bool {
    NULL_TOKENS.contains(&field.trim())
}

pub mod http_fetcher;

pub use http_fetcher::HttpFetcher;

use crate::config::FetchConfig;
use crate::error::Result;
use crate::models::{Compression, SourceFile};
use crate::utils::constants::GZIP_CSV_SUFFIX;

/// Retrieves a remote file into local storage
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<SourceFile>;
}

/// Pick the local file for a URL: the gzip name when the URL path ends in
/// `.csv.gz`, the plain name otherwise. Query strings and fragments are
/// ignored.
pub fn target_for_url(url: &str, config: &FetchConfig) -> SourceFile {
    let path = url_path(url);

    if path.to_ascii_lowercase().ends_with(GZIP_CSV_SUFFIX) {
        SourceFile::new(
            config.output_dir.join(&config.gzip_file_name),
            Compression::Gzip,
        )
    } else {
        SourceFile::new(
            config.output_dir.join(&config.plain_file_name),
            Compression::None,
        )
    }
}

fn url_path(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or(url)
            .to_string(),
    }
}

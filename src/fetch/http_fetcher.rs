use crate::config::FetchConfig;
use crate::error::Result;
use crate::fetch::{target_for_url, Fetcher};
use crate::models::SourceFile;
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use tracing::{debug, info, warn};

/// Downloads a URL over HTTP(S) with a blocking client.
///
/// The target file is truncated before the request. A transport failure or
/// a non-success status is logged and otherwise ignored, leaving an empty
/// file behind; reading that file is what fails the run. No timeout and no
/// retry are applied.
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder().timeout(None).build()?;
        Ok(Self { client, config })
    }

    fn download_into(&self, url: &str, file: &mut File) -> Result<u64> {
        let mut response = self.client.get(url).send()?;
        let status = response.status();

        if !status.is_success() {
            warn!("Download of {} returned HTTP {}; nothing written", url, status);
            return Ok(0);
        }

        let mut writer = BufWriter::new(file);
        let written = response.copy_to(&mut writer)?;
        writer.flush()?;
        Ok(written)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<SourceFile> {
        let target = target_for_url(url, &self.config);

        if !self.config.output_dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.config.output_dir)?;
        }
        let mut file = File::create(&target.path)?;

        info!("Downloading {} to {}", url, target.path.display());

        match self.download_into(url, &mut file) {
            Ok(bytes) => debug!("Wrote {} bytes to {}", bytes, target.path.display()),
            Err(e) => warn!("Download of {} failed: {}", url, e),
        }

        Ok(target)
    }
}

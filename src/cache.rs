use super::error::Error;
use super::products::OutlookProduct;
use super::util::Fetch;
use slog::Logger;
use std::fs;
use std::path::{Path, PathBuf};

/// Keeps downloaded KMZ archives on disk, keyed by file name only. A file that
/// exists is trusted as-is; nothing is ever evicted.
pub struct OutlookCache<'a, F: Fetch> {
    dir: PathBuf,
    fetcher: &'a F,
    logger: &'a Logger,
}

impl<'a, F: Fetch> OutlookCache<'a, F> {
    pub fn new<P: AsRef<Path>>(dir: P, fetcher: &'a F, logger: &'a Logger) -> OutlookCache<'a, F> {
        OutlookCache {
            dir: dir.as_ref().to_path_buf(),
            fetcher,
            logger,
        }
    }

    /// Returns the local path of the product's archive, downloading it first
    /// if it is not already cached.
    pub fn ensure(&self, product: &OutlookProduct, url: &str) -> Result<PathBuf, Error> {
        let path = self.dir.join(product.kmz_name());

        if path.is_file() {
            debug!(self.logger, "cache hit"; "path" => path.display().to_string());
            return Ok(path);
        }

        let body = self.fetcher.fetch_bytes(url)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, &body)?;
        info!(self.logger, "cached outlook"; "url" => url, "path" => path.display().to_string(), "bytes" => body.len());

        Ok(path)
    }
}

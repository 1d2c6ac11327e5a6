use super::categories::StyleOverride;
use super::error::Error;
use super::plot::PlotRequest;
use reqwest::blocking::Client;
use slog::{Drain, Logger};
use std::collections::HashMap;
use std::fs;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub outlook_kmz_dir: String,
    pub image_dir: String,
    pub user_agent: String,
    #[serde(default = "default_outlook_archive_url")]
    pub outlook_archive_url: String,
    #[serde(default = "default_fire_archive_url")]
    pub fire_archive_url: String,
    #[serde(default = "default_reports_url")]
    pub reports_url: String,
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    #[serde(default = "default_image_height")]
    pub image_height: u32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub styles: HashMap<String, StyleOverride>,
    #[serde(default)]
    pub plots: Vec<PlotRequest>,
}

fn default_outlook_archive_url() -> String {
    "https://www.spc.noaa.gov/products/outlook/archive".to_string()
}

fn default_fire_archive_url() -> String {
    "https://www.spc.noaa.gov/products/fire_wx".to_string()
}

fn default_reports_url() -> String {
    "https://www.spc.noaa.gov/climo/reports".to_string()
}

fn default_image_width() -> u32 {
    1600
}

fn default_image_height() -> u32 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn new(path: &str) -> Result<Config, Error> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("unable to read {}: {}", path, e)))?;
        Config::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Config, Error> {
        let config: Config = toml::from_str(text)?;
        if config.image_width == 0 || config.image_height == 0 {
            return Err(Error::Config("image dimensions must be non-zero".to_string()));
        }
        Ok(config)
    }
}

pub fn get_logger(level: &str) -> Logger {
    let level = match level.parse::<slog::Level>() {
        Ok(level) => level,
        Err(_) => slog::Level::Info,
    };
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = slog::LevelFilter::new(drain, level).fuse();

    Logger::root(drain, o!("app" => "spc-outlooks"))
}

/// Source of remote bytes. Non-200 responses surface as `Error::NotFound`.
pub trait Fetch {
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, Error>;
}

pub struct Fetcher<'a> {
    pub client: &'a Client,
    pub logger: &'a Logger,
    pub user_agent: &'a str,
}

impl<'a> Fetcher<'a> {
    pub fn new(client: &'a Client, logger: &'a Logger, user_agent: &'a str) -> Fetcher<'a> {
        Fetcher {
            client,
            logger,
            user_agent,
        }
    }
}

impl<'a> Fetch for Fetcher<'a> {
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, Error> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, self.user_agent)
            .send()?;

        let status = response.status();
        debug!(self.logger, "fetch_body"; "url" => url, "status" => status.to_string());

        if status != reqwest::StatusCode::OK {
            return Err(Error::NotFound {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes()?.to_vec())
    }
}

use super::error::Error;
use super::kml::{Folder, Placemark};
use super::render::{Plot, Renderer};
use super::util::Fetch;
use slog::Logger;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Write};

pub fn test_logger() -> Logger {
    Logger::root(slog::Discard, o!())
}

pub fn get_kml_from_file(path: &str) -> String {
    fs::read_to_string(path).unwrap()
}

pub fn get_bytes_from_file(path: &str) -> Vec<u8> {
    fs::read(path).unwrap()
}

/// Builds an in-memory KMZ holding the given `(entry name, contents)` pairs.
pub fn kmz_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer.start_file(*name, zip::write::FileOptions::default()).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn folder(name: Option<&str>, placemarks: Vec<Placemark>) -> Folder {
    Folder {
        name: name.map(|x| x.to_string()),
        placemarks,
    }
}

pub fn placemark(name: Option<&str>, extended_data: &str, simple_data: Option<&str>, coordinates: Vec<&str>) -> Placemark {
    Placemark {
        name: name.map(|x| x.to_string()),
        extended_data: extended_data.to_string(),
        simple_data: simple_data.map(|x| x.to_string()),
        coordinates: coordinates.iter().map(|x| x.to_string()).collect(),
    }
}

/// Serves canned bodies by URL and records every request. Unknown URLs are a 404.
pub struct CountingFetcher {
    responses: HashMap<String, Vec<u8>>,
    calls: RefCell<Vec<String>>,
}

impl CountingFetcher {
    pub fn new() -> CountingFetcher {
        CountingFetcher {
            responses: HashMap::new(),
            calls: RefCell::new(vec![]),
        }
    }

    pub fn with_response(mut self, url: &str, body: Vec<u8>) -> CountingFetcher {
        self.responses.insert(url.to_string(), body);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Fetch for CountingFetcher {
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, Error> {
        self.calls.borrow_mut().push(url.to_string());
        self.responses.get(url).cloned().ok_or_else(|| Error::NotFound {
            url: url.to_string(),
            status: 404,
        })
    }
}

pub struct RecordingRenderer {
    plots: RefCell<Vec<Plot>>,
}

impl RecordingRenderer {
    pub fn new() -> RecordingRenderer {
        RecordingRenderer {
            plots: RefCell::new(vec![]),
        }
    }

    pub fn plots(&self) -> Vec<Plot> {
        self.plots.borrow().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, plot: &Plot) -> Result<(), Error> {
        self.plots.borrow_mut().push(plot.clone());
        Ok(())
    }
}

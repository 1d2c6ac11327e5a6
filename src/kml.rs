//! KMZ/KML reading: unzips the archive, walks the KML tree into folders and
//! placemarks, and turns `coordinates` text into vertex rings.

use super::domain::{Coordinates, Ring};
use super::error::Error;
use roxmltree::Node;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct OutlookDocument {
    pub folders: Vec<Folder>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub name: Option<String>,
    pub placemarks: Vec<Placemark>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Placemark {
    pub name: Option<String>,
    /// All text under `ExtendedData`, one space between values.
    pub extended_data: String,
    /// The first `SimpleData` value.
    pub simple_data: Option<String>,
    /// Raw text of every `coordinates` element, in document order.
    pub coordinates: Vec<String>,
}

pub fn read_kmz<P: AsRef<Path>>(path: P, kml_name: &str) -> Result<String, Error> {
    let file = File::open(path.as_ref())?;
    read_kml(file, kml_name)
}

/// Reads `kml_name` out of a KMZ archive, falling back to the first `.kml`
/// entry when the archive names its document differently.
pub fn read_kml<R: Read + Seek>(reader: R, kml_name: &str) -> Result<String, Error> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let name = if archive.file_names().any(|x| x == kml_name) {
        kml_name.to_string()
    } else {
        archive
            .file_names()
            .find(|x| x.to_ascii_lowercase().ends_with(".kml"))
            .map(|x| x.to_string())
            .ok_or_else(|| Error::MissingData(format!("no KML document in archive, expected {}", kml_name)))?
    };

    let mut entry = archive.by_name(&name)?;
    let mut text = String::new();
    entry.read_to_string(&mut text)?;

    Ok(text)
}

pub fn parse_document(text: &str) -> Result<OutlookDocument, Error> {
    let doc = roxmltree::Document::parse(text)?;

    let folders = doc
        .descendants()
        .filter(|x| is_tag(x, "Folder"))
        .map(|folder| Folder {
            name: folder
                .children()
                .find(|x| is_tag(x, "name"))
                .map(|x| text_content(&x)),
            placemarks: folder
                .descendants()
                .filter(|x| is_tag(x, "Placemark") && owning_folder(x) == Some(folder))
                .map(|x| parse_placemark(&x))
                .collect(),
        })
        .collect();

    Ok(OutlookDocument { folders })
}

// Nested folders keep their own placemarks.
fn owning_folder<'a, 'input>(node: &Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    node.ancestors().skip(1).find(|x| is_tag(x, "Folder"))
}

fn parse_placemark(node: &Node) -> Placemark {
    let name = node
        .descendants()
        .find(|x| is_tag(x, "name"))
        .map(|x| text_content(&x));
    let extended_data = node
        .descendants()
        .find(|x| is_tag(x, "ExtendedData"))
        .map(|x| text_content(&x))
        .unwrap_or_default();
    let simple_data = node
        .descendants()
        .find(|x| is_tag(x, "SimpleData"))
        .map(|x| text_content(&x));
    let coordinates = node
        .descendants()
        .filter(|x| is_tag(x, "coordinates"))
        .map(|x| text_content(&x))
        .collect();

    Placemark {
        name,
        extended_data,
        simple_data,
        coordinates,
    }
}

// KML element names are matched without regard to namespace or case.
fn is_tag(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name().eq_ignore_ascii_case(name)
}

fn text_content(node: &Node) -> String {
    let parts: Vec<&str> = node
        .descendants()
        .filter(|x| x.is_text())
        .filter_map(|x| x.text())
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .collect();
    parts.join(" ")
}

/// Parses `lon,lat[,alt] lon,lat[,alt] ...` into a ring, one vertex per
/// whitespace-separated token.
pub fn parse_ring(text: &str) -> Result<Ring, Error> {
    text.split_whitespace().map(parse_coordinate).collect()
}

fn parse_coordinate(token: &str) -> Result<Coordinates, Error> {
    let parts: Vec<&str> = token.split(',').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(Error::CoordinateParse(token.to_string()));
    }

    let parse = |x: &str| -> Result<f64, Error> {
        match x.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(Error::CoordinateParse(token.to_string())),
        }
    };

    Ok(Coordinates {
        lon: parse(parts[0])?,
        lat: parse(parts[1])?,
    })
}

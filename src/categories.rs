//! Risk categories and the fixed fill/outline/z-order table used to draw them.
//!
//! The table is built once at start-up (optionally with colour overrides from
//! the config) and handed to the parsers by reference.

use super::domain::OutlookKind;
use super::error::Error;
use super::render::{Legend, LegendEntry, Swatch};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Tstm,
    Mrgl,
    Slgt,
    Enh,
    Mdt,
    High,
    Tor2,
    Tor5,
    Tor10,
    Tor15,
    Tor30,
    Tor45,
    Tor60,
    SigTor,
    Wind5,
    Wind15,
    Wind30,
    Wind45,
    Wind60,
    SigWind,
    Hail5,
    Hail15,
    Hail30,
    Hail45,
    Hail60,
    SigHail,
    Elevated,
    Critical,
    Extreme,
    IsoDryT,
    SctDryT,
}

impl Category {
    pub const ALL: [Category; 31] = [
        Category::Tstm,
        Category::Mrgl,
        Category::Slgt,
        Category::Enh,
        Category::Mdt,
        Category::High,
        Category::Tor2,
        Category::Tor5,
        Category::Tor10,
        Category::Tor15,
        Category::Tor30,
        Category::Tor45,
        Category::Tor60,
        Category::SigTor,
        Category::Wind5,
        Category::Wind15,
        Category::Wind30,
        Category::Wind45,
        Category::Wind60,
        Category::SigWind,
        Category::Hail5,
        Category::Hail15,
        Category::Hail30,
        Category::Hail45,
        Category::Hail60,
        Category::SigHail,
        Category::Elevated,
        Category::Critical,
        Category::Extreme,
        Category::IsoDryT,
        Category::SctDryT,
    ];

    /// Short code used in config overrides and logs.
    pub fn code(self) -> &'static str {
        match self {
            Category::Tstm => "TSTM",
            Category::Mrgl => "MRGL",
            Category::Slgt => "SLGT",
            Category::Enh => "ENH",
            Category::Mdt => "MDT",
            Category::High => "HIGH",
            Category::Tor2 => "TOR2",
            Category::Tor5 => "TOR5",
            Category::Tor10 => "TOR10",
            Category::Tor15 => "TOR15",
            Category::Tor30 => "TOR30",
            Category::Tor45 => "TOR45",
            Category::Tor60 => "TOR60",
            Category::SigTor => "SIGTOR",
            Category::Wind5 => "WIND5",
            Category::Wind15 => "WIND15",
            Category::Wind30 => "WIND30",
            Category::Wind45 => "WIND45",
            Category::Wind60 => "WIND60",
            Category::SigWind => "SIGWIND",
            Category::Hail5 => "HAIL5",
            Category::Hail15 => "HAIL15",
            Category::Hail30 => "HAIL30",
            Category::Hail45 => "HAIL45",
            Category::Hail60 => "HAIL60",
            Category::SigHail => "SIGHAIL",
            Category::Elevated => "ELEVATED",
            Category::Critical => "CRITICAL",
            Category::Extreme => "EXTREME",
            Category::IsoDryT => "ISODRYT",
            Category::SctDryT => "SCTDRYT",
        }
    }

    pub fn from_code(code: &str) -> Option<Category> {
        Category::ALL
            .iter()
            .copied()
            .find(|x| x.code().eq_ignore_ascii_case(code))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::from_u32(0x000000);

    pub const fn from_u32(value: u32) -> Rgb {
        Rgb {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Parses `#RRGGBB`.
    pub fn from_hex(input: &str) -> Result<Rgb, Error> {
        let hex = input.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return Err(Error::Config(format!("invalid colour: {}", input)));
        }
        u32::from_str_radix(hex, 16)
            .map(Rgb::from_u32)
            .map_err(|_| Error::Config(format!("invalid colour: {}", input)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Style {
    pub fill: Option<Rgb>,
    pub outline: Rgb,
    pub z_order: i32,
    pub line_width: f32,
    pub dashed: bool,
    pub hatched: bool,
}

impl Style {
    const fn area(fill: u32, outline: u32, z_order: i32) -> Style {
        Style {
            fill: Some(Rgb::from_u32(fill)),
            outline: Rgb::from_u32(outline),
            z_order,
            line_width: 0.5,
            dashed: false,
            hatched: false,
        }
    }

    const fn significant() -> Style {
        Style {
            fill: None,
            outline: Rgb::BLACK,
            z_order: 7,
            line_width: 0.5,
            dashed: false,
            hatched: true,
        }
    }

    const fn dry_thunder(outline: u32, z_order: i32) -> Style {
        Style {
            fill: None,
            outline: Rgb::from_u32(outline),
            z_order,
            line_width: 0.7,
            dashed: true,
            hatched: false,
        }
    }
}

fn spc_style(category: Category) -> Style {
    match category {
        Category::Tstm => Style::area(0xC1E9C1, 0x646464, 0),
        Category::Mrgl => Style::area(0x80C580, 0x3C783C, 1),
        Category::Slgt => Style::area(0xF7F780, 0xFF9600, 2),
        Category::Enh => Style::area(0xE6C280, 0xFF7F00, 3),
        Category::Mdt => Style::area(0xE68080, 0xCD0000, 4),
        Category::High => Style::area(0xFF80FF, 0xFF00FF, 5),
        Category::Tor2 => Style::area(0x80C580, 0x008200, 0),
        Category::Tor5 => Style::area(0xC5A393, 0x8B4726, 1),
        Category::Tor10 => Style::area(0xFFEB80, 0xFF9600, 2),
        Category::Tor15 => Style::area(0xFF8080, 0xFF0000, 3),
        Category::Tor30 => Style::area(0xFF80FF, 0xFF00FF, 4),
        Category::Tor45 => Style::area(0xC896F7, 0x912CEE, 5),
        Category::Tor60 => Style::area(0x104E8B, 0x083058, 6),
        Category::Wind5 | Category::Hail5 => Style::area(0xC5A393, 0x8B4726, 0),
        Category::Wind15 | Category::Hail15 => Style::area(0xFFEB80, 0xFF9600, 1),
        Category::Wind30 | Category::Hail30 => Style::area(0xFF8080, 0xFF0000, 2),
        Category::Wind45 | Category::Hail45 => Style::area(0xFF80FF, 0xFF00FF, 3),
        Category::Wind60 | Category::Hail60 => Style::area(0xC896F7, 0x912CEE, 4),
        Category::SigTor | Category::SigWind | Category::SigHail => Style::significant(),
        Category::Elevated => Style::area(0xFFC081, 0xFF8000, 0),
        Category::Critical => Style::area(0xFF8181, 0xFF0000, 1),
        Category::Extreme => Style::area(0xFF81FF, 0xFF0000, 2),
        Category::IsoDryT => Style::dry_thunder(0x8C4521, 3),
        Category::SctDryT => Style::dry_thunder(0xF10E16, 4),
    }
}

/// Colour overrides for one category, as written in `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleOverride {
    pub fill: Option<String>,
    pub outline: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StyleTable {
    styles: HashMap<Category, Style>,
}

impl StyleTable {
    pub fn spc() -> StyleTable {
        let styles = Category::ALL
            .iter()
            .map(|x| (*x, spc_style(*x)))
            .collect();
        StyleTable { styles }
    }

    /// Applies colour overrides keyed by category code. Z-order is never
    /// overridable.
    pub fn with_overrides(overrides: &HashMap<String, StyleOverride>) -> Result<StyleTable, Error> {
        let mut table = StyleTable::spc();

        for (code, colors) in overrides {
            let category = Category::from_code(code)
                .ok_or_else(|| Error::Config(format!("unknown style category: {}", code)))?;
            let style = table.styles.entry(category).or_insert_with(|| spc_style(category));

            if let Some(fill) = &colors.fill {
                style.fill = if fill.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(Rgb::from_hex(fill)?)
                };
            }
            if let Some(outline) = &colors.outline {
                style.outline = Rgb::from_hex(outline)?;
            }
        }

        Ok(table)
    }

    pub fn get(&self, category: Category) -> Style {
        self.styles
            .get(&category)
            .copied()
            .unwrap_or_else(|| spc_style(category))
    }

    /// The area legend for an outlook kind, in display order.
    pub fn legend(&self, kind: OutlookKind) -> Legend {
        let (title, entries): (&str, &[(Category, &str)]) = match kind {
            OutlookKind::Categorical => (
                "Categorical risk",
                &[
                    (Category::Tstm, "TSTM"),
                    (Category::Mrgl, "MRGL (1/5)"),
                    (Category::Slgt, "SLGT (2/5)"),
                    (Category::Enh, "ENH (3/5)"),
                    (Category::Mdt, "MDT (4/5)"),
                    (Category::High, "HIGH (5/5)"),
                ],
            ),
            OutlookKind::Tornado => (
                "Probability of a tornado within 25 miles of a point",
                &[
                    (Category::Tor2, "2%"),
                    (Category::Tor5, "5%"),
                    (Category::Tor10, "10%"),
                    (Category::Tor15, "15%"),
                    (Category::Tor30, "30%"),
                    (Category::Tor45, "45%"),
                    (Category::Tor60, "60%"),
                    (Category::SigTor, "10% EF2+"),
                ],
            ),
            OutlookKind::Wind => (
                "Probability of severe winds (≥ 58 mph) within 25 miles of a point",
                &[
                    (Category::Wind5, "5%"),
                    (Category::Wind15, "15%"),
                    (Category::Wind30, "30%"),
                    (Category::Wind45, "45%"),
                    (Category::Wind60, "60%"),
                    (Category::SigWind, "10% ≥ 75 mph"),
                ],
            ),
            OutlookKind::Hail => (
                "Probability of severe hail (≥ 1\" diameter) within 25 miles of a point",
                &[
                    (Category::Hail5, "5%"),
                    (Category::Hail15, "15%"),
                    (Category::Hail30, "30%"),
                    (Category::Hail45, "45%"),
                    (Category::Hail60, "60%"),
                    (Category::SigHail, "10% ≥ 2\" diameter"),
                ],
            ),
            OutlookKind::Fire => (
                "Fire outlook legend",
                &[
                    (Category::Elevated, "Elevated"),
                    (Category::Critical, "Critical"),
                    (Category::Extreme, "Extreme"),
                    (Category::IsoDryT, "Iso DryT"),
                    (Category::SctDryT, "Scattered DryT"),
                ],
            ),
        };

        Legend {
            title: title.to_string(),
            entries: entries
                .iter()
                .map(|(category, label)| LegendEntry {
                    label: label.to_string(),
                    swatch: Swatch::Area(self.get(*category)),
                })
                .collect(),
        }
    }
}

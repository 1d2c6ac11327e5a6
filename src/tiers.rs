//! Storm report severity tiers and the marker styles that go with them.
//!
//! Every report equal to the day's maximum is tagged `Maximum`, ties included.
//! The maximum check comes before the significance threshold, so the largest
//! report always gets the maximum marker even when it is not significant.

use super::categories::Rgb;
use super::domain::{Coordinates, Hazard};
use super::render::{LegendEntry, Swatch};
use super::reports::StormReport;

pub const SIGNIFICANT_WIND_MPH: u32 = 75;
pub const SIGNIFICANT_HAIL_HUNDREDTHS: u32 = 200;

const RED: Rgb = Rgb::from_u32(0xFF0000);
const BLUE: Rgb = Rgb::from_u32(0x0000FF);
const GREEN: Rgb = Rgb::from_u32(0x008000);
const GRAY: Rgb = Rgb::from_u32(0x808080);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    Ordinary,
    Significant,
    Maximum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerShape {
    Circle,
    Square,
    Triangle,
    Star,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    pub face: Rgb,
    pub edge: Rgb,
    /// Marker area in square points.
    pub size: f32,
    pub z_order: i32,
}

pub fn significant_threshold(hazard: Hazard) -> Option<u32> {
    match hazard {
        Hazard::Tornado => None,
        Hazard::Wind => Some(SIGNIFICANT_WIND_MPH),
        Hazard::Hail => Some(SIGNIFICANT_HAIL_HUNDREDTHS),
    }
}

pub fn marker_style(hazard: Hazard, tier: Tier) -> MarkerStyle {
    let (face, significant_shape) = match hazard {
        Hazard::Tornado => {
            return MarkerStyle {
                shape: MarkerShape::Circle,
                face: RED,
                edge: Rgb::BLACK,
                size: 3.0,
                z_order: 15,
            }
        }
        Hazard::Wind => (BLUE, MarkerShape::Square),
        Hazard::Hail => (GREEN, MarkerShape::Triangle),
    };

    match tier {
        Tier::Ordinary => MarkerStyle {
            shape: MarkerShape::Circle,
            face,
            edge: Rgb::BLACK,
            size: 3.0,
            z_order: 11,
        },
        Tier::Significant => MarkerStyle {
            shape: significant_shape,
            face: Rgb::BLACK,
            edge: GRAY,
            size: 4.0,
            z_order: 12,
        },
        Tier::Maximum => MarkerStyle {
            shape: MarkerShape::Star,
            face,
            edge: Rgb::BLACK,
            size: 10.0,
            z_order: 13,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedReport {
    pub location: Coordinates,
    pub magnitude: Option<u32>,
    pub tier: Tier,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierSummary {
    pub hazard: Hazard,
    pub maximum: Option<u32>,
    pub reports: Vec<ClassifiedReport>,
}

pub fn classify(hazard: Hazard, reports: &[StormReport]) -> TierSummary {
    let threshold = significant_threshold(hazard);
    let maximum = match threshold {
        Some(_) => reports.iter().filter_map(|x| x.magnitude).max(),
        None => None,
    };

    let reports = reports
        .iter()
        .map(|report| {
            let tier = match (report.magnitude, maximum, threshold) {
                (Some(value), Some(max), _) if value == max => Tier::Maximum,
                (Some(value), _, Some(threshold)) if value >= threshold => Tier::Significant,
                _ => Tier::Ordinary,
            };

            ClassifiedReport {
                location: report.location,
                magnitude: report.magnitude,
                tier,
                style: marker_style(hazard, tier),
            }
        })
        .collect();

    TierSummary {
        hazard,
        maximum,
        reports,
    }
}

impl TierSummary {
    #[cfg(test)]
    pub fn count(&self, tier: Tier) -> usize {
        self.reports.iter().filter(|x| x.tier == tier).count()
    }

    /// Reports at or above the significance threshold, whatever their marker.
    pub fn significant_count(&self) -> usize {
        match significant_threshold(self.hazard) {
            Some(threshold) => self
                .reports
                .iter()
                .filter(|x| x.magnitude.map_or(false, |value| value >= threshold))
                .count(),
            None => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.reports.len()
    }

    /// Legend rows for this hazard. `unknowns_dropped` marks the wind count
    /// with the footnote asterisk.
    pub fn legend_entries(&self, unknowns_dropped: bool) -> Vec<LegendEntry> {
        let entry = |label: String, tier: Tier| LegendEntry {
            label,
            swatch: Swatch::Marker(marker_style(self.hazard, tier)),
        };
        let ordinary = self.total() - self.significant_count();
        let significant = self.significant_count();

        let mut entries = vec![];
        match self.hazard {
            Hazard::Tornado => entries.push(entry(format!("Tornado ({})", self.total()), Tier::Ordinary)),
            Hazard::Wind => {
                let star = if unknowns_dropped { "*" } else { "" };
                entries.push(entry(format!("Wind ({}){}", ordinary, star), Tier::Ordinary));
                entries.push(entry(format!("Sig. Wind ({})", significant), Tier::Significant));
                if let Some(max) = self.maximum {
                    entries.push(entry(format!("Highest wind report ({} mph)", max), Tier::Maximum));
                }
            }
            Hazard::Hail => {
                entries.push(entry(format!("Hail ({})", ordinary), Tier::Ordinary));
                entries.push(entry(format!("Sig. Hail ({})", significant), Tier::Significant));
                if let Some(max) = self.maximum {
                    entries.push(entry(
                        format!("Largest hail report ({:.2}\")", f64::from(max) / 100.0),
                        Tier::Maximum,
                    ));
                }
            }
        }

        entries
    }
}

use super::categories::{Category, StyleTable};
use super::domain::{OutlookKind, StyledPolygon};
use super::error::Error;
use super::kml::{Folder, OutlookDocument};
use super::parser::{classify_folder, LabelSource, Matcher, Regexes, Rule, RuleSet};
use slog::Logger;

// "Extremely Critical" also contains "Critical", so Extreme is tried first.
pub const FIRE: RuleSet = RuleSet {
    kind: OutlookKind::Fire,
    source: LabelSource::Name,
    rules: &[
        Rule {
            matcher: Matcher::Contains("Elevated"),
            category: Category::Elevated,
        },
        Rule {
            matcher: Matcher::Contains("Extreme"),
            category: Category::Extreme,
        },
        Rule {
            matcher: Matcher::Contains("Critical"),
            category: Category::Critical,
        },
    ],
    ignored: &[],
};

pub const DRY_THUNDER: RuleSet = RuleSet {
    kind: OutlookKind::Fire,
    source: LabelSource::Name,
    rules: &[
        Rule {
            matcher: Matcher::Contains("Isolated"),
            category: Category::IsoDryT,
        },
        Rule {
            matcher: Matcher::Contains("Scattered"),
            category: Category::SctDryT,
        },
    ],
    ignored: &[],
};

/**
 * Parses a fire weather outlook: the wind/RH risk areas and the dry
 * thunderstorm areas, each from its own folder.
 */
pub fn parse(
    doc: &OutlookDocument,
    regexes: &Regexes,
    styles: &StyleTable,
    logger: &Logger,
) -> Result<Vec<StyledPolygon>, Error> {
    let is_dry_thunder = |x: &&Folder| x.name.as_deref().map_or(false, |name| regexes.dryltg.is_match(name));
    let dry_thunder = doc.folders.iter().rev().find(is_dry_thunder);
    let fire = doc.folders.iter().rev().find(|x| !is_dry_thunder(x));

    if fire.is_none() && dry_thunder.is_none() {
        return Err(Error::MissingData("no fire data found".to_string()));
    }

    let mut polygons = vec![];
    if let Some(folder) = fire {
        polygons.extend(classify_folder(folder, &FIRE, styles, logger)?);
    }
    if let Some(folder) = dry_thunder {
        polygons.extend(classify_folder(folder, &DRY_THUNDER, styles, logger)?);
    }

    Ok(polygons)
}

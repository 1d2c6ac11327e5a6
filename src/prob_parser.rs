use super::categories::{Category, StyleTable};
use super::domain::{Hazard, OutlookKind, StyledPolygon};
use super::error::Error;
use super::kml::OutlookDocument;
use super::parser::{
    classify_folder, overlay_folder, select_folder, FolderRole, LabelSource, Matcher, Regexes, Rule, RuleSet,
};
use slog::Logger;

pub const TORNADO: RuleSet = RuleSet {
    kind: OutlookKind::Tornado,
    source: LabelSource::Name,
    rules: &[
        Rule {
            matcher: Matcher::Exact("2 %"),
            category: Category::Tor2,
        },
        Rule {
            matcher: Matcher::Exact("5 %"),
            category: Category::Tor5,
        },
        Rule {
            matcher: Matcher::Exact("10 %"),
            category: Category::Tor10,
        },
        Rule {
            matcher: Matcher::Exact("15 %"),
            category: Category::Tor15,
        },
        Rule {
            matcher: Matcher::Exact("30 %"),
            category: Category::Tor30,
        },
        Rule {
            matcher: Matcher::Exact("45 %"),
            category: Category::Tor45,
        },
        Rule {
            matcher: Matcher::Exact("60 %"),
            category: Category::Tor60,
        },
    ],
    ignored: &[],
};

// "10 %" in the wind and hail folders marks the significant-severe area,
// which is drawn from its own folder.
pub const WIND: RuleSet = RuleSet {
    kind: OutlookKind::Wind,
    source: LabelSource::NameOrSimpleData,
    rules: &[
        Rule {
            matcher: Matcher::Exact("5 %"),
            category: Category::Wind5,
        },
        Rule {
            matcher: Matcher::Exact("15 %"),
            category: Category::Wind15,
        },
        Rule {
            matcher: Matcher::Exact("30 %"),
            category: Category::Wind30,
        },
        Rule {
            matcher: Matcher::Exact("45 %"),
            category: Category::Wind45,
        },
        Rule {
            matcher: Matcher::Exact("60 %"),
            category: Category::Wind60,
        },
    ],
    ignored: &["10 %"],
};

pub const HAIL: RuleSet = RuleSet {
    kind: OutlookKind::Hail,
    source: LabelSource::NameOrSimpleData,
    rules: &[
        Rule {
            matcher: Matcher::Exact("5 %"),
            category: Category::Hail5,
        },
        Rule {
            matcher: Matcher::Exact("15 %"),
            category: Category::Hail15,
        },
        Rule {
            matcher: Matcher::Exact("30 %"),
            category: Category::Hail30,
        },
        Rule {
            matcher: Matcher::Exact("45 %"),
            category: Category::Hail45,
        },
        Rule {
            matcher: Matcher::Exact("60 %"),
            category: Category::Hail60,
        },
    ],
    ignored: &["10 %", "0 %"],
};

/**
 * Parses a tornado, wind or hail probability outlook along with its
 * significant-severe (hatched) overlay.
 */
pub fn parse(
    hazard: Hazard,
    doc: &OutlookDocument,
    regexes: &Regexes,
    styles: &StyleTable,
    logger: &Logger,
) -> Result<Vec<StyledPolygon>, Error> {
    let (rules, role, sig_role, sig_category) = match hazard {
        Hazard::Tornado => (&TORNADO, FolderRole::Tornado, FolderRole::SigTornado, Category::SigTor),
        Hazard::Wind => (&WIND, FolderRole::Wind, FolderRole::SigWind, Category::SigWind),
        Hazard::Hail => (&HAIL, FolderRole::Hail, FolderRole::SigHail, Category::SigHail),
    };

    let folder = select_folder(doc, role, regexes, logger)?
        .ok_or_else(|| Error::MissingData(format!("no {} data found", rules.kind)))?;
    let mut polygons = classify_folder(folder, rules, styles, logger)?;

    if let Some(sig) = select_folder(doc, sig_role, regexes, logger)? {
        polygons.extend(overlay_folder(sig, sig_category, styles)?);
    }

    Ok(polygons)
}

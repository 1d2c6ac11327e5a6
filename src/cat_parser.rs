use super::categories::{Category, StyleTable};
use super::domain::{OutlookKind, StyledPolygon};
use super::error::Error;
use super::kml::OutlookDocument;
use super::parser::{classify_folder, select_folder, FolderRole, LabelSource, Matcher, Regexes, Rule, RuleSet};
use slog::Logger;

/// Risk names as they appear in the placemark's extended data. Checked in
/// order, so "High Risk" is only tried after every lower category.
pub const CATEGORICAL: RuleSet = RuleSet {
    kind: OutlookKind::Categorical,
    source: LabelSource::ExtendedData,
    rules: &[
        Rule {
            matcher: Matcher::Contains("General Thunder"),
            category: Category::Tstm,
        },
        Rule {
            matcher: Matcher::Contains("Marginal Risk"),
            category: Category::Mrgl,
        },
        Rule {
            matcher: Matcher::Contains("Slight Risk"),
            category: Category::Slgt,
        },
        Rule {
            matcher: Matcher::Contains("Enhanced Risk"),
            category: Category::Enh,
        },
        Rule {
            matcher: Matcher::Contains("Moderate Risk"),
            category: Category::Mdt,
        },
        Rule {
            matcher: Matcher::Contains("High Risk"),
            category: Category::High,
        },
    ],
    ignored: &[],
};

/**
 * Parses the categorical (TSTM through HIGH) folder of a convective outlook.
 */
pub fn parse(
    doc: &OutlookDocument,
    regexes: &Regexes,
    styles: &StyleTable,
    logger: &Logger,
) -> Result<Vec<StyledPolygon>, Error> {
    let folder = select_folder(doc, FolderRole::Categorical, regexes, logger)?
        .ok_or_else(|| Error::MissingData("no categorical outlook folder".to_string()))?;

    classify_folder(folder, &CATEGORICAL, styles, logger)
}

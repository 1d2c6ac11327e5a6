use super::cat_parser;
use super::categories::{Category, StyleTable};
use super::domain::{Hazard, OutlookKind, StyledPolygon};
use super::error::Error;
use super::fire_parser;
use super::kml::{parse_ring, Folder, OutlookDocument, Placemark};
use super::prob_parser;
use regex::{Regex, RegexBuilder};
use slog::Logger;

/// Folders of a convective outlook document, in the order SPC writes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderRole {
    Categorical,
    Tornado,
    SigTornado,
    Wind,
    SigWind,
    Hail,
    SigHail,
}

impl FolderRole {
    pub const ALL: [FolderRole; 7] = [
        FolderRole::Categorical,
        FolderRole::Tornado,
        FolderRole::SigTornado,
        FolderRole::Wind,
        FolderRole::SigWind,
        FolderRole::Hail,
        FolderRole::SigHail,
    ];

    /// Position of the folder in documents that predate named folders.
    pub fn fallback_index(self) -> usize {
        match self {
            FolderRole::Categorical => 0,
            FolderRole::Tornado => 1,
            FolderRole::SigTornado => 2,
            FolderRole::Wind => 3,
            FolderRole::SigWind => 4,
            FolderRole::Hail => 5,
            FolderRole::SigHail => 6,
        }
    }

    /// Significant-severe overlay folders, which documents may leave out.
    pub fn is_optional(self) -> bool {
        matches!(self, FolderRole::SigTornado | FolderRole::SigWind | FolderRole::SigHail)
    }
}

pub struct Regexes {
    pub cat: Regex,
    pub torn: Regex,
    pub sigtorn: Regex,
    pub wind: Regex,
    pub sigwind: Regex,
    pub hail: Regex,
    pub sighail: Regex,
    pub dryltg: Regex,
}

impl Regexes {
    pub fn new() -> Result<Regexes, Error> {
        let build = |pattern: &str| RegexBuilder::new(pattern).case_insensitive(true).build();

        Ok(Regexes {
            cat: build(r"_cat\b")?,
            torn: build(r"_torn\b")?,
            sigtorn: build(r"_sigtorn\b")?,
            wind: build(r"_wind\b")?,
            sigwind: build(r"_sigwind\b")?,
            hail: build(r"_hail\b")?,
            sighail: build(r"_sighail\b")?,
            dryltg: build(r"dryltg")?,
        })
    }

    pub fn folder(&self, role: FolderRole) -> &Regex {
        match role {
            FolderRole::Categorical => &self.cat,
            FolderRole::Tornado => &self.torn,
            FolderRole::SigTornado => &self.sigtorn,
            FolderRole::Wind => &self.wind,
            FolderRole::SigWind => &self.sigwind,
            FolderRole::Hail => &self.hail,
            FolderRole::SigHail => &self.sighail,
        }
    }
}

fn is_named(folder: &Folder, pattern: &Regex) -> bool {
    folder.name.as_deref().map_or(false, |name| pattern.is_match(name))
}

/// Finds the folder for `role` by name. Two folders claiming the same role
/// are `FormatDrift`. A document whose folders carry role names is never read
/// by position, so a role it leaves out is `None`. Only documents without any
/// role-named folder fall back to the historical position of a required role.
pub fn select_folder<'a>(
    doc: &'a OutlookDocument,
    role: FolderRole,
    regexes: &Regexes,
    logger: &Logger,
) -> Result<Option<&'a Folder>, Error> {
    let pattern = regexes.folder(role);
    let mut named = doc.folders.iter().filter(|x| is_named(x, pattern));
    if let Some(folder) = named.next() {
        if let Some(other) = named.next() {
            return Err(Error::FormatDrift(format!(
                "{:?} claimed by both {} and {}",
                role,
                folder.name.as_deref().unwrap_or_default(),
                other.name.as_deref().unwrap_or_default()
            )));
        }
        return Ok(Some(folder));
    }

    let role_named = doc
        .folders
        .iter()
        .any(|folder| FolderRole::ALL.iter().any(|x| is_named(folder, regexes.folder(*x))));
    if role_named || role.is_optional() {
        debug!(logger, "no folder for role"; "role" => format!("{:?}", role));
        return Ok(None);
    }

    let index = role.fallback_index();
    let folder = match doc.folders.get(index) {
        Some(folder) => folder,
        None => return Ok(None),
    };

    warn!(logger, "selecting folder by position"; "role" => format!("{:?}", role), "index" => index,
        "name" => folder.name.clone().unwrap_or_default());
    Ok(Some(folder))
}

#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    Contains(&'static str),
    Exact(&'static str),
}

impl Matcher {
    pub fn matches(&self, label: &str) -> bool {
        match self {
            Matcher::Contains(needle) => label.contains(needle),
            Matcher::Exact(value) => label.trim() == *value,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub matcher: Matcher,
    pub category: Category,
}

/// Where a placemark's risk label is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource {
    ExtendedData,
    Name,
    /// The `name` element, or the first `SimpleData` value followed by `" %"`.
    NameOrSimpleData,
}

/// Ordered label rules for one kind of folder. The first matching rule wins;
/// labels listed in `ignored` are skipped without error.
#[derive(Debug, Clone, Copy)]
pub struct RuleSet {
    pub kind: OutlookKind,
    pub source: LabelSource,
    pub rules: &'static [Rule],
    pub ignored: &'static [&'static str],
}

impl RuleSet {
    pub fn label(&self, placemark: &Placemark) -> Result<String, Error> {
        let name = placemark.name.as_ref().map(|x| x.trim().to_string());
        let label = match self.source {
            LabelSource::ExtendedData => Some(placemark.extended_data.clone()),
            LabelSource::Name => name,
            LabelSource::NameOrSimpleData => {
                name.or_else(|| placemark.simple_data.as_ref().map(|x| format!("{} %", x.trim())))
            }
        };

        label.ok_or_else(|| Error::MissingData(format!("{} placemark without a label", self.kind)))
    }

    /// `Ok(None)` for ignored labels, `UnknownCategory` when nothing matches.
    pub fn classify(&self, label: &str) -> Result<Option<Category>, Error> {
        if self.ignored.iter().any(|x| label.trim() == *x) {
            return Ok(None);
        }

        self.rules
            .iter()
            .find(|x| x.matcher.matches(label))
            .map(|x| Some(x.category))
            .ok_or_else(|| Error::UnknownCategory {
                kind: self.kind,
                label: label.trim().to_string(),
            })
    }
}

/// Classifies every placemark in `folder` and emits one polygon per ring.
pub fn classify_folder(
    folder: &Folder,
    rules: &RuleSet,
    styles: &StyleTable,
    logger: &Logger,
) -> Result<Vec<StyledPolygon>, Error> {
    let mut polygons = vec![];

    for placemark in &folder.placemarks {
        let label = rules.label(placemark)?;
        let category = match rules.classify(&label)? {
            Some(category) => category,
            None => {
                debug!(logger, "ignoring placemark"; "kind" => rules.kind.to_string(), "label" => label.trim());
                continue;
            }
        };

        let display = match rules.source {
            LabelSource::ExtendedData => category.code().to_string(),
            _ => label.trim().to_string(),
        };
        polygons.extend(styled_rings(placemark, category, styles, &display)?);
    }

    Ok(polygons)
}

/// Draws every placemark in `folder` with a single category's style, with no
/// label matching. Used for the significant-severe hatched areas.
pub fn overlay_folder(folder: &Folder, category: Category, styles: &StyleTable) -> Result<Vec<StyledPolygon>, Error> {
    let mut polygons = vec![];

    for placemark in &folder.placemarks {
        let label = placemark
            .name
            .clone()
            .or_else(|| placemark.simple_data.clone())
            .unwrap_or_else(|| category.code().to_string());
        polygons.extend(styled_rings(placemark, category, styles, &label)?);
    }

    Ok(polygons)
}

fn styled_rings(
    placemark: &Placemark,
    category: Category,
    styles: &StyleTable,
    label: &str,
) -> Result<Vec<StyledPolygon>, Error> {
    let style = styles.get(category);

    placemark
        .coordinates
        .iter()
        .map(|text| -> Result<StyledPolygon, Error> {
            Ok(StyledPolygon {
                ring: parse_ring(text)?,
                category,
                style,
                label: label.to_string(),
            })
        })
        .collect()
}

/// Extracts the drawable polygons of one outlook kind, lowest z-order first.
pub fn parse(
    kind: OutlookKind,
    doc: &OutlookDocument,
    regexes: &Regexes,
    styles: &StyleTable,
    logger: &Logger,
) -> Result<Vec<StyledPolygon>, Error> {
    let mut polygons = match kind {
        OutlookKind::Categorical => cat_parser::parse(doc, regexes, styles, logger),
        OutlookKind::Tornado => prob_parser::parse(Hazard::Tornado, doc, regexes, styles, logger),
        OutlookKind::Wind => prob_parser::parse(Hazard::Wind, doc, regexes, styles, logger),
        OutlookKind::Hail => prob_parser::parse(Hazard::Hail, doc, regexes, styles, logger),
        OutlookKind::Fire => fire_parser::parse(doc, regexes, styles, logger),
    }?;

    polygons.sort_by_key(|x| x.style.z_order);
    Ok(polygons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{folder, placemark, test_logger};

    const RULES: RuleSet = RuleSet {
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
        ],
        ignored: &["10 %"],
    };

    fn doc(names: &[Option<&str>]) -> OutlookDocument {
        OutlookDocument {
            folders: names.iter().map(|x| folder(*x, vec![])).collect(),
        }
    }

    #[test]
    fn select_folder_should_prefer_name_over_position() {
        let doc = doc(&[Some("x_hail"), Some("x_cat"), Some("x_torn")]);
        let regexes = Regexes::new().unwrap();
        let logger = test_logger();

        let tests = vec![
            (FolderRole::Categorical, "x_cat"),
            (FolderRole::Tornado, "x_torn"),
            (FolderRole::Hail, "x_hail"),
        ];

        tests.iter().for_each(|x| {
            let result = select_folder(&doc, x.0, &regexes, &logger).unwrap().unwrap();
            assert_eq!(result.name.as_deref(), Some(x.1));
        });
    }

    #[test]
    fn select_folder_should_not_confuse_significant_folders() {
        let doc = doc(&[Some("d_sigtorn"), Some("d_torn")]);
        let regexes = Regexes::new().unwrap();
        let logger = test_logger();

        let torn = select_folder(&doc, FolderRole::Tornado, &regexes, &logger).unwrap().unwrap();
        let sigtorn = select_folder(&doc, FolderRole::SigTornado, &regexes, &logger).unwrap().unwrap();
        assert_eq!(torn.name.as_deref(), Some("d_torn"));
        assert_eq!(sigtorn.name.as_deref(), Some("d_sigtorn"));
    }

    #[test]
    fn select_folder_should_fall_back_to_position_for_unnamed_folders() {
        let doc = doc(&[None, None, None, Some("Wind Outlook")]);
        let regexes = Regexes::new().unwrap();
        let logger = test_logger();

        let wind = select_folder(&doc, FolderRole::Wind, &regexes, &logger).unwrap().unwrap();
        assert_eq!(wind.name.as_deref(), Some("Wind Outlook"));

        let hail = select_folder(&doc, FolderRole::Hail, &regexes, &logger).unwrap();
        assert!(hail.is_none());
    }

    #[test]
    fn select_folder_missing_role_in_named_document_should_be_none() {
        // No wind folder: position 3 holds the hail folder, which must not be
        // read as wind.
        let doc = doc(&[Some("d_cat"), Some("d_torn"), Some("d_sigtorn"), Some("d_hail"), Some("d_sighail")]);
        let regexes = Regexes::new().unwrap();
        let logger = test_logger();

        let tests = vec![FolderRole::Wind, FolderRole::SigWind];

        tests.iter().for_each(|x| {
            assert!(select_folder(&doc, *x, &regexes, &logger).unwrap().is_none(), "{:?}", x);
        });
    }

    #[test]
    fn select_folder_should_not_read_optional_roles_by_position() {
        let doc = doc(&[None, None, None, None, None]);
        let regexes = Regexes::new().unwrap();
        let logger = test_logger();

        let tests = vec![FolderRole::SigTornado, FolderRole::SigWind];

        tests.iter().for_each(|x| {
            assert!(select_folder(&doc, *x, &regexes, &logger).unwrap().is_none(), "{:?}", x);
        });
    }

    #[test]
    fn select_folder_duplicate_role_should_be_drift() {
        let doc = doc(&[Some("d_cat"), Some("d_torn"), Some("e_torn")]);
        let regexes = Regexes::new().unwrap();
        let logger = test_logger();

        let result = select_folder(&doc, FolderRole::Tornado, &regexes, &logger);
        assert!(matches!(result, Err(Error::FormatDrift(_))));
    }

    #[test]
    fn rule_set_label_should_fall_back_to_simple_data() {
        let named = placemark(Some("15 %"), "", Some("15"), vec![]);
        let unnamed = placemark(None, "", Some("5"), vec![]);
        let bare = placemark(None, "", None, vec![]);

        assert_eq!(RULES.label(&named).unwrap(), "15 %");
        assert_eq!(RULES.label(&unnamed).unwrap(), "5 %");
        assert!(matches!(RULES.label(&bare), Err(Error::MissingData(_))));
    }

    #[test]
    fn rule_set_classify_should_honor_ignored_and_unknown_labels() {
        assert_eq!(RULES.classify("5 %").unwrap(), Some(Category::Wind5));
        assert_eq!(RULES.classify(" 15 % ").unwrap(), Some(Category::Wind15));
        assert_eq!(RULES.classify("10 %").unwrap(), None);

        match RULES.classify("25 %") {
            Err(Error::UnknownCategory { kind, label }) => {
                assert_eq!(kind, OutlookKind::Wind);
                assert_eq!(label, "25 %");
            }
            other => panic!("expected UnknownCategory, got {:?}", other),
        }
    }

    #[test]
    fn classify_folder_should_emit_one_polygon_per_ring() {
        let folder = folder(
            Some("d_wind"),
            vec![
                placemark(Some("5 %"), "", None, vec!["1,2 3,4 5,6", "7,8 9,10 11,12"]),
                placemark(Some("10 %"), "", None, vec!["1,1 2,2 3,3"]),
                placemark(None, "", Some("15"), vec!["0,0 1,1 2,0"]),
            ],
        );
        let styles = StyleTable::spc();

        let polygons = classify_folder(&folder, &RULES, &styles, &test_logger()).unwrap();

        let summary: Vec<(Category, usize, &str)> = polygons
            .iter()
            .map(|x| (x.category, x.ring.len(), x.label.as_str()))
            .collect();
        assert_eq!(
            summary,
            [(Category::Wind5, 3, "5 %"), (Category::Wind5, 3, "5 %"), (Category::Wind15, 3, "15 %")]
        );
        assert_eq!(polygons[2].style, styles.get(Category::Wind15));
    }

    #[test]
    fn classify_folder_bad_coordinates_should_be_an_error() {
        let folder = folder(Some("d_wind"), vec![placemark(Some("5 %"), "", None, vec!["1,2 oops"])]);
        let result = classify_folder(&folder, &RULES, &StyleTable::spc(), &test_logger());
        assert!(matches!(result, Err(Error::CoordinateParse(_))));
    }
}

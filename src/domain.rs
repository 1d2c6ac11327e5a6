use super::categories::{Category, Style};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A closed polygon path as it appears in a KML `coordinates` element.
pub type Ring = Vec<Coordinates>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlookKind {
    Categorical,
    Tornado,
    Wind,
    Hail,
    Fire,
}

impl fmt::Display for OutlookKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            OutlookKind::Categorical => "categorical",
            OutlookKind::Tornado => "tornado",
            OutlookKind::Wind => "wind",
            OutlookKind::Hail => "hail",
            OutlookKind::Fire => "fire",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Hazard {
    Tornado,
    Wind,
    Hail,
}

/// One drawable outlook area: a single ring with the style of its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledPolygon {
    pub ring: Ring,
    pub category: Category,
    pub style: Style,
    pub label: String,
}

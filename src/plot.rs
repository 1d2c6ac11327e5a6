use super::cache::OutlookCache;
use super::categories::StyleTable;
use super::domain::{Hazard, OutlookKind};
use super::error::Error;
use super::kml;
use super::parser::{self, Regexes};
use super::products::OutlookProduct;
use super::render::{Legend, Marker, Plot, Renderer};
use super::reports::{StormReports, UnknownWind};
use super::tiers::{self, TierSummary};
use super::util::{Config, Fetch};
use chrono::NaiveDate;
use slog::Logger;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const UNKNOWN_WIND_NOTE: &str = "* wind reports only include measured or estimated winds (no UNK reports)";

/// One `[[plots]]` job from the config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotRequest {
    pub kind: OutlookKind,
    pub day: u8,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<u16>,
    #[serde(default)]
    pub include_reports: bool,
    #[serde(default)]
    pub filtered_reports: bool,
    #[serde(default)]
    pub remove_unknowns: bool,
}

fn report_hazards(kind: OutlookKind) -> &'static [Hazard] {
    match kind {
        OutlookKind::Categorical => &[Hazard::Tornado, Hazard::Hail, Hazard::Wind],
        OutlookKind::Tornado => &[Hazard::Tornado],
        OutlookKind::Wind => &[Hazard::Wind],
        OutlookKind::Hail => &[Hazard::Hail],
        OutlookKind::Fire => &[],
    }
}

struct ReportOverlay {
    markers: Vec<Marker>,
    legend: Legend,
    notes: Vec<String>,
}

pub struct Plotter<'a, F: Fetch, R: Renderer> {
    config: &'a Config,
    fetcher: &'a F,
    renderer: &'a R,
    styles: &'a StyleTable,
    regexes: Regexes,
    logger: &'a Logger,
}

impl<'a, F: Fetch, R: Renderer> Plotter<'a, F, R> {
    pub fn new(
        config: &'a Config,
        fetcher: &'a F,
        renderer: &'a R,
        styles: &'a StyleTable,
        logger: &'a Logger,
    ) -> Result<Plotter<'a, F, R>, Error> {
        Ok(Plotter {
            config,
            fetcher,
            renderer,
            styles,
            regexes: Regexes::new()?,
            logger,
        })
    }

    /// Fetches (or reuses) the outlook, classifies it, overlays storm reports
    /// when asked, and renders the image. Returns the image path.
    pub fn plot(&self, request: &PlotRequest) -> Result<PathBuf, Error> {
        let start = Instant::now();
        let product = OutlookProduct::new(request.kind, request.day, request.date, request.time)?;

        let url = product.url(&self.config.outlook_archive_url, &self.config.fire_archive_url);
        let cache = OutlookCache::new(&self.config.outlook_kmz_dir, self.fetcher, self.logger);
        let kmz = cache.ensure(&product, &url)?;

        let text = kml::read_kmz(&kmz, &product.kml_name())?;
        let doc = kml::parse_document(&text)?;
        let polygons = parser::parse(product.kind, &doc, &self.regexes, self.styles, self.logger)?;

        let mut legends = vec![self.styles.legend(product.kind)];
        let mut markers = vec![];
        let mut notes = vec![];
        if request.include_reports {
            if let Some(overlay) = self.report_overlay(&product, request)? {
                markers = overlay.markers;
                legends.push(overlay.legend);
                notes = overlay.notes;
            }
        }

        fs::create_dir_all(&self.config.image_dir)?;
        let path = Path::new(&self.config.image_dir).join(product.image_name());
        let plot = Plot {
            title: product.title(),
            path: path.clone(),
            polygons,
            markers,
            legends,
            notes,
        };

        for legend in &plot.legends {
            let labels: Vec<&str> = legend.entries.iter().map(|x| x.label.as_str()).collect();
            debug!(self.logger, "legend"; "title" => &legend.title, "entries" => labels.join(", "));
        }
        self.renderer.render(&plot)?;

        info!(self.logger, "plotted outlook"; "title" => &plot.title, "file" => path.display().to_string(),
            "polygons" => plot.polygons.len(), "markers" => plot.markers.len(),
            "elapsed_ms" => start.elapsed().as_millis() as u64);
        Ok(path)
    }

    fn report_overlay(&self, product: &OutlookProduct, request: &PlotRequest) -> Result<Option<ReportOverlay>, Error> {
        let hazards = report_hazards(product.kind);
        if hazards.is_empty() {
            debug!(self.logger, "no storm reports for outlook"; "kind" => product.kind.to_string());
            return Ok(None);
        }

        let reports = StormReports::new(&self.config.reports_url, product.date);
        let unknown_wind = if request.remove_unknowns {
            UnknownWind::Drop
        } else {
            UnknownWind::Floor
        };

        let summaries = hazards
            .iter()
            .map(|hazard| -> Result<TierSummary, Error> {
                let loaded = reports.load(self.fetcher, *hazard, request.filtered_reports, unknown_wind, self.logger)?;
                Ok(tiers::classify(*hazard, &loaded))
            })
            .collect::<Result<Vec<TierSummary>, Error>>()?;

        let unknowns_dropped = request.remove_unknowns && hazards.contains(&Hazard::Wind);
        let total: usize = summaries.iter().map(|x| x.total()).sum();

        let mut markers: Vec<Marker> = summaries
            .iter()
            .flat_map(|x| x.reports.iter())
            .map(|x| Marker {
                location: x.location,
                style: x.style,
            })
            .collect();
        markers.sort_by_key(|x| x.style.z_order);

        let legend = Legend {
            title: report_legend_title(hazards, request.filtered_reports, unknowns_dropped, total),
            entries: summaries
                .iter()
                .flat_map(|x| x.legend_entries(unknowns_dropped))
                .collect(),
        };

        let notes = if unknowns_dropped {
            vec![UNKNOWN_WIND_NOTE.to_string()]
        } else {
            vec![]
        };

        Ok(Some(ReportOverlay { markers, legend, notes }))
    }
}

fn report_legend_title(hazards: &[Hazard], filtered: bool, unknowns_dropped: bool, total: usize) -> String {
    let noun = match hazards {
        [Hazard::Tornado] => "tornado reports",
        [Hazard::Wind] => "wind reports",
        [Hazard::Hail] => "hail reports",
        _ => "storm reports",
    };

    let mut title = if filtered {
        format!("Filtered {} ({})", noun, total)
    } else {
        let mut chars = noun.chars();
        match chars.next() {
            Some(first) => format!("{}{} ({})", first.to_ascii_uppercase(), chars.as_str(), total),
            None => format!("({})", total),
        }
    };

    // Only single-hazard wind legends carry the asterisk in the title.
    if unknowns_dropped && hazards == [Hazard::Wind] {
        title.push('*');
    }
    title
}

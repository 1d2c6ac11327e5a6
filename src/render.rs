use super::categories::{Rgb, Style};
use super::domain::{Coordinates, StyledPolygon};
use super::error::Error;
use super::tiers::{MarkerShape, MarkerStyle};
use plotters::coord::Shift;
use plotters::prelude::{
    BitMapBackend, Circle, Color, DrawingArea, FontStyle, IntoDrawingArea, IntoFont, PathElement, Polygon, RGBColor,
    Rectangle, ShapeStyle, Text, TextStyle, BLACK, WHITE,
};
use plotters::style::register_font;
use std::f64::consts::PI;
use std::fmt::Display;
use std::path::PathBuf;

// Plate carrée extent of the contiguous US.
pub const MIN_LON: f64 = -127.0;
pub const MAX_LON: f64 = -65.0;
pub const MIN_LAT: f64 = 20.0;
pub const MAX_LAT: f64 = 50.0;

const GRATICULE_STEP: f64 = 5.0;
const DASH_ON: f64 = 0.4;
const DASH_OFF: f64 = 0.25;

const FONT_FAMILY: &str = "sans-serif";
const FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
const TITLE_SIZE: u32 = 18;
const LABEL_SIZE: u32 = 12;
const MARGIN: i32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Swatch {
    Area(Style),
    Marker(MarkerStyle),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub swatch: Swatch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub location: Coordinates,
    pub style: MarkerStyle,
}

/// Everything needed to draw one outlook image. Polygons and markers are
/// expected in ascending z-order.
#[derive(Debug, Clone, Serialize)]
pub struct Plot {
    pub title: String,
    pub path: PathBuf,
    pub polygons: Vec<StyledPolygon>,
    pub markers: Vec<Marker>,
    pub legends: Vec<Legend>,
    pub notes: Vec<String>,
}

pub trait Renderer {
    fn render(&self, plot: &Plot) -> Result<(), Error>;
}

/// Draws plots to PNG with `plotters`, using the bundled DejaVu Sans for
/// the title, legends and notes.
pub struct BitmapRenderer {
    width: u32,
    height: u32,
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn render_error<E: Display>(err: E) -> Error {
    Error::Render(err.to_string())
}

fn color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.r, rgb.g, rgb.b)
}

fn text_style(size: u32) -> TextStyle<'static> {
    TextStyle::from((FONT_FAMILY, size).into_font()).color(&BLACK)
}

impl BitmapRenderer {
    pub fn new(width: u32, height: u32) -> Result<BitmapRenderer, Error> {
        register_font(FONT_FAMILY, FontStyle::Normal, FONT)
            .map_err(|_| Error::Render("bundled font is not a usable TrueType font".to_string()))?;
        Ok(BitmapRenderer { width, height })
    }

    pub fn project(&self, location: Coordinates) -> (i32, i32) {
        let x = (location.lon - MIN_LON) / (MAX_LON - MIN_LON) * f64::from(self.width);
        let y = (MAX_LAT - location.lat) / (MAX_LAT - MIN_LAT) * f64::from(self.height);
        (x.round() as i32, y.round() as i32)
    }

    fn project_all(&self, ring: &[Coordinates]) -> Vec<(i32, i32)> {
        ring.iter().map(|x| self.project(*x)).collect()
    }

    fn draw_graticule(&self, root: &Area) -> Result<(), Error> {
        let style = RGBColor(220, 220, 220).stroke_width(1);

        let mut lon = MIN_LON;
        while lon <= MAX_LON {
            let line = vec![
                self.project(Coordinates { lat: MIN_LAT, lon }),
                self.project(Coordinates { lat: MAX_LAT, lon }),
            ];
            root.draw(&PathElement::new(line, style)).map_err(render_error)?;
            lon += GRATICULE_STEP;
        }

        let mut lat = MIN_LAT;
        while lat <= MAX_LAT {
            let line = vec![
                self.project(Coordinates { lat, lon: MIN_LON }),
                self.project(Coordinates { lat, lon: MAX_LON }),
            ];
            root.draw(&PathElement::new(line, style)).map_err(render_error)?;
            lat += GRATICULE_STEP;
        }

        Ok(())
    }

    fn draw_polygon(&self, root: &Area, polygon: &StyledPolygon) -> Result<(), Error> {
        let style = &polygon.style;
        let points = self.project_all(&polygon.ring);
        if points.len() < 2 {
            return Ok(());
        }

        if let Some(fill) = style.fill {
            root.draw(&Polygon::new(points.clone(), color(fill).filled()))
                .map_err(render_error)?;
        } else if style.hatched {
            root.draw(&Polygon::new(points.clone(), color(style.outline).mix(0.2).filled()))
                .map_err(render_error)?;
        }

        let stroke = color(style.outline).stroke_width(style.line_width.ceil().max(1.0) as u32);
        if style.dashed {
            for dash in dashes(&polygon.ring, DASH_ON, DASH_OFF) {
                root.draw(&PathElement::new(self.project_all(&dash), stroke))
                    .map_err(render_error)?;
            }
        } else {
            root.draw(&PathElement::new(points, stroke)).map_err(render_error)?;
        }

        Ok(())
    }

    fn draw_marker(&self, root: &Area, center: (i32, i32), style: &MarkerStyle) -> Result<(), Error> {
        // Marker size is an area in square points, as in the legend.
        let radius = ((f64::from(style.size)).sqrt() * 1.5).max(2.0);
        let face: ShapeStyle = color(style.face).filled();
        let edge: ShapeStyle = color(style.edge).stroke_width(1);
        let r = radius.round() as i32;

        match style.shape {
            MarkerShape::Circle => {
                root.draw(&Circle::new(center, r, face)).map_err(render_error)?;
                root.draw(&Circle::new(center, r, edge)).map_err(render_error)?;
            }
            MarkerShape::Square => {
                let corners = [(center.0 - r, center.1 - r), (center.0 + r, center.1 + r)];
                root.draw(&Rectangle::new(corners, face)).map_err(render_error)?;
                root.draw(&Rectangle::new(corners, edge)).map_err(render_error)?;
            }
            MarkerShape::Triangle | MarkerShape::Star => {
                let points = match style.shape {
                    MarkerShape::Triangle => regular_points(center, radius, radius, 3),
                    _ => regular_points(center, radius, radius * 0.45, 5),
                };
                root.draw(&Polygon::new(points.clone(), face)).map_err(render_error)?;
                let mut outline = points;
                if let Some(first) = outline.first().copied() {
                    outline.push(first);
                }
                root.draw(&PathElement::new(outline, edge)).map_err(render_error)?;
            }
        }

        Ok(())
    }

    fn draw_title(&self, root: &Area, title: &str) -> Result<(), Error> {
        root.draw(&Text::new(title, (MARGIN, MARGIN), &text_style(TITLE_SIZE)))
            .map_err(render_error)
    }

    // Legend boxes sit along the bottom edge, the last legend rightmost.
    fn draw_legends(&self, root: &Area, legends: &[Legend]) -> Result<(), Error> {
        let size = 12;
        let gap = 4;
        let row = size + gap + 2;
        let style = text_style(LABEL_SIZE);
        let bottom = self.height as i32 - MARGIN;
        let mut right = self.width as i32 - MARGIN;

        for legend in legends.iter().rev() {
            let mut width = root.estimate_text_size(&legend.title, &style).map_err(render_error)?.0 as i32;
            for entry in &legend.entries {
                let label = root.estimate_text_size(&entry.label, &style).map_err(render_error)?.0 as i32;
                width = width.max(size + gap + label);
            }

            let left = right - width - 2 * gap;
            let top = bottom - (legend.entries.len() as i32 + 1) * row - gap;
            let frame = [(left, top), (right, bottom)];
            root.draw(&Rectangle::new(frame, WHITE.filled())).map_err(render_error)?;
            root.draw(&Rectangle::new(frame, BLACK.stroke_width(1))).map_err(render_error)?;

            let x = left + gap;
            let mut y = top + gap;
            root.draw(&Text::new(legend.title.as_str(), (x, y), &style))
                .map_err(render_error)?;

            for entry in &legend.entries {
                y += row;
                match &entry.swatch {
                    Swatch::Area(area) => {
                        let corners = [(x, y), (x + size, y + size)];
                        let fill = area.fill.map(color).unwrap_or(WHITE);
                        root.draw(&Rectangle::new(corners, fill.filled())).map_err(render_error)?;
                        root.draw(&Rectangle::new(corners, color(area.outline).stroke_width(1)))
                            .map_err(render_error)?;
                    }
                    Swatch::Marker(marker) => {
                        self.draw_marker(root, (x + size / 2, y + size / 2), marker)?;
                    }
                }
                root.draw(&Text::new(entry.label.as_str(), (x + size + gap, y), &style))
                    .map_err(render_error)?;
            }

            right = left - gap;
        }

        Ok(())
    }

    // Notes stack upward from the bottom-left corner.
    fn draw_notes(&self, root: &Area, notes: &[String]) -> Result<(), Error> {
        let style = text_style(LABEL_SIZE);
        let line = LABEL_SIZE as i32 + 4;

        for (i, note) in notes.iter().rev().enumerate() {
            let y = self.height as i32 - MARGIN - (i as i32 + 1) * line;
            root.draw(&Text::new(note.as_str(), (MARGIN, y), &style))
                .map_err(render_error)?;
        }

        Ok(())
    }
}

impl Renderer for BitmapRenderer {
    fn render(&self, plot: &Plot) -> Result<(), Error> {
        let root = BitMapBackend::new(&plot.path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        self.draw_graticule(&root)?;
        for polygon in &plot.polygons {
            self.draw_polygon(&root, polygon)?;
        }
        for marker in &plot.markers {
            self.draw_marker(&root, self.project(marker.location), &marker.style)?;
        }
        self.draw_title(&root, &plot.title)?;
        self.draw_legends(&root, &plot.legends)?;
        self.draw_notes(&root, &plot.notes)?;

        root.present().map_err(render_error)?;
        Ok(())
    }
}

/// Splits a path into dash segments of `on` degrees separated by `off`
/// degrees of gap, measured along the path.
pub fn dashes(ring: &[Coordinates], on: f64, off: f64) -> Vec<Vec<Coordinates>> {
    let mut result = vec![];
    let mut current: Vec<Coordinates> = vec![];
    let mut drawing = true;
    let mut remaining = on;

    for pair in ring.windows(2) {
        let (mut start, end) = (pair[0], pair[1]);
        let mut length = ((end.lon - start.lon).powi(2) + (end.lat - start.lat).powi(2)).sqrt();

        while length > 0.0 {
            if drawing && current.is_empty() {
                current.push(start);
            }

            let step = remaining.min(length);
            let t = step / length;
            let next = Coordinates {
                lat: start.lat + (end.lat - start.lat) * t,
                lon: start.lon + (end.lon - start.lon) * t,
            };
            if drawing {
                current.push(next);
            }

            remaining -= step;
            length -= step;
            start = next;

            if remaining <= 0.0 {
                if drawing {
                    result.push(std::mem::take(&mut current));
                }
                drawing = !drawing;
                remaining = if drawing { on } else { off };
            }
        }
    }

    if current.len() > 1 {
        result.push(current);
    }
    result
}

// Vertices of a regular polygon or star, first point straight up.
fn regular_points(center: (i32, i32), outer: f64, inner: f64, points: usize) -> Vec<(i32, i32)> {
    let corners = if (outer - inner).abs() < f64::EPSILON {
        points
    } else {
        points * 2
    };

    (0..corners)
        .map(|i| {
            let radius = if i % 2 == 1 && corners != points { inner } else { outer };
            let angle = -PI / 2.0 + 2.0 * PI * i as f64 / corners as f64;
            (
                center.0 + (radius * angle.cos()).round() as i32,
                center.1 + (radius * angle.sin()).round() as i32,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::{Category, StyleTable};
    use crate::domain::{Hazard, OutlookKind};
    use crate::tiers::{marker_style, Tier};

    fn square() -> Vec<Coordinates> {
        vec![
            Coordinates { lat: 30.0, lon: -100.0 },
            Coordinates { lat: 30.0, lon: -98.0 },
            Coordinates { lat: 32.0, lon: -98.0 },
            Coordinates { lat: 32.0, lon: -100.0 },
            Coordinates { lat: 30.0, lon: -100.0 },
        ]
    }

    #[test]
    fn project_should_map_extent_to_image_corners() {
        let renderer = BitmapRenderer::new(620, 300).unwrap();
        let tests = vec![
            (Coordinates { lat: MAX_LAT, lon: MIN_LON }, (0, 0)),
            (Coordinates { lat: MIN_LAT, lon: MAX_LON }, (620, 300)),
            (Coordinates { lat: 35.0, lon: -96.0 }, (310, 150)),
        ];

        tests.iter().for_each(|x| {
            assert_eq!(renderer.project(x.0), x.1, "{:?}", x.0);
        });
    }

    #[test]
    fn dashes_should_alternate_along_the_path() {
        let result = dashes(&square(), 1.0, 1.0);

        // An 8 degree perimeter gives four 1 degree dashes.
        assert_eq!(result.len(), 4);
        assert!(result.iter().all(|x| x.len() >= 2));
        assert_eq!(result[0][0], Coordinates { lat: 30.0, lon: -100.0 });
        assert_eq!(*result[0].last().unwrap(), Coordinates { lat: 30.0, lon: -99.0 });
    }

    #[test]
    fn regular_points_should_build_triangles_and_stars() {
        assert_eq!(regular_points((0, 0), 10.0, 10.0, 3).len(), 3);
        let star = regular_points((0, 0), 10.0, 4.0, 5);
        assert_eq!(star.len(), 10);
        assert_eq!(star[0], (0, -10));
    }

    #[test]
    fn render_should_write_png() {
        let dir = tempfile::tempdir().unwrap();
        let styles = StyleTable::spc();
        let polygon = |category: Category| StyledPolygon {
            ring: square(),
            category,
            style: styles.get(category),
            label: category.code().to_string(),
        };

        let plot = Plot {
            title: "2019-05-20 1300 UTC Day 1 Convective Outlook".to_string(),
            path: dir.path().join("plot.png"),
            polygons: vec![polygon(Category::Slgt), polygon(Category::SigTor), polygon(Category::IsoDryT)],
            markers: vec![
                Marker {
                    location: Coordinates { lat: 31.0, lon: -99.0 },
                    style: marker_style(Hazard::Wind, Tier::Maximum),
                },
                Marker {
                    location: Coordinates { lat: 31.5, lon: -99.5 },
                    style: marker_style(Hazard::Hail, Tier::Significant),
                },
                Marker {
                    location: Coordinates { lat: 30.5, lon: -98.5 },
                    style: marker_style(Hazard::Tornado, Tier::Ordinary),
                },
            ],
            legends: vec![styles.legend(OutlookKind::Categorical)],
            notes: vec![],
        };

        BitmapRenderer::new(320, 200).unwrap().render(&plot).unwrap();

        let bytes = std::fs::read(dir.path().join("plot.png")).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn render_should_draw_title_legend_labels_and_notes() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = BitmapRenderer::new(480, 320).unwrap();
        let plot = |name: &str, title: &str, label: &str, note: Option<&str>| Plot {
            title: title.to_string(),
            path: dir.path().join(name),
            polygons: vec![],
            markers: vec![],
            legends: vec![Legend {
                title: "Storm reports (2)".to_string(),
                entries: vec![LegendEntry {
                    label: label.to_string(),
                    swatch: Swatch::Marker(marker_style(Hazard::Wind, Tier::Ordinary)),
                }],
            }],
            notes: note.iter().map(|x| x.to_string()).collect(),
        };

        renderer.render(&plot("blank.png", "", "", None)).unwrap();
        let blank = std::fs::read(dir.path().join("blank.png")).unwrap();

        // Each image differs from the blank one only by a piece of text.
        let tests = vec![
            plot("title.png", "Day 1 Wind Outlook", "", None),
            plot("label.png", "", "Wind (2)*", None),
            plot("note.png", "", "", Some("* no UNK reports")),
        ];

        tests.iter().for_each(|x| {
            renderer.render(x).unwrap();
            assert_ne!(std::fs::read(&x.path).unwrap(), blank, "{:?}", x.path);
        });
    }
}

use super::domain::{Coordinates, Hazard};
use super::error::Error;
use super::util::Fetch;
use chrono::NaiveDate;
use slog::Logger;

/// Speed assigned to `UNK` wind reports when they are kept.
pub const UNKNOWN_WIND_FLOOR_MPH: u32 = 58;

/// What to do with wind reports whose speed is `UNK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownWind {
    Floor,
    Drop,
}

/// One storm report. `magnitude` is mph for wind, hundredths of an inch for
/// hail, and absent for tornadoes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StormReport {
    pub magnitude: Option<u32>,
    pub location: Coordinates,
}

#[derive(Debug, Deserialize)]
struct TornadoRow {
    #[serde(rename = "Lat")]
    lat: f64,
    #[serde(rename = "Lon")]
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct WindRow {
    #[serde(rename = "Speed")]
    speed: String,
    #[serde(rename = "Lat")]
    lat: f64,
    #[serde(rename = "Lon")]
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct HailRow {
    #[serde(rename = "Size")]
    size: String,
    #[serde(rename = "Lat")]
    lat: f64,
    #[serde(rename = "Lon")]
    lon: f64,
}

/// The daily storm report files for one date.
pub struct StormReports {
    base_link: String,
}

impl StormReports {
    pub fn new(reports_url: &str, date: NaiveDate) -> StormReports {
        StormReports {
            base_link: format!("{}/{}_rpts", reports_url.trim_end_matches('/'), date.format("%y%m%d")),
        }
    }

    pub fn url(&self, hazard: Hazard, filtered: bool) -> String {
        let report_set = if filtered { "_filtered" } else { "" };
        let suffix = match hazard {
            Hazard::Tornado => "torn",
            Hazard::Wind => "wind",
            Hazard::Hail => "hail",
        };
        format!("{}{}_{}.csv", self.base_link, report_set, suffix)
    }

    pub fn load<F: Fetch>(
        &self,
        fetcher: &F,
        hazard: Hazard,
        filtered: bool,
        unknown_wind: UnknownWind,
        logger: &Logger,
    ) -> Result<Vec<StormReport>, Error> {
        let url = self.url(hazard, filtered);
        let body = fetcher.fetch_bytes(&url)?;

        let reports = match hazard {
            Hazard::Tornado => parse_tornado_reports(&body),
            Hazard::Wind => parse_wind_reports(&body, unknown_wind),
            Hazard::Hail => parse_hail_reports(&body),
        }?;

        debug!(logger, "loaded storm reports"; "url" => url, "count" => reports.len());
        Ok(reports)
    }
}

fn reader(body: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body)
}

fn parse_magnitude(column: &str, value: &str) -> Result<u32, Error> {
    value
        .parse::<u32>()
        .map_err(|_| Error::ReportParse(format!("{} value {:?}", column, value)))
}

pub fn parse_tornado_reports(body: &[u8]) -> Result<Vec<StormReport>, Error> {
    reader(body)
        .deserialize::<TornadoRow>()
        .map(|row| -> Result<StormReport, Error> {
            let row = row?;
            Ok(StormReport {
                magnitude: None,
                location: Coordinates { lat: row.lat, lon: row.lon },
            })
        })
        .collect()
}

pub fn parse_wind_reports(body: &[u8], unknown_wind: UnknownWind) -> Result<Vec<StormReport>, Error> {
    let mut reports = vec![];

    for row in reader(body).deserialize::<WindRow>() {
        let row = row?;
        let speed = if row.speed.eq_ignore_ascii_case("UNK") {
            match unknown_wind {
                UnknownWind::Floor => UNKNOWN_WIND_FLOOR_MPH,
                UnknownWind::Drop => continue,
            }
        } else {
            parse_magnitude("Speed", &row.speed)?
        };

        reports.push(StormReport {
            magnitude: Some(speed),
            location: Coordinates { lat: row.lat, lon: row.lon },
        });
    }

    Ok(reports)
}

pub fn parse_hail_reports(body: &[u8]) -> Result<Vec<StormReport>, Error> {
    reader(body)
        .deserialize::<HailRow>()
        .map(|row| -> Result<StormReport, Error> {
            let row = row?;
            Ok(StormReport {
                magnitude: Some(parse_magnitude("Size", &row.size)?),
                location: Coordinates { lat: row.lat, lon: row.lon },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{get_bytes_from_file, test_logger, CountingFetcher};

    fn magnitudes(reports: &[StormReport]) -> Vec<Option<u32>> {
        reports.iter().map(|x| x.magnitude).collect()
    }

    #[test]
    fn url_should_follow_report_archive_layout() {
        let date = NaiveDate::from_ymd_opt(2019, 5, 20).unwrap();
        let reports = StormReports::new("https://www.spc.noaa.gov/climo/reports/", date);

        let tests = vec![
            (Hazard::Tornado, false, "https://www.spc.noaa.gov/climo/reports/190520_rpts_torn.csv"),
            (Hazard::Wind, false, "https://www.spc.noaa.gov/climo/reports/190520_rpts_wind.csv"),
            (Hazard::Hail, true, "https://www.spc.noaa.gov/climo/reports/190520_rpts_filtered_hail.csv"),
        ];

        tests.iter().for_each(|x| {
            assert_eq!(reports.url(x.0, x.1), x.2);
        });
    }

    #[test]
    fn parse_tornado_reports_happy_path() {
        let result = parse_tornado_reports(&get_bytes_from_file("data/reports/190520_rpts_torn.csv")).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].magnitude, None);
        assert_eq!(result[1].location, Coordinates { lat: 35.84, lon: -99.73 });
    }

    #[test]
    fn parse_wind_reports_should_floor_or_drop_unknowns() {
        let body = get_bytes_from_file("data/reports/190520_rpts_wind.csv");

        let floored = parse_wind_reports(&body, UnknownWind::Floor).unwrap();
        assert_eq!(magnitudes(&floored), [Some(58), Some(65), Some(80), Some(100)]);

        let dropped = parse_wind_reports(&body, UnknownWind::Drop).unwrap();
        assert_eq!(magnitudes(&dropped), [Some(65), Some(80), Some(100)]);
        assert_eq!(dropped[0].location, Coordinates { lat: 34.61, lon: -98.41 });
    }

    #[test]
    fn parse_hail_reports_happy_path() {
        let result = parse_hail_reports(&get_bytes_from_file("data/reports/190520_rpts_hail.csv")).unwrap();
        assert_eq!(magnitudes(&result), [Some(100), Some(175), Some(225), Some(225)]);
    }

    #[test]
    fn header_only_file_should_yield_no_reports() {
        let body = b"Time,Speed,Location,County,State,Lat,Lon,Comments\n";
        assert!(parse_wind_reports(body, UnknownWind::Floor).unwrap().is_empty());
    }

    #[test]
    fn bad_magnitude_should_be_report_parse() {
        let tests = vec![
            "Time,Speed,Location,County,State,Lat,Lon,Comments\n1200,fast,X,Y,OK,35.0,-97.0,\n",
            "Time,Speed,Location,County,State,Lat,Lon,Comments\n1200,-5,X,Y,OK,35.0,-97.0,\n",
        ];

        tests.iter().for_each(|x| {
            let result = parse_wind_reports(x.as_bytes(), UnknownWind::Floor);
            assert!(matches!(result, Err(Error::ReportParse(_))), "{:?}", x);
        });

        let hail = "Time,Size,Location,County,State,Lat,Lon,Comments\n1200,1.75,X,Y,OK,35.0,-97.0,\n";
        assert!(matches!(parse_hail_reports(hail.as_bytes()), Err(Error::ReportParse(_))));
    }

    #[test]
    fn bad_coordinates_should_be_csv_error() {
        let body = "Time,F_Scale,Location,County,State,Lat,Lon,Comments\n1200,UNK,X,Y,OK,north,-97.0,\n";
        assert!(matches!(parse_tornado_reports(body.as_bytes()), Err(Error::Csv(_))));
    }

    #[test]
    fn load_should_fetch_requested_report_set() {
        let date = NaiveDate::from_ymd_opt(2019, 5, 20).unwrap();
        let reports = StormReports::new("https://example.com/reports", date);
        let url = "https://example.com/reports/190520_rpts_filtered_hail.csv";
        let fetcher =
            CountingFetcher::new().with_response(url, get_bytes_from_file("data/reports/190520_rpts_hail.csv"));

        let result = reports
            .load(&fetcher, Hazard::Hail, true, UnknownWind::Floor, &test_logger())
            .unwrap();

        assert_eq!(result.len(), 4);
        assert_eq!(fetcher.calls(), vec![url.to_string()]);
    }

    #[test]
    fn load_missing_report_file_should_be_not_found() {
        let date = NaiveDate::from_ymd_opt(2019, 5, 20).unwrap();
        let reports = StormReports::new("https://example.com/reports", date);
        let fetcher = CountingFetcher::new();

        let result = reports.load(&fetcher, Hazard::Tornado, false, UnknownWind::Floor, &test_logger());
        assert!(matches!(result, Err(Error::NotFound { status: 404, .. })));
    }
}

use super::domain::OutlookKind;
use super::error::Error;
use chrono::{Datelike, NaiveDate};

// Issuance times by outlook day, HHMM UTC.
pub const VALID_CONVECTIVE_TIMES: [&[u16]; 3] = [&[1200, 1300, 1630, 2000, 100], &[600, 1730], &[730]];
pub const VALID_FIRE_TIMES: [&[u16]; 2] = [&[1200, 1700], &[1200, 2000]];

const MAX_CATEGORICAL_DAY: u8 = 8;
const MAX_PROBABILISTIC_DAY: u8 = 2;

/// Identifies a single published outlook. Construction validates the day and
/// issuance time so nothing is fetched for a product that cannot exist.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlookProduct {
    pub kind: OutlookKind,
    pub day: u8,
    pub date: NaiveDate,
    pub time: Option<u16>,
}

impl OutlookProduct {
    pub fn new(kind: OutlookKind, day: u8, date: NaiveDate, time: Option<u16>) -> Result<OutlookProduct, Error> {
        let max_day = match kind {
            OutlookKind::Categorical => MAX_CATEGORICAL_DAY,
            OutlookKind::Tornado | OutlookKind::Wind | OutlookKind::Hail => MAX_PROBABILISTIC_DAY,
            OutlookKind::Fire => VALID_FIRE_TIMES.len() as u8,
        };
        if day == 0 || day > max_day {
            return Err(Error::InvalidDay { kind, day });
        }

        let valid = match kind {
            OutlookKind::Fire => VALID_FIRE_TIMES[day as usize - 1],
            _ if (day as usize) <= VALID_CONVECTIVE_TIMES.len() => VALID_CONVECTIVE_TIMES[day as usize - 1],
            // Extended-range categorical outlooks carry no issuance time
            _ => {
                return Ok(OutlookProduct {
                    kind,
                    day,
                    date,
                    time: None,
                })
            }
        };

        match time {
            Some(t) if valid.contains(&t) => Ok(OutlookProduct { kind, day, date, time }),
            _ => Err(Error::InvalidTime {
                kind,
                day,
                time,
                valid: valid.to_vec(),
            }),
        }
    }

    fn time_suffix(&self) -> String {
        match self.time {
            Some(time) => format!("_{:04}", time),
            None => String::new(),
        }
    }

    fn stem(&self) -> String {
        match self.kind {
            OutlookKind::Fire => format!(
                "{}_{:04}_day{}firewx",
                self.date.format("%y%m%d"),
                self.time.unwrap_or_default(),
                self.day
            ),
            _ => format!("day{}otlk_{}{}", self.day, self.date.format("%Y%m%d"), self.time_suffix()),
        }
    }

    /// File name of the KMZ archive, also the cache key.
    pub fn kmz_name(&self) -> String {
        format!("{}.kmz", self.stem())
    }

    /// Name of the KML document inside the archive.
    pub fn kml_name(&self) -> String {
        format!("{}.kml", self.stem())
    }

    pub fn url(&self, outlook_archive_url: &str, fire_archive_url: &str) -> String {
        let base = match self.kind {
            OutlookKind::Fire => fire_archive_url,
            _ => outlook_archive_url,
        };
        format!("{}/{}/{}", base.trim_end_matches('/'), self.date.year(), self.kmz_name())
    }

    pub fn image_name(&self) -> String {
        let day = format!("day{}otlk_{}{}", self.day, self.date.format("%Y%m%d"), self.time_suffix());
        match self.kind {
            OutlookKind::Categorical => format!("{}_cat.png", day),
            OutlookKind::Tornado => format!("{}_torn.png", day),
            OutlookKind::Wind => format!("{}_wind.png", day),
            OutlookKind::Hail => format!("{}_hail.png", day),
            OutlookKind::Fire => format!("firewx_{}.png", day),
        }
    }

    pub fn title(&self) -> String {
        let issued = match self.time {
            Some(time) => format!("{} {:04} UTC", self.date.format("%Y-%m-%d"), time),
            None => self.date.format("%Y-%m-%d").to_string(),
        };
        let product = match self.kind {
            OutlookKind::Categorical => "Convective Outlook",
            OutlookKind::Tornado => "Convective Outlook: Tornado",
            OutlookKind::Wind => "Convective Outlook: Wind",
            OutlookKind::Hail => "Convective Outlook: Hail",
            OutlookKind::Fire => "Fire Weather Outlook",
        };
        format!("{} Day {} {}", issued, self.day, product)
    }
}

use super::domain::OutlookKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{url} not found (status {status})")]
    NotFound { url: String, status: u16 },

    #[error("day {day} {kind} outlooks {}", describe_time(.time, .valid))]
    InvalidTime {
        kind: OutlookKind,
        day: u8,
        time: Option<u16>,
        valid: Vec<u16>,
    },

    #[error("{kind} outlooks are not issued for day {day}")]
    InvalidDay { kind: OutlookKind, day: u8 },

    #[error("missing data: {0}")]
    MissingData(String),

    #[error("unknown {kind} risk category: {label}")]
    UnknownCategory { kind: OutlookKind, label: String },

    #[error("unable to parse coordinates: {0}")]
    CoordinateParse(String),

    #[error("unable to parse storm report: {0}")]
    ReportParse(String),

    #[error("unexpected document layout: {0}")]
    FormatDrift(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("unable to render plot: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Xml(#[from] roxmltree::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

fn describe_time(time: &Option<u16>, valid: &[u16]) -> String {
    let valid: Vec<String> = valid.iter().map(|x| format!("{:04}", x)).collect();
    match time {
        Some(time) => format!("are not released at {:04} UTC, valid times: {}", time, valid.join(", ")),
        None => format!("need an issuance time, valid times: {}", valid.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_time_should_list_valid_times() {
        let tests = vec![
            (
                Some(1400),
                "day 1 categorical outlooks are not released at 1400 UTC, valid times: 0100, 0600, 1300, 1630, 2000",
            ),
            (
                None,
                "day 1 categorical outlooks need an issuance time, valid times: 0100, 0600, 1300, 1630, 2000",
            ),
        ];

        tests.iter().for_each(|x| {
            let err = Error::InvalidTime {
                kind: OutlookKind::Categorical,
                day: 1,
                time: x.0,
                valid: vec![100, 600, 1300, 1630, 2000],
            };
            assert_eq!(err.to_string(), x.1);
        });
    }

    #[test]
    fn wrapped_errors_should_convert_and_display_the_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "no such file");
    }
}

// Indicator time series decoded from the provider document
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use serde::Deserialize;
use serde_json::Value;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error("unexpected indicator document: {0}")]
    Malformed(String),
    #[error("indicator.values[{index}] has an unreadable datetime {raw:?}")]
    InvalidTimestamp { index: usize, raw: String },
    #[error("indicator.values is empty")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    indicator: IndicatorBody,
}

#[derive(Debug, Deserialize)]
struct IndicatorBody {
    values: Vec<RawSample>,
}

#[derive(Debug, Deserialize)]
struct RawSample {
    datetime: String,
    value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<FixedOffset>,
    pub value: f64,
}

/// Samples of one indicator in the order the provider returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    samples: Vec<Sample>,
}

impl IndicatorSeries {
    /// Decode `indicator.values[*].{datetime, value}`; other fields are ignored.
    pub fn from_document(document: &Value) -> Result<Self, ShapeError> {
        let envelope =
            Envelope::deserialize(document).map_err(|e| ShapeError::Malformed(e.to_string()))?;

        if envelope.indicator.values.is_empty() {
            return Err(ShapeError::Empty);
        }

        let samples = envelope
            .indicator
            .values
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let timestamp = parse_timestamp(&raw.datetime).ok_or_else(|| {
                    ShapeError::InvalidTimestamp {
                        index,
                        raw: raw.datetime.clone(),
                    }
                })?;
                Ok(Sample {
                    timestamp,
                    value: raw.value,
                })
            })
            .collect::<Result<Vec<_>, ShapeError>>()?;

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }
}

/// RFC 3339 as sent by the provider, or a naive timestamp read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }

    let utc = FixedOffset::east_opt(0)?;
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| utc.from_utc_datetime(&naive))
}

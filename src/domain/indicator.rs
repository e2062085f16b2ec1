// Indicator request domain model and validation
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw query parameters as they arrive over HTTP, before any parsing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndicatorQuery {
    pub id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// A validated request for one indicator over a date range.
///
/// Only constructible through [`IndicatorRequest::new`] or
/// [`IndicatorRequest::from_query`], so `start_date < end_date` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorRequest {
    id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid indicator request: ")?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    /// The query string could not be split into fields at all.
    pub fn unreadable_query(message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field: "query",
                message: message.into(),
            }],
        }
    }
}

impl IndicatorRequest {
    pub fn new(
        id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();
        check_order(&mut errors, start_date, end_date);
        if !errors.is_empty() {
            return Err(ValidationError { errors });
        }
        Ok(Self {
            id,
            start_date,
            end_date,
        })
    }

    /// Parse and validate raw query parameters, reporting every bad field at once.
    pub fn from_query(query: &IndicatorQuery) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();

        let id = parse_field(&mut errors, "id", query.id.as_deref(), |raw| {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| "value is not a valid integer".to_string())
        });
        let start_date =
            parse_field(&mut errors, "start_date", query.start_date.as_deref(), parse_date);
        let end_date = parse_field(&mut errors, "end_date", query.end_date.as_deref(), parse_date);

        // Ordering is only judged once both dates are known.
        if let (Some(start), Some(end)) = (start_date, end_date) {
            check_order(&mut errors, start, end);
        }

        match (id, start_date, end_date) {
            (Some(id), Some(start_date), Some(end_date)) if errors.is_empty() => {
                Self::new(id, start_date, end_date)
            }
            _ => Err(ValidationError { errors }),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Chart title describing this request.
    pub fn title(&self) -> String {
        format!(
            "Demanda Real {}. De {} a {}",
            self.id,
            self.start_date.format(DATE_FORMAT),
            self.end_date.format(DATE_FORMAT)
        )
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| "value is not a valid date, expected YYYY-MM-DD".to_string())
}

fn parse_field<T>(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    raw: Option<&str>,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Option<T> {
    let Some(raw) = raw else {
        errors.push(FieldError {
            field,
            message: "field required".to_string(),
        });
        return None;
    };

    match parse(raw) {
        Ok(value) => Some(value),
        Err(message) => {
            errors.push(FieldError { field, message });
            None
        }
    }
}

fn check_order(errors: &mut Vec<FieldError>, start_date: NaiveDate, end_date: NaiveDate) {
    if start_date >= end_date {
        errors.push(FieldError {
            field: "end_date",
            message: "end_date must be after start_date".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl ValidationError {
        fn mentions(&self, field: &str) -> bool {
            self.errors.iter().any(|e| e.field == field)
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn query(id: &str, start: &str, end: &str) -> IndicatorQuery {
        IndicatorQuery {
            id: Some(id.to_string()),
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
        }
    }

    fn parse(id: &str, start: &str, end: &str) -> Result<IndicatorRequest, ValidationError> {
        IndicatorRequest::from_query(&query(id, start, end))
    }

    #[test]
    fn test_valid_query_keeps_exact_values() {
        let request = parse("1923", "2020-01-01", "2020-01-10").unwrap();

        assert_eq!(request.id(), 1923);
        assert_eq!(request.start_date(), date(2020, 1, 1));
        assert_eq!(request.end_date(), date(2020, 1, 10));
    }

    #[test]
    fn test_accepts_every_ordered_pair() {
        let base = date(2019, 12, 25);
        for offset in 0..20 {
            let start = base + chrono::Days::new(offset);
            for span in 1..5 {
                let end = start + chrono::Days::new(span);
                let request = IndicatorRequest::new(-7 + offset as i64, start, end).unwrap();
                assert_eq!(request.start_date(), start);
                assert_eq!(request.end_date(), end);
            }
        }
    }

    #[test]
    fn test_rejects_reversed_and_equal_dates() {
        let reversed = parse("1", "2020-01-10", "2020-01-01").unwrap_err();
        assert!(reversed.mentions("end_date") || reversed.mentions("start_date"));

        let equal = IndicatorRequest::new(1, date(2020, 1, 1), date(2020, 1, 1)).unwrap_err();
        assert!(equal.mentions("end_date"));
        assert_eq!(equal.errors.len(), 1);
    }

    #[test]
    fn test_rejects_non_integer_id() {
        let err = parse("abc", "2020-01-01", "2020-01-10").unwrap_err();

        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].field, "id");
    }

    #[test]
    fn test_rejects_impossible_calendar_date() {
        let err = parse("1", "2020-02-30", "2020-03-10").unwrap_err();
        assert!(err.mentions("start_date"));
        assert!(!err.mentions("end_date"));
    }

    #[test]
    fn test_collects_every_bad_field() {
        let err = IndicatorRequest::from_query(&IndicatorQuery {
            id: Some("1.5".to_string()),
            start_date: None,
            end_date: Some("10/01/2020".to_string()),
        })
        .unwrap_err();

        let fields: Vec<_> = err.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["id", "start_date", "end_date"]);
        assert_eq!(err.errors[1].message, "field required");
    }

    #[test]
    fn test_title_describes_request() {
        let request = IndicatorRequest::new(1923, date(2020, 1, 1), date(2020, 1, 10)).unwrap();
        assert_eq!(request.title(), "Demanda Real 1923. De 2020-01-01 a 2020-01-10");
    }

    #[test]
    fn test_unreadable_query_is_single_field_error() {
        let err = ValidationError::unreadable_query("duplicate field `id`");

        assert_eq!(err.errors.len(), 1);
        assert!(err.mentions("query"));
        assert_eq!(err.to_string(), "invalid indicator request: query: duplicate field `id`");
    }

    #[test]
    fn test_display_lists_fields() {
        let err = parse("x", "2020-01-10", "2020-01-01").unwrap_err();
        let message = err.to_string();

        assert!(message.contains("id: value is not a valid integer"));
        assert!(message.contains("end_date: end_date must be after start_date"));
    }
}

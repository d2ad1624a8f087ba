//! Date conditions arrive either as one ISO-8601 string (an exact day) or as a
//! `{gte, lte}` range. Both are normalised into [`DateRange`] on the way in;
//! the builder always writes the range form.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use shared_types::{Condition, DateRange, RangeCondition, Scalar};

/// Parses an RFC 3339 timestamp, an ISO-8601 date-time without offset, or a
/// bare `YYYY-MM-DD` date. Values without an offset are read as UTC.
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }

    if let Ok(at) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(at.and_utc());
    }

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// `2024-01-15T00:00:00.000Z`
pub fn format_instant(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn date_range_from_condition(condition: &Condition) -> Option<DateRange> {
    let range = match condition {
        Condition::Value(Scalar::String(text)) => DateRange::exact(parse_instant(text)?),
        Condition::Range(range) => {
            DateRange::new(bound_instant(&range.gte), bound_instant(&range.lte))
        }
        _ => return None,
    };

    (!range.is_empty()).then_some(range)
}

/// Range form with `null` on an open side
pub fn date_range_to_condition(range: &DateRange) -> Condition {
    Condition::Range(RangeCondition::new(
        Some(instant_bound(range.from)),
        Some(instant_bound(range.to)),
    ))
}

fn bound_instant(bound: &Option<Scalar>) -> Option<DateTime<Utc>> {
    bound.as_ref().and_then(Scalar::as_str).and_then(parse_instant)
}

fn instant_bound(at: Option<DateTime<Utc>>) -> Scalar {
    at.map(|at| Scalar::String(format_instant(&at)))
        .unwrap_or(Scalar::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jan_15() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_instant_formats() {
        assert_eq!(parse_instant("2024-01-15T00:00:00Z"), Some(jan_15()));
        assert_eq!(parse_instant("2024-01-15T00:00:00.000Z"), Some(jan_15()));
        assert_eq!(parse_instant("2024-01-15T07:00:00+07:00"), Some(jan_15()));
        assert_eq!(parse_instant(" 2024-01-15 "), Some(jan_15()));
        assert_eq!(parse_instant("15/01/2024"), None);
        assert_eq!(parse_instant(""), None);
    }

    #[test]
    fn test_parse_instant_without_offset_is_utc() {
        assert_eq!(parse_instant("2024-01-15T00:00:00"), Some(jan_15()));
        assert_eq!(parse_instant("2024-01-15T00:00:00.000"), Some(jan_15()));
        assert_eq!(
            parse_instant("2024-01-15T13:45:30"),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 13, 45, 30).unwrap())
        );
        assert_eq!(parse_instant("2024-01-15T25:00:00"), None);
    }

    #[test]
    fn test_format_instant() {
        assert_eq!(format_instant(&jan_15()), "2024-01-15T00:00:00.000Z");
    }

    #[test]
    fn test_exact_string_matches_equal_range() {
        let exact = Condition::Value(Scalar::from("2024-01-15T00:00:00Z"));
        let range = Condition::Range(RangeCondition::new(
            Some(Scalar::from("2024-01-15T00:00:00Z")),
            Some(Scalar::from("2024-01-15T00:00:00Z")),
        ));

        let from_exact = date_range_from_condition(&exact).unwrap();
        assert_eq!(from_exact, date_range_from_condition(&range).unwrap());
        assert!(from_exact.is_exact());
        assert_eq!(from_exact.from, Some(jan_15()));
    }

    #[test]
    fn test_open_and_unusable_ranges() {
        let open = Condition::Range(RangeCondition::new(
            Some(Scalar::Null),
            Some(Scalar::from("2024-01-15")),
        ));
        assert_eq!(
            date_range_from_condition(&open),
            Some(DateRange::new(None, Some(jan_15())))
        );

        let nothing = Condition::Range(RangeCondition::new(Some(Scalar::Null), Some(Scalar::Null)));
        assert_eq!(date_range_from_condition(&nothing), None);
        assert_eq!(date_range_from_condition(&Condition::Value(Scalar::Number(1.0))), None);
    }

    #[test]
    fn test_to_condition_writes_null_for_open_side() {
        let condition = date_range_to_condition(&DateRange::new(Some(jan_15()), None));
        assert_eq!(
            condition.to_value(),
            serde_json::json!({"gte": "2024-01-15T00:00:00.000Z", "lte": null})
        );
    }
}

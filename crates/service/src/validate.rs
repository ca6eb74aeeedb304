//! Cross-field validation helpers shared by the tracking and course services.

use chrono::{DateTime, FixedOffset, Utc};

use crate::errors::ServiceError;

/// Either bound alone is fine; with both present, `end` must lie strictly
/// after `start`.
pub fn validate_datetime_range(
    start: Option<DateTime<FixedOffset>>,
    end: Option<DateTime<FixedOffset>>,
) -> Result<(), ServiceError> {
    if let (Some(s), Some(e)) = (start, end) {
        if e <= s {
            return Err(ServiceError::Validation("endDate must be after startDate".into()));
        }
    }
    Ok(())
}

/// Certificate issue dates must lie strictly after both the current time and
/// the course end date (when the course has one).
pub fn validate_certificate_date(
    issued_at: DateTime<FixedOffset>,
    now: DateTime<Utc>,
    course_end: Option<DateTime<FixedOffset>>,
) -> Result<(), ServiceError> {
    if issued_at <= now {
        return Err(ServiceError::Validation("certificate date must be after the current date".into()));
    }
    if let Some(end) = course_end {
        if issued_at <= end {
            return Err(ServiceError::Validation("certificate date must be after the course end date".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dt(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn range_accepts_single_bound() {
        assert!(validate_datetime_range(Some(dt("2024-01-01T00:00:00Z")), None).is_ok());
        assert!(validate_datetime_range(None, Some(dt("2024-01-01T00:00:00Z"))).is_ok());
        assert!(validate_datetime_range(None, None).is_ok());
    }

    #[test]
    fn range_rejects_end_not_after_start() {
        let a = dt("2024-06-01T10:00:00Z");
        let b = dt("2024-06-01T09:00:00Z");
        assert!(validate_datetime_range(Some(a), Some(b)).is_err());
        assert!(validate_datetime_range(Some(a), Some(a)).is_err());
        assert!(validate_datetime_range(Some(b), Some(a)).is_ok());
    }

    #[test]
    fn certificate_must_postdate_now_and_course_end() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let course_end = dt("2024-07-01T00:00:00Z");

        // Before now
        assert!(validate_certificate_date(dt("2024-05-01T00:00:00Z"), now, Some(course_end)).is_err());
        // After now, but not after course end
        assert!(validate_certificate_date(dt("2024-06-15T00:00:00Z"), now, Some(course_end)).is_err());
        // Equal to course end still rejected
        assert!(validate_certificate_date(course_end, now, Some(course_end)).is_err());
        // Strictly after both
        assert!(validate_certificate_date(dt("2024-07-02T00:00:00Z"), now, Some(course_end)).is_ok());
        // No course end: only the now-check applies
        assert!(validate_certificate_date(dt("2024-06-02T00:00:00Z"), now, None).is_ok());
    }
}

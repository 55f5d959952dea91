use std::sync::atomic::{AtomicUsize, Ordering};

use time::{format_description::well_known::Rfc3339, OffsetDateTime};

pub mod assets;
pub mod persistence;
pub mod version;

static ID_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Short session-local id for transient UI items such as toasts.
pub fn generate_id(prefix: &str) -> String {
    let value = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{value}")
}

/// Stable id for records that outlive the session.
pub fn generate_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::UNIX_EPOCH.to_string())
}

/// Renders an RFC 3339 timestamp as `YYYY-MM-DD HH:MM`, or echoes the input.
pub fn short_timestamp(raw: &str) -> String {
    match OffsetDateTime::parse(raw, &Rfc3339) {
        Ok(at) => format!(
            "{:04}-{:02}-{:02} {:02}:{:02}",
            at.year(),
            u8::from(at.month()),
            at.day(),
            at.hour(),
            at.minute()
        ),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_prefixed_and_unique() {
        let a = generate_id("toast");
        let b = generate_id("toast");
        assert!(a.starts_with("toast-"));
        assert_ne!(a, b);
        assert_ne!(generate_uuid(), generate_uuid());
    }

    #[test]
    fn timestamps_round_trip_through_the_short_form() {
        assert_eq!(short_timestamp("2026-10-19T08:05:09Z"), "2026-10-19 08:05");
        assert_eq!(short_timestamp("yesterday"), "yesterday");
        assert!(OffsetDateTime::parse(&now_rfc3339(), &Rfc3339).is_ok());
    }
}

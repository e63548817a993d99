//! Injectable source of the current time.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveTime, Utc};

/// Source of "now", in the zone whose calendar day defines "today".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Start of the current calendar day.
    ///
    /// The default assumes the offset of `now()` held since midnight.
    fn start_of_day(&self) -> DateTime<Utc> {
        midnight_at_offset(self.now())
    }
}

fn midnight_at_offset(now: DateTime<FixedOffset>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    (midnight - Duration::seconds(i64::from(now.offset().local_minus_utc()))).and_utc()
}

/// The host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let now = Local::now();
        now.with_timezone(now.offset())
    }

    /// Resolves midnight in the host zone, so a DST change earlier in the
    /// day does not shift the cutoff.
    fn start_of_day(&self) -> DateTime<Utc> {
        let now = Local::now();
        now.date_naive()
            .and_time(NaiveTime::MIN)
            .and_local_timezone(Local)
            .earliest()
            .map(|at| at.with_timezone(&Utc))
            .unwrap_or_else(|| midnight_at_offset(now.fixed_offset()))
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock() {
        let at = FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .unwrap();
        assert_eq!(FixedClock(at).now(), at);
    }

    #[test]
    fn test_fixed_clock_start_of_day() {
        let at = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 15, 18, 0, 0)
            .unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 14, 22, 0, 0).unwrap();
        assert_eq!(FixedClock(at).start_of_day(), expected);
    }

    #[test]
    fn test_system_clock_start_of_day_is_today() {
        let clock = SystemClock;
        let start = clock.start_of_day();
        let now = clock.now();
        assert!(start <= now);
        assert!(now - start.fixed_offset() < Duration::hours(26));
    }

    #[test]
    fn test_system_clock_is_current() {
        let before = chrono::Utc::now();
        let now = SystemClock.now();
        assert!(now >= before - chrono::Duration::seconds(1));
    }
}

//! Calendar helpers: clock abstraction, report timezone and inclusive
//! day ranges.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

/// Abstraction over "current time" to make behavior deterministic in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Timezone in which sale timestamps become calendar days.
#[derive(Debug, Clone, PartialEq)]
pub enum TzSpec {
    Local,
    Named(Tz),
}

impl TzSpec {
    pub fn utc() -> Self {
        TzSpec::Named(chrono_tz::UTC)
    }

    /// Accepts "local"/"current"/empty, "utc", or an IANA name.
    pub fn parse(s: Option<&str>) -> Result<Self> {
        let Some(s) = s else {
            return Ok(TzSpec::Local);
        };
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("local")
            || trimmed.eq_ignore_ascii_case("current")
        {
            return Ok(TzSpec::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") {
            return Ok(Self::utc());
        }
        let tz: Tz = trimmed.parse().map_err(|_| {
            anyhow::anyhow!(
                "Invalid timezone '{trimmed}' (expected IANA name, e.g. America/Sao_Paulo)"
            )
        })?;
        Ok(TzSpec::Named(tz))
    }

    pub fn label(&self) -> String {
        match self {
            TzSpec::Local => "local".to_string(),
            TzSpec::Named(tz) => tz.name().to_string(),
        }
    }

    pub fn date_of(&self, ts: DateTime<Utc>) -> NaiveDate {
        match self {
            TzSpec::Local => ts.with_timezone(&chrono::Local).date_naive(),
            TzSpec::Named(tz) => ts.with_timezone(tz).date_naive(),
        }
    }

    pub fn today(&self, clock: &dyn Clock) -> NaiveDate {
        self.date_of(clock.now())
    }
}

/// Inclusive day range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// First of the current month through today, the dashboard default.
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self {
            start: first_of_month(today),
            end: today,
        }
    }

    /// The whole calendar month containing `day`.
    pub fn month_of(day: NaiveDate) -> Self {
        let start = first_of_month(day);
        let end = start
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(day);
        Self { start, end }
    }

    /// A range whose start lies after its end; such ranges select nothing.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_day(label: &str, s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid {label} date: {s} (expected YYYY-MM-DD)"))
}

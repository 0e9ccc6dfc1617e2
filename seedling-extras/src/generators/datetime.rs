//! Date and time generators built on chrono
//!
//! [`datetime`] produces `NaiveDateTime` values at whole-second resolution
//! between two bounds, optionally restricted to some weekdays and to an
//! hour window. Restrictions are enforced by redrawing, up to the engine's
//! `filter_attempts`.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Weekday};
use seedling::{Context, DiagnosticKind, Schema};

/// 2000-01-01T00:00:00
const DEFAULT_START: i64 = 946_684_800;
/// 2030-12-31T23:59:59
const DEFAULT_END: i64 = 1_924_991_999;

fn from_timestamp(secs: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

// ============================================================================
// DateTime Generator
// ============================================================================

/// Options for [`datetime`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeOptions {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Allowed weekdays; empty means any day
    pub weekdays: Vec<Weekday>,
    /// Inclusive hour window; `from > to` wraps past midnight
    pub hours: Option<(u32, u32)>,
}

impl Default for DateTimeOptions {
    fn default() -> Self {
        Self {
            start: from_timestamp(DEFAULT_START).unwrap_or_default(),
            end: from_timestamp(DEFAULT_END).unwrap_or_default(),
            weekdays: Vec::new(),
            hours: None,
        }
    }
}

impl DateTimeOptions {
    fn accepts(&self, candidate: &NaiveDateTime) -> bool {
        let day_ok = self.weekdays.is_empty() || self.weekdays.contains(&candidate.weekday());
        let hour_ok = match self.hours {
            None => true,
            Some((from, to)) if from <= to => (from..=to).contains(&candidate.hour()),
            Some((from, to)) => candidate.hour() >= from || candidate.hour() <= to,
        };
        day_ok && hour_ok
    }

    fn is_filtered(&self) -> bool {
        !self.weekdays.is_empty() || self.hours.is_some()
    }
}

/// Date-times between 2000-01-01 and 2030-12-31 by default
pub fn datetime() -> Schema<NaiveDateTime, DateTimeOptions> {
    Schema::with_options(DateTimeOptions::default(), generate_datetime)
}

fn generate_datetime(ctx: &mut Context<'_>, options: &DateTimeOptions) -> NaiveDateTime {
    if let Some((from, to)) = options.hours {
        if from > 23 || to > 23 {
            ctx.report(
                DiagnosticKind::InvalidParameter,
                format!("hour window {from}..={to} exceeds 23"),
            );
        }
    }

    let mut candidate = draw(ctx, options);
    if !options.is_filtered() {
        return candidate;
    }

    let attempts = ctx.config().filter_attempts;
    for _ in 1..attempts {
        if options.accepts(&candidate) {
            return candidate;
        }
        candidate = draw(ctx, options);
    }
    if !options.accepts(&candidate) {
        ctx.report(
            DiagnosticKind::FilterExhausted,
            format!("no date-time matched the weekday/hour filters in {attempts} draws"),
        );
    }
    candidate
}

fn draw(ctx: &mut Context<'_>, options: &DateTimeOptions) -> NaiveDateTime {
    let lo = options.start.and_utc().timestamp();
    let hi = options.end.and_utc().timestamp();
    from_timestamp(ctx.next_int(lo, hi)).unwrap_or(options.start)
}

/// Typed setters for date-time schemas
pub trait DateTimeSchemaExt: Sized {
    /// Inclusive bounds
    fn between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Self;
    fn weekdays<I: IntoIterator<Item = Weekday>>(&self, days: I) -> Self;
    /// Monday to Friday only
    fn business_days(&self) -> Self {
        self.weekdays([
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ])
    }
    fn hours(&self, from: u32, to: u32) -> Self;
}

impl DateTimeSchemaExt for Schema<NaiveDateTime, DateTimeOptions> {
    fn between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.map_options(|o| {
            o.start = start;
            o.end = end;
        })
    }

    fn weekdays<I: IntoIterator<Item = Weekday>>(&self, days: I) -> Self {
        let days: Vec<Weekday> = days.into_iter().collect();
        self.map_options(|o| o.weekdays = days)
    }

    fn hours(&self, from: u32, to: u32) -> Self {
        self.map_options(|o| o.hours = Some((from, to)))
    }
}

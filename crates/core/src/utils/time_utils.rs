use chrono::{Local, NaiveDate};

/// Calendar date used when extending time series to "now".
///
/// This is the single source of truth for the engine's notion of "today".
/// Uses the machine-local timezone, matching the dates users enter in the
/// transaction forms.
pub fn valuation_date_today() -> NaiveDate {
    Local::now().date_naive()
}

//! Calendar axis: ISO week columns and month header spans

use crate::model::ViewMode;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

/// One calendar week (Monday to Sunday) on the week axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekColumn {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// ISO week-numbering year
    pub week_year: i32,
    /// ISO week number (1-53)
    pub week_number: u32,
}

/// A month header spanning a contiguous range of columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSpan {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub start_index: usize,
    pub end_index: usize,
}

impl MonthSpan {
    fn new(month_start: NaiveDate, start_index: usize, end_index: usize) -> Self {
        Self {
            year: month_start.year(),
            month: month_start.month(),
            label: month_start.format("%b %Y").to_string(),
            start_index,
            end_index,
        }
    }

    /// Number of columns covered by the span
    pub fn column_count(&self) -> usize {
        self.end_index - self.start_index + 1
    }
}

/// Monday of the ISO week containing `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday();
    date.checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(date)
}

/// Truncate a date to the start of its calendar unit under `view_mode`
pub fn normalize(date: NaiveDate, view_mode: ViewMode) -> NaiveDate {
    match view_mode {
        ViewMode::Day => date,
        ViewMode::Week => start_of_week(date),
    }
}

/// Signed whole days from `from` to `to`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn end_of_month(month_start: NaiveDate) -> NaiveDate {
    month_start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Week columns from the week containing `start` through the week containing `end`
pub fn build_week_columns(start: NaiveDate, end: NaiveDate) -> Vec<WeekColumn> {
    let last = start_of_week(end);
    let mut weeks = Vec::new();
    let mut cursor = start_of_week(start);

    while cursor <= last {
        let iso = cursor.iso_week();
        weeks.push(WeekColumn {
            start: cursor,
            end: cursor.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX),
            week_year: iso.year(),
            week_number: iso.week(),
        });
        match cursor.checked_add_days(Days::new(7)) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    weeks
}

/// Month spans over week column indices.
///
/// A week belongs to every month its `[start, end]` interval touches, so a
/// week straddling two months appears in both spans.
pub fn build_month_spans(weeks: &[WeekColumn]) -> Vec<MonthSpan> {
    let (Some(first), Some(last)) = (weeks.first(), weeks.last()) else {
        return Vec::new();
    };

    let last_month = start_of_month(last.end);
    let mut spans = Vec::new();
    let mut cursor = start_of_month(first.start);

    while cursor <= last_month {
        let month_end = end_of_month(cursor);
        let mut indices = weeks
            .iter()
            .enumerate()
            .filter(|(_, week)| week.start <= month_end && week.end >= cursor)
            .map(|(index, _)| index);

        if let Some(start_index) = indices.next() {
            let end_index = indices.last().unwrap_or(start_index);
            spans.push(MonthSpan::new(cursor, start_index, end_index));
        }

        match cursor.checked_add_months(Months::new(1)) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    spans
}

/// Month spans over day column indices for the day view header
pub fn build_day_month_spans(dates: &[NaiveDate]) -> Vec<MonthSpan> {
    let mut spans: Vec<MonthSpan> = Vec::new();

    for (index, date) in dates.iter().enumerate() {
        match spans.last_mut() {
            Some(span)
                if span.year == date.year()
                    && span.month == date.month()
                    && span.end_index + 1 == index =>
            {
                span.end_index = index;
            }
            _ => spans.push(MonthSpan::new(start_of_month(*date), index, index)),
        }
    }

    spans
}

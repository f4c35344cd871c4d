//! Data model for timeline charts

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for rows, activities and links.
///
/// Numbers and strings are distinct: `1` and `"1"` never refer to the same item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(i64),
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{}", n),
            Identifier::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Number(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Text(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::Text(value)
    }
}

/// How an activity is drawn inside its row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualType {
    /// Full-height hatched background band
    Stripe,
    /// Regular bar centered in the row
    #[default]
    Bar,
    /// Thin bar that can be stacked into lanes
    Mini,
}

/// Horizontal granularity of the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Day,
    Week,
}

/// Which edge of the source activity a link leaves from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkType {
    /// Leaves from the end of the source activity
    #[default]
    FinishStart,
    /// Leaves from the start of the source activity
    StartStart,
}

/// A time-bounded item in a row. `end_date` is inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub visual_type: VisualType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_class: Option<String>,
}

impl Activity {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: None,
            label: None,
            start_date,
            end_date,
            visual_type: VisualType::default(),
            color: None,
            color_class: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<Identifier>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_visual_type(mut self, visual_type: VisualType) -> Self {
        self.visual_type = visual_type;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_color_class(mut self, class: impl Into<String>) -> Self {
        self.color_class = Some(class.into());
        self
    }

    pub fn is_mini(&self) -> bool {
        self.visual_type == VisualType::Mini
    }
}

/// A horizontal lane of the chart holding zero or more activities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Text shown in the row header column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<Identifier>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }
}

/// A directed connector between two activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identifier>,
    pub from_id: Identifier,
    pub to_id: Identifier,
    #[serde(default, rename = "type")]
    pub link_type: LinkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Link {
    pub fn new(from_id: impl Into<Identifier>, to_id: impl Into<Identifier>) -> Self {
        Self {
            id: None,
            from_id: from_id.into(),
            to_id: to_id.into(),
            link_type: LinkType::default(),
            color: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<Identifier>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_type(mut self, link_type: LinkType) -> Self {
        self.link_type = link_type;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Stable key used to tag the rendered path: the link id, or `from-to`
    pub fn key(&self) -> String {
        match &self.id {
            Some(id) => id.to_string(),
            None => format!("{}-{}", self.from_id, self.to_id),
        }
    }
}

/// A complete chart description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    /// Label of the top-left header cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_label: Option<String>,
    /// Ordered day sequence forming the day axis
    #[serde(default)]
    pub date_range: Vec<NaiveDate>,
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default)]
    pub stack_mini_activities: bool,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Chart {
    /// Chart covering every day from `start` to `end` inclusive
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            date_range: date_range(start, end),
            ..Self::default()
        }
    }

    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }

    pub fn with_stacking(mut self, stack: bool) -> Self {
        self.stack_mini_activities = stack;
        self
    }

    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// First and last day of the axis
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.date_range.first()?, *self.date_range.last()?))
    }

    /// Find an activity by id across all rows, returning it with its row
    pub fn find_activity(&self, id: &Identifier) -> Option<(&Activity, &Row)> {
        self.rows.iter().find_map(|row| {
            row.activities
                .iter()
                .find(|activity| activity.id.as_ref() == Some(id))
                .map(|activity| (activity, row))
        })
    }
}

/// Every day from `start` to `end` inclusive. Empty when `end < start`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        dates.push(cursor);
        match cursor.checked_add_days(Days::new(1)) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    dates
}

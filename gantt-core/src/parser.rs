//! Parser for the line-oriented chart text format
//!
//! ```text
//! header Line
//! range 2026-01-01 2026-01-31
//! view week
//! stack on
//! row 1 "Line A": Row 1
//!   stripe 2026-01-01..2026-01-31 .bg-slate-100
//!   bar bar-1 2026-01-03..2026-01-05 #34d399: Optimized
//!   mini m-1 2026-01-04
//! link bar-1 -> m-1 start-start #ef4444
//! ```
//!
//! A `#` that starts a line, or stands alone between whitespace, begins a
//! comment. Comments are removed before a line is tokenised, so a lone ` # `
//! inside a quoted row header or a label ends the line there too. A `#`
//! glued to text such as `#34d399` or `Run#2` is kept.

use chrono::NaiveDate;
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_until, take_while1},
    character::complete::{char, digit1, space0, space1},
    combinator::{map, opt, recognize, rest, value},
    multi::many0,
    sequence::{delimited, preceded},
    IResult, Parser,
};
use tracing::debug;

use crate::model::{date_range, Activity, Chart, Identifier, Link, LinkType, Row, ViewMode, VisualType};

/// Parse error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Parse error at line {line}: {message}")]
    SyntaxError { line: usize, message: String },
    #[error("Invalid date at line {line}: {value}")]
    InvalidDate { line: usize, value: String },
    #[error("End date before start date at line {line}")]
    InvertedRange { line: usize },
    #[error("Activity declared before any row at line {line}")]
    ActivityOutsideRow { line: usize },
}

/// One parsed line, before dates are validated
#[derive(Debug, Clone, PartialEq)]
enum Statement<'a> {
    Header(&'a str),
    Range(&'a str, &'a str),
    View(ViewMode),
    Stack(bool),
    Row {
        id: Identifier,
        header: Option<&'a str>,
        label: Option<&'a str>,
    },
    Activity(ActivityDecl<'a>),
    Link {
        from: Identifier,
        to: Identifier,
        link_type: LinkType,
        color: Option<&'a str>,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct ActivityDecl<'a> {
    visual_type: VisualType,
    id: Option<Identifier>,
    start: &'a str,
    end: Option<&'a str>,
    styles: Vec<Style<'a>>,
    label: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Style<'a> {
    Color(&'a str),
    Class(&'a str),
}

/// Parse a complete chart.
///
/// Without a `range` line the axis spans the earliest start to the latest
/// end of all activities.
pub fn parse(input: &str) -> Result<Chart, ParseError> {
    let mut chart = Chart::default();
    let mut range = None;

    for (i, raw) in input.lines().enumerate() {
        let line = i + 1;
        let trimmed = strip_comment(raw).trim();
        if trimmed.is_empty() {
            continue;
        }

        let statement = match parse_statement(trimmed) {
            Ok((remaining, statement)) if remaining.trim().is_empty() => statement,
            Ok((remaining, _)) => {
                return Err(ParseError::SyntaxError {
                    line,
                    message: format!("Unexpected input: {}", remaining.trim()),
                });
            }
            Err(e) => {
                return Err(ParseError::SyntaxError {
                    line,
                    message: format!("Failed to parse: {:?}", e),
                });
            }
        };

        match statement {
            Statement::Header(text) => chart.header_label = Some(text.to_string()),
            Statement::Range(start, end) => {
                let start = to_date(start, line)?;
                let end = to_date(end, line)?;
                if end < start {
                    return Err(ParseError::InvertedRange { line });
                }
                range = Some((start, end));
            }
            Statement::View(view_mode) => chart.view_mode = view_mode,
            Statement::Stack(stack) => chart.stack_mini_activities = stack,
            Statement::Row { id, header, label } => chart.rows.push(Row {
                id: Some(id),
                label: label.map(str::to_string),
                header: header.map(str::to_string),
                activities: Vec::new(),
            }),
            Statement::Activity(decl) => {
                let Some(row) = chart.rows.last_mut() else {
                    return Err(ParseError::ActivityOutsideRow { line });
                };
                row.activities.push(build_activity(decl, line)?);
            }
            Statement::Link {
                from,
                to,
                link_type,
                color,
            } => {
                let mut link = Link::new(from, to).with_type(link_type);
                link.color = color.map(str::to_string);
                chart.links.push(link);
            }
        }
    }

    let range = range.or_else(|| activity_bounds(&chart));
    if let Some((start, end)) = range {
        chart.date_range = date_range(start, end);
    }

    debug!(
        rows = chart.rows.len(),
        links = chart.links.len(),
        days = chart.date_range.len(),
        "parsed chart"
    );
    Ok(chart)
}

fn build_activity(decl: ActivityDecl<'_>, line: usize) -> Result<Activity, ParseError> {
    let start = to_date(decl.start, line)?;
    let end = match decl.end {
        Some(end) => to_date(end, line)?,
        None => start,
    };
    if end < start {
        return Err(ParseError::InvertedRange { line });
    }

    let mut activity = Activity::new(start, end).with_visual_type(decl.visual_type);
    activity.id = decl.id;
    activity.label = decl.label.map(str::to_string);

    let mut classes = Vec::new();
    for style in decl.styles {
        match style {
            // Last color wins
            Style::Color(color) => activity.color = Some(color.to_string()),
            Style::Class(class) => classes.push(class),
        }
    }
    if !classes.is_empty() {
        activity.color_class = Some(classes.join(" "));
    }

    Ok(activity)
}

fn activity_bounds(chart: &Chart) -> Option<(NaiveDate, NaiveDate)> {
    let activities = chart.rows.iter().flat_map(|row| row.activities.iter());
    let start = activities.clone().map(|activity| activity.start_date).min()?;
    let end = activities.map(|activity| activity.end_date).max()?;
    Some((start, end))
}

fn to_date(token: &str, line: usize) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(token, "%Y-%m-%d").map_err(|_| ParseError::InvalidDate {
        line,
        value: token.to_string(),
    })
}

/// Drop a `#` comment: a whole line starting with `#`, or a `#` that stands
/// alone between whitespace. `#34d399` is a color, not a comment.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    for (i, _) in line.match_indices('#') {
        let before = line[..i].chars().next_back();
        let after = line[i + 1..].chars().next();
        if before.is_some_and(char::is_whitespace) && after.map_or(true, char::is_whitespace) {
            return &line[..i];
        }
    }
    line
}

/// Parse a single line
fn parse_statement(input: &str) -> IResult<&str, Statement<'_>> {
    alt((
        parse_header,
        parse_range,
        parse_view,
        parse_stack,
        parse_row,
        parse_link,
        parse_activity,
    ))
    .parse(input)
}

/// `header <text>`
fn parse_header(input: &str) -> IResult<&str, Statement<'_>> {
    let (input, _) = tag_no_case("header").parse(input)?;
    let (input, _) = space1.parse(input)?;
    let (input, text) = rest.parse(input)?;
    Ok((input, Statement::Header(text.trim())))
}

/// `range <date> <date>` or `range <date>..<date>`
fn parse_range(input: &str) -> IResult<&str, Statement<'_>> {
    let (input, _) = tag_no_case("range").parse(input)?;
    let (input, _) = space1.parse(input)?;
    let (input, start) = parse_date(input)?;
    let (input, _) = alt((tag(".."), space1)).parse(input)?;
    let (input, end) = parse_date(input)?;
    Ok((input, Statement::Range(start, end)))
}

/// `view day` or `view week`
fn parse_view(input: &str) -> IResult<&str, Statement<'_>> {
    let (input, _) = tag_no_case("view").parse(input)?;
    let (input, _) = space1.parse(input)?;
    let (input, view_mode) = alt((
        value(ViewMode::Day, tag_no_case("day")),
        value(ViewMode::Week, tag_no_case("week")),
    ))
    .parse(input)?;
    Ok((input, Statement::View(view_mode)))
}

/// `stack on` or `stack off`
fn parse_stack(input: &str) -> IResult<&str, Statement<'_>> {
    let (input, _) = tag_no_case("stack").parse(input)?;
    let (input, _) = space1.parse(input)?;
    let (input, stack) = alt((
        value(true, alt((tag_no_case("on"), tag_no_case("true"), tag_no_case("yes")))),
        value(false, alt((tag_no_case("off"), tag_no_case("false"), tag_no_case("no")))),
    ))
    .parse(input)?;
    Ok((input, Statement::Stack(stack)))
}

/// `row <id> ["header"] [: label]`
fn parse_row(input: &str) -> IResult<&str, Statement<'_>> {
    let (input, _) = tag_no_case("row").parse(input)?;
    let (input, _) = space1.parse(input)?;
    let (input, id) = parse_identifier(input)?;
    let (input, header) = opt(preceded(space1, parse_quoted)).parse(input)?;
    let (input, label) = parse_label(input)?;
    Ok((input, Statement::Row { id, header, label }))
}

/// `<stripe|bar|mini> [id] <date>[..<date>] [#color|.class]* [: label]`
fn parse_activity(input: &str) -> IResult<&str, Statement<'_>> {
    let (input, visual_type) = alt((
        value(VisualType::Stripe, tag_no_case("stripe")),
        value(VisualType::Bar, tag_no_case("bar")),
        value(VisualType::Mini, tag_no_case("mini")),
    ))
    .parse(input)?;
    let (input, _) = space1.parse(input)?;

    // The id is optional, so try the dates first
    let (input, (id, (start, end))) = alt((
        map(parse_dates, |dates| (None::<Identifier>, dates)),
        map((parse_identifier, space1, parse_dates), |(id, _, dates)| (Some(id), dates)),
    ))
    .parse(input)?;

    let (input, styles) = many0(preceded(space1, parse_style)).parse(input)?;
    let (input, label) = parse_label(input)?;

    Ok((
        input,
        Statement::Activity(ActivityDecl {
            visual_type,
            id,
            start,
            end,
            styles,
            label,
        }),
    ))
}

/// `link <from> -> <to> [start-start|finish-start] [#color]`
fn parse_link(input: &str) -> IResult<&str, Statement<'_>> {
    let (input, _) = tag_no_case("link").parse(input)?;
    let (input, _) = space1.parse(input)?;
    let (input, from) = parse_identifier(input)?;
    let (input, _) = (space1, tag("->"), space1).parse(input)?;
    let (input, to) = parse_identifier(input)?;
    let (input, link_type) = opt(preceded(
        space1,
        alt((
            value(LinkType::StartStart, tag_no_case("start-start")),
            value(LinkType::FinishStart, tag_no_case("finish-start")),
        )),
    ))
    .parse(input)?;
    let (input, color) = opt(preceded(space1, parse_color)).parse(input)?;

    Ok((
        input,
        Statement::Link {
            from,
            to,
            link_type: link_type.unwrap_or_default(),
            color,
        },
    ))
}

/// Date token shaped like `YYYY-MM-DD`; validated later so bad dates get a precise error
fn parse_date(input: &str) -> IResult<&str, &str> {
    recognize((digit1, char('-'), digit1, char('-'), digit1)).parse(input)
}

/// `<date>` or `<date>..<date>`
fn parse_dates(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    (parse_date, opt(preceded(tag(".."), parse_date))).parse(input)
}

/// Quoted string, bare integer, or bare word
fn parse_identifier(input: &str) -> IResult<&str, Identifier> {
    alt((
        map(parse_quoted, |s: &str| Identifier::Text(s.to_string())),
        map(
            take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-'),
            |s: &str| match s.parse::<i64>() {
                Ok(n) => Identifier::Number(n),
                Err(_) => Identifier::Text(s.to_string()),
            },
        ),
    ))
    .parse(input)
}

fn parse_quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_until("\""), char('"')).parse(input)
}

fn parse_color(input: &str) -> IResult<&str, &str> {
    recognize(preceded(char('#'), take_while1(|c: char| c.is_ascii_hexdigit()))).parse(input)
}

fn parse_style(input: &str) -> IResult<&str, Style<'_>> {
    alt((
        map(parse_color, Style::Color),
        map(
            preceded(
                char('.'),
                take_while1(|c: char| c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '/')),
            ),
            Style::Class,
        ),
    ))
    .parse(input)
}

/// Optional `: label` tail; an empty label counts as none
fn parse_label(input: &str) -> IResult<&str, Option<&str>> {
    let (input, label) = opt(preceded((space0, char(':')), rest)).parse(input)?;
    let label = label.map(str::trim).filter(|label| !label.is_empty());
    Ok((input, label))
}

use chrono::{Datelike, NaiveDate, NaiveDateTime};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Full English month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("Unknown")
}

/// Sunday-start week of the year, counted from 1.
///
/// Days before the first Sunday of the year belong to week 1, the first
/// Sunday opens week 2, and so on (strftime `%U` plus one).
pub fn week_number(date: NaiveDate) -> u32 {
    (date.ordinal0() + 7 - date.weekday().num_days_from_sunday()) / 7 + 1
}

/// Date-only layouts accepted in statement files, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d %B %Y",
];

/// Date-time layouts whose time part is dropped.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLayout {
    Date(&'static str),
    DateTime(&'static str),
}

impl DateLayout {
    pub fn parse(&self, value: &str) -> Option<NaiveDate> {
        match self {
            DateLayout::Date(fmt) => NaiveDate::parse_from_str(value, fmt).ok(),
            DateLayout::DateTime(fmt) => NaiveDateTime::parse_from_str(value, fmt)
                .ok()
                .map(|dt| dt.date()),
        }
    }

    fn format(&self) -> &'static str {
        match self {
            DateLayout::Date(fmt) | DateLayout::DateTime(fmt) => fmt,
        }
    }

    /// Year-first and month-name layouts cannot swap day and month.
    pub fn is_unambiguous(&self) -> bool {
        let fmt = self.format();
        fmt.starts_with("%Y") || fmt.contains("%b") || fmt.contains("%B")
    }
}

fn known_layouts() -> impl Iterator<Item = DateLayout> {
    DATE_FORMATS
        .iter()
        .map(|f| DateLayout::Date(*f))
        .chain(DATETIME_FORMATS.iter().map(|f| DateLayout::DateTime(*f)))
}

/// Find the first known layout that parses `sample`.
pub fn infer_layout(sample: &str) -> Option<DateLayout> {
    let sample = sample.trim();
    known_layouts().find(|layout| layout.parse(sample).is_some())
}

/// Parse with the preferred layout. Once a layout is chosen, a value that
/// does not fit it only falls back to unambiguous layouts, so day-first and
/// month-first readings never mix within one file.
pub fn parse_date(value: &str, preferred: Option<DateLayout>) -> Option<NaiveDate> {
    let value = value.trim();
    match preferred {
        Some(layout) => layout.parse(value).or_else(|| {
            known_layouts()
                .filter(DateLayout::is_unambiguous)
                .find_map(|fallback| fallback.parse(value))
        }),
        None => infer_layout(value).and_then(|layout| layout.parse(value)),
    }
}

/// Trait for filter params that carry an inclusive `start_date`/`end_date` pair.
pub trait DateFilterable {
    fn start_date(&self) -> Option<&String>;
    fn end_date(&self) -> Option<&String>;

    /// Resolve the requested range against the ledger's extent. A missing or
    /// malformed bound falls back to the matching end of the extent.
    fn resolve_date_range(&self, extent: Option<(NaiveDate, NaiveDate)>) -> Option<DateRange> {
        let parse = |s: Option<&String>| {
            s.and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok())
        };
        let from = parse(self.start_date()).or(extent.map(|(min, _)| min))?;
        let to = parse(self.end_date()).or(extent.map(|(_, max)| max))?;
        Some(DateRange::from_dates(from, to))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeriodType {
    Month,
    Year,
    Custom,
}

/// Inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn from_dates(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    fn detect_period_type(&self) -> PeriodType {
        if self.from == month_start(self.from) && self.to == month_end(self.from) {
            return PeriodType::Month;
        }
        if self.from == year_start(self.from) && self.to == year_end(self.from) {
            return PeriodType::Year;
        }
        PeriodType::Custom
    }

    /// Human-readable label, e.g. "January 2024", "2024" or "Jan 5 – Mar 2, 2024".
    pub fn display_label(&self) -> String {
        match self.detect_period_type() {
            PeriodType::Month => self.from.format("%B %Y").to_string(),
            PeriodType::Year => self.from.format("%Y").to_string(),
            PeriodType::Custom => {
                let from_fmt = self.from.format("%b %-d");
                if self.from.year() == self.to.year() {
                    format!(
                        "{} – {}, {}",
                        from_fmt,
                        self.to.format("%b %-d"),
                        self.to.format("%Y")
                    )
                } else {
                    format!(
                        "{}, {} – {}, {}",
                        from_fmt,
                        self.from.format("%Y"),
                        self.to.format("%b %-d"),
                        self.to.format("%Y")
                    )
                }
            }
        }
    }

    pub fn start_str(&self) -> String {
        self.from.format("%Y-%m-%d").to_string()
    }

    pub fn end_str(&self) -> String {
        self.to.format("%Y-%m-%d").to_string()
    }

    /// Query string for carrying the range into API calls.
    pub fn query_string(&self) -> String {
        format!("start_date={}&end_date={}", self.start_str(), self.end_str())
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn month_end(date: NaiveDate) -> NaiveDate {
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

fn year_start(date: NaiveDate) -> NaiveDate {
    date.with_ordinal(1).unwrap_or(date)
}

fn year_end(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

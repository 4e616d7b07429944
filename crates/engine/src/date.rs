//! Birthday / anniversary values
//!
//! A [`DateItem`] remembers whether the source carried a time of day and a
//! UTC offset, so a date-only birthday never compares equal to the same day
//! at midnight.

use std::fmt::Write;
use std::sync::OnceLock;

use chrono::format::{Item, StrftimeItems};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::options::FormatOptions;

/// Textual conventions a date can be read from or written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `19800115T103000Z` (vCard 2.1 style)
    IsoBasic,
    /// `1980-01-15T10:30:00+03:00` (vCard 3.0 style)
    IsoExtended,
    /// Human-readable, per [`FormatOptions::date_format`] / `time_format`
    Local,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateItem {
    pub value: Option<NaiveDateTime>,
    /// False when the source had a date only
    pub has_time: bool,
    /// True when the source had an explicit UTC offset
    pub has_time_zone: bool,
    pub zone_hour: i16,
    pub zone_min: i16,
}

fn iso_basic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})(\d{2})(\d{2})(?:T(\d{2})(\d{2})(\d{2})?)?(Z|[+-]\d{2}(?:\d{2})?)?$")
            .expect("static regex")
    })
}

fn iso_extended_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})-(\d{2})-(\d{2})(?:T(\d{2}):(\d{2})(?::(\d{2}))?)?(Z|[+-]\d{2}(?::?\d{2})?)?$")
            .expect("static regex")
    })
}

fn num(caps: &Captures<'_>, idx: usize) -> Option<u32> {
    caps.get(idx).and_then(|m| m.as_str().parse().ok())
}

/// Parse `Z`, `+03`, `+0330`, `-05:30` into signed (hours, minutes).
fn parse_zone(zone: &str) -> Option<(i16, i16)> {
    if zone == "Z" {
        return Some((0, 0));
    }
    let sign: i16 = if zone.starts_with('-') { -1 } else { 1 };
    let digits: String = zone.chars().filter(|c| c.is_ascii_digit()).collect();
    let hour: i16 = digits.get(0..2)?.parse().ok()?;
    let min: i16 = match digits.get(2..4) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    if hour > 14 || min > 59 {
        return None;
    }
    Some((sign * hour, sign * min))
}

impl DateItem {
    /// Date-only item.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            value: date.and_hms_opt(0, 0, 0),
            ..Self::default()
        }
    }

    /// Item with a time of day but no zone.
    pub fn from_datetime(value: NaiveDateTime) -> Self {
        Self {
            value: Some(value),
            has_time: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.value.map(|v| v.date())
    }

    /// Parse `text` under `format`. Anything unparseable yields an empty item.
    pub fn parse(text: &str, format: DateFormat, options: &FormatOptions) -> Self {
        let text = text.trim();
        let parsed = match format {
            DateFormat::IsoBasic => Self::parse_iso(text, iso_basic_re()),
            DateFormat::IsoExtended => Self::parse_iso(text, iso_extended_re()),
            DateFormat::Local => Self::parse_local(text, options),
        };
        parsed.unwrap_or_default()
    }

    fn parse_iso(text: &str, re: &Regex) -> Option<Self> {
        let caps = re.captures(text)?;
        let date = NaiveDate::from_ymd_opt(num(&caps, 1)? as i32, num(&caps, 2)?, num(&caps, 3)?)?;
        let mut item = Self::from_date(date);

        if caps.get(4).is_some() {
            let time = NaiveTime::from_hms_opt(num(&caps, 4)?, num(&caps, 5)?, num(&caps, 6).unwrap_or(0))?;
            item.value = Some(date.and_time(time));
            item.has_time = true;
        }
        if let Some(zone) = caps.get(7) {
            let (hour, min) = parse_zone(zone.as_str())?;
            item.has_time_zone = true;
            item.zone_hour = hour;
            item.zone_min = min;
        }
        Some(item)
    }

    fn parse_local(text: &str, options: &FormatOptions) -> Option<Self> {
        let with_time = format!("{} {}", options.date_format, options.time_format);
        if let Ok(value) = NaiveDateTime::parse_from_str(text, &with_time) {
            return Some(Self::from_datetime(value));
        }
        NaiveDate::parse_from_str(text, &options.date_format)
            .ok()
            .map(Self::from_date)
    }

    fn zone_string(&self, with_colon: bool) -> String {
        if !self.has_time_zone {
            return String::new();
        }
        if self.zone_hour == 0 && self.zone_min == 0 {
            return "Z".to_string();
        }
        let sign = if self.zone_hour < 0 || self.zone_min < 0 { '-' } else { '+' };
        let (h, m) = (self.zone_hour.abs(), self.zone_min.abs());
        if with_colon {
            format!("{sign}{h:02}:{m:02}")
        } else {
            format!("{sign}{h:02}{m:02}")
        }
    }

    /// Render under `format`. Empty items render as an empty string.
    pub fn to_string(&self, format: DateFormat, options: &FormatOptions) -> String {
        let Some(value) = self.value else {
            return String::new();
        };
        let with_time = self.has_time && !options.skip_time_from_date;
        match format {
            DateFormat::IsoBasic => {
                let mut s = value.format("%Y%m%d").to_string();
                if with_time {
                    s.push_str(&value.format("T%H%M%S").to_string());
                    s.push_str(&self.zone_string(false));
                }
                s
            }
            DateFormat::IsoExtended => {
                let mut s = value.format("%Y-%m-%d").to_string();
                if with_time {
                    s.push_str(&value.format("T%H:%M:%S").to_string());
                    s.push_str(&self.zone_string(true));
                }
                s
            }
            DateFormat::Local => {
                if with_time {
                    render_local(value, &format!("{} {}", options.date_format, options.time_format))
                } else {
                    render_local(value, &options.date_format)
                }
            }
        }
    }

    /// The moment in UTC when a zone is known, the local value otherwise.
    fn comparable_instant(&self) -> Option<NaiveDateTime> {
        let value = self.value?;
        if self.has_time_zone {
            let offset = Duration::hours(self.zone_hour as i64) + Duration::minutes(self.zone_min as i64);
            Some(value - offset)
        } else {
            Some(value)
        }
    }
}

/// Whether chrono accepts every specifier in `pattern`.
pub fn is_valid_format(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// Empty when `pattern` cannot be rendered.
fn render_local(value: NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", value.format(pattern)).is_err() {
        log::warn!("cannot render date with format {pattern:?}");
        out.clear();
    }
    out
}

impl PartialEq for DateItem {
    fn eq(&self, other: &Self) -> bool {
        match (self.value, other.value) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                if self.has_time != other.has_time {
                    return false;
                }
                if !self.has_time {
                    return a.date() == b.date();
                }
                self.has_time_zone == other.has_time_zone
                    && self.comparable_instant() == other.comparable_instant()
            }
            _ => false,
        }
    }
}

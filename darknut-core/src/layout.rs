//! Timestamp layouts written as a reference time.
//!
//! A layout spells out how the reference time `Mon Jan 2 15:04:05 MST 2006`
//! (offset `-0700`) would be written, e.g. `2006-01-02` or
//! `02 Jan 06 15:04 -0700`. Recognised chunks become [`chrono`] format items,
//! everything else must match literally.
//!
//! Elements missing from the layout default to the earliest valid value:
//! year 0, January 1st, midnight. A layout without a UTC offset yields a
//! timestamp at offset zero.
//!
//! Zero-padded chunks such as `01` or `15` also accept a single digit, so
//! `2023-8-13` matches `2006-01-02`.

use chrono::format::{self, Fixed, Item, Numeric, Pad, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset};

use crate::tracing_macros::trace;

/// The default layout for timestamp fields.
pub const RFC3339: &str = "2006-01-02T15:04:05Z07:00";

/// A reference-time layout translated to [`chrono`] format items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout<'a> {
    items: Vec<Item<'a>>,
}

enum Chunk {
    Item(Item<'static>),
    Second,
    Fraction,
}

impl<'a> Layout<'a> {
    /// Translates a layout string. Every string is a valid layout.
    pub fn parse(layout: &'a str) -> Self {
        let bytes = layout.as_bytes();
        let mut items = Vec::new();
        let mut literal_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            let Some((len, chunk)) = chunk_at(&bytes[i..]) else {
                i += 1;
                continue;
            };

            // chunks always start on an ASCII byte, so `i` is a char boundary
            if literal_start < i {
                items.push(Item::Literal(&layout[literal_start..i]));
            }

            match chunk {
                Chunk::Item(item) => items.push(item),
                Chunk::Second => {
                    items.push(Item::Numeric(Numeric::Second, Pad::Zero));
                    items.push(Item::Fixed(Fixed::Nanosecond));
                }
                Chunk::Fraction => {
                    if items.last() != Some(&Item::Fixed(Fixed::Nanosecond)) {
                        items.push(Item::Fixed(Fixed::Nanosecond));
                    }
                }
            }

            i += len;
            literal_start = i;
        }

        if literal_start < bytes.len() {
            items.push(Item::Literal(&layout[literal_start..]));
        }

        Layout { items }
    }

    /// The translated format items.
    pub fn items(&self) -> &[Item<'a>] {
        &self.items
    }

    /// Parses `value` according to this layout.
    pub fn parse_timestamp(&self, value: &str) -> Result<DateTime<FixedOffset>, format::ParseError> {
        let mut parsed = Parsed::default();
        format::parse(&mut parsed, value, self.items.iter())?;
        fill_defaults(&mut parsed)?;

        match parsed.offset() {
            Some(_) => parsed.to_datetime(),
            None => {
                trace!(value, "no offset in layout, assuming UTC");
                Ok(parsed
                    .to_naive_datetime_with_offset(0)?
                    .and_utc()
                    .fixed_offset())
            }
        }
    }
}

/// Parses `value` with a reference-time `layout`.
pub fn parse_timestamp(value: &str, layout: &str) -> Result<DateTime<FixedOffset>, format::ParseError> {
    Layout::parse(layout).parse_timestamp(value)
}

fn fill_defaults(parsed: &mut Parsed) -> Result<(), format::ParseError> {
    let has_year = parsed.year().is_some()
        || parsed.year_mod_100().is_some()
        || parsed.year_div_100().is_some()
        || parsed.isoyear().is_some();
    if !has_year {
        parsed.set_year(0)?;
    }

    // two-digit years 69..=99 fall in the 1900s
    if let (None, None, Some(yy)) = (parsed.year(), parsed.year_div_100(), parsed.year_mod_100()) {
        parsed.set_year_div_100(if yy >= 69 { 19 } else { 20 })?;
    }

    if parsed.ordinal().is_none() {
        if parsed.month().is_none() {
            parsed.set_month(1)?;
        }
        if parsed.day().is_none() {
            parsed.set_day(1)?;
        }
    }

    match (parsed.hour_div_12(), parsed.hour_mod_12()) {
        (None, None) => parsed.set_hour(0)?,
        // 12-hour clock without an AM/PM marker keeps the hour as written
        (None, Some(hour)) => parsed.set_ampm(hour == 0)?,
        (Some(_), None) => parsed.set_hour12(12)?,
        (Some(_), Some(_)) => {}
    }

    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }
    if parsed.second().is_none() {
        parsed.set_second(0)?;
    }

    Ok(())
}

fn chunk_at(b: &[u8]) -> Option<(usize, Chunk)> {
    let starts = |prefix: &str| b.starts_with(prefix.as_bytes());
    let lower_at = |n: usize| b.get(n).is_some_and(u8::is_ascii_lowercase);
    let fixed = |len: usize, fixed: Fixed| Some((len, Chunk::Item(Item::Fixed(fixed))));
    let num = |len: usize, numeric: Numeric, pad: Pad| {
        Some((len, Chunk::Item(Item::Numeric(numeric, pad))))
    };

    match *b.first()? {
        b'J' if starts("January") => fixed(7, Fixed::LongMonthName),
        b'J' if starts("Jan") && !lower_at(3) => fixed(3, Fixed::ShortMonthName),
        b'M' if starts("Monday") => fixed(6, Fixed::LongWeekdayName),
        b'M' if starts("Mon") && !lower_at(3) => fixed(3, Fixed::ShortWeekdayName),
        b'M' if starts("MST") => fixed(3, Fixed::TimezoneName),
        b'0' => match b.get(1)? {
            b'1' => num(2, Numeric::Month, Pad::Zero),
            b'2' => num(2, Numeric::Day, Pad::Zero),
            b'3' => num(2, Numeric::Hour12, Pad::Zero),
            b'4' => num(2, Numeric::Minute, Pad::Zero),
            b'5' => Some((2, Chunk::Second)),
            b'6' => num(2, Numeric::YearMod100, Pad::Zero),
            b'0' if b.get(2) == Some(&b'2') => num(3, Numeric::Ordinal, Pad::Zero),
            _ => None,
        },
        b'1' if starts("15") => num(2, Numeric::Hour, Pad::Zero),
        b'1' => num(1, Numeric::Month, Pad::None),
        b'2' if starts("2006") => num(4, Numeric::Year, Pad::Zero),
        b'2' => num(1, Numeric::Day, Pad::None),
        // `_2006` is a literal underscore followed by the year
        b'_' if starts("_2") && !starts("_2006") => num(2, Numeric::Day, Pad::Space),
        b'_' if starts("__2") => num(3, Numeric::Ordinal, Pad::Space),
        b'3' => num(1, Numeric::Hour12, Pad::None),
        b'4' => num(1, Numeric::Minute, Pad::None),
        b'5' => Some((1, Chunk::Second)),
        b'P' if starts("PM") => fixed(2, Fixed::UpperAmPm),
        b'p' if starts("pm") => fixed(2, Fixed::LowerAmPm),
        b'-' if starts("-07:00") => fixed(6, Fixed::TimezoneOffsetColon),
        b'-' if starts("-0700") => fixed(5, Fixed::TimezoneOffset),
        b'-' if starts("-07") => Some((3, Chunk::Item(permissive_offset()))),
        b'Z' if starts("Z07:00") => fixed(6, Fixed::TimezoneOffsetColonZ),
        b'Z' if starts("Z0700") => fixed(5, Fixed::TimezoneOffsetZ),
        b'Z' if starts("Z07") => Some((3, Chunk::Item(permissive_offset()))),
        b'.' | b',' => fraction_len(b).map(|len| (len, Chunk::Fraction)),
        _ => None,
    }
}

// `.000` or `.999`, not followed by another digit.
fn fraction_len(b: &[u8]) -> Option<usize> {
    let digit = *b.get(1)?;
    if digit != b'0' && digit != b'9' {
        return None;
    }
    let run = b[1..].iter().take_while(|&&c| c == digit).count();
    let len = 1 + run;
    match b.get(len) {
        Some(c) if c.is_ascii_digit() => None,
        _ => Some(len),
    }
}

// `+hh`, `+hhmm`, `+hh:mm` or `Z`
fn permissive_offset() -> Item<'static> {
    StrftimeItems::new("%#z")
        .next()
        .unwrap_or(Item::Fixed(Fixed::TimezoneOffsetZ))
}

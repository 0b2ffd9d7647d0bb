//! Conversion of attribute strings into field values.

use core::str::FromStr;
use std::error::Error;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

use crate::{Layout, RFC3339, Tag, ValueError};

/// A type that can be decoded from a single attribute value.
///
/// The field's [`Tag`] is passed along so that decoders can honour options
/// such as `format=`.
///
/// Types with a [`FromStr`] implementation can opt in with
/// [`impl_text_decodable!`](crate::impl_text_decodable).
pub trait ScalarDecodable: Sized {
    /// Decodes `value`.
    fn decode_scalar(value: &str, tag: &Tag) -> Result<Self, ValueError>;
}

impl ScalarDecodable for String {
    fn decode_scalar(value: &str, _tag: &Tag) -> Result<Self, ValueError> {
        Ok(value.to_owned())
    }
}

impl ScalarDecodable for bool {
    fn decode_scalar(value: &str, _tag: &Tag) -> Result<Self, ValueError> {
        match value {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(ValueError::InvalidBool {
                value: value.to_owned(),
            }),
        }
    }
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {
        $(
            impl ScalarDecodable for $ty {
                fn decode_scalar(value: &str, _tag: &Tag) -> Result<Self, ValueError> {
                    value.parse().map_err(|source| ValueError::InvalidInt {
                        value: value.to_owned(),
                        bits: <$ty>::BITS,
                        source,
                    })
                }
            }
        )*
    };
}

impl_signed!(i8, i16, i32, i64, i128, isize);

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {
        $(
            impl ScalarDecodable for $ty {
                fn decode_scalar(value: &str, _tag: &Tag) -> Result<Self, ValueError> {
                    // `FromStr` takes a leading `+`, unsigned values carry no sign
                    if value.starts_with('+') {
                        return Err(ValueError::SignedUint {
                            value: value.to_owned(),
                            bits: <$ty>::BITS,
                        });
                    }
                    value.parse().map_err(|source| ValueError::InvalidUint {
                        value: value.to_owned(),
                        bits: <$ty>::BITS,
                        source,
                    })
                }
            }
        )*
    };
}

impl_unsigned!(u8, u16, u32, u64, u128, usize);

macro_rules! impl_float {
    ($($ty:ty => $bits:literal),*) => {
        $(
            impl ScalarDecodable for $ty {
                fn decode_scalar(value: &str, _tag: &Tag) -> Result<Self, ValueError> {
                    let parsed: $ty = value.parse().map_err(|source| ValueError::InvalidFloat {
                        value: value.to_owned(),
                        bits: $bits,
                        source,
                    })?;
                    if parsed.is_infinite() && !spells_infinity(value) {
                        return Err(ValueError::FloatOutOfRange {
                            value: value.to_owned(),
                            bits: $bits,
                        });
                    }
                    Ok(parsed)
                }
            }
        )*
    };
}

impl_float!(f32 => 32, f64 => 64);

fn spells_infinity(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

impl ScalarDecodable for DateTime<FixedOffset> {
    fn decode_scalar(value: &str, tag: &Tag) -> Result<Self, ValueError> {
        let layout = tag.format().unwrap_or(RFC3339);
        Layout::parse(layout)
            .parse_timestamp(value)
            .map_err(|source| ValueError::InvalidTime {
                value: value.to_owned(),
                layout: layout.to_owned(),
                source,
            })
    }
}

impl ScalarDecodable for DateTime<Utc> {
    fn decode_scalar(value: &str, tag: &Tag) -> Result<Self, ValueError> {
        DateTime::<FixedOffset>::decode_scalar(value, tag).map(|ts| ts.with_timezone(&Utc))
    }
}

/// Keeps the wall-clock time as written, dropping the offset.
impl ScalarDecodable for NaiveDateTime {
    fn decode_scalar(value: &str, tag: &Tag) -> Result<Self, ValueError> {
        DateTime::<FixedOffset>::decode_scalar(value, tag).map(|ts| ts.naive_local())
    }
}

/// Keeps the calendar date as written, dropping time and offset.
impl ScalarDecodable for NaiveDate {
    fn decode_scalar(value: &str, tag: &Tag) -> Result<Self, ValueError> {
        NaiveDateTime::decode_scalar(value, tag).map(|ts| ts.date())
    }
}

/// Decodes a value through its [`FromStr`] implementation.
///
/// This is what [`impl_text_decodable!`](crate::impl_text_decodable) expands to.
pub fn decode_text<T>(value: &str) -> Result<T, ValueError>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    value.parse().map_err(|source| ValueError::TextDecode {
        value: value.to_owned(),
        type_name: core::any::type_name::<T>(),
        source: Box::new(source),
    })
}

/// Implements [`ScalarDecodable`] for types that parse themselves from text
/// via [`FromStr`].
///
/// ```ignore
/// struct Sector(String);
///
/// impl std::str::FromStr for Sector { /* ... */ }
///
/// darknut::impl_text_decodable!(Sector);
/// ```
#[macro_export]
macro_rules! impl_text_decodable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::ScalarDecodable for $ty {
                fn decode_scalar(
                    value: &str,
                    _tag: &$crate::Tag,
                ) -> ::core::result::Result<Self, $crate::ValueError> {
                    $crate::decode_text(value)
                }
            }
        )+
    };
}

#[cfg(feature = "uuid")]
impl_text_decodable!(uuid::Uuid);

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use darknut::{Block, Document, ErrorKind, Unmarshal};
use darknut_testhelpers::test;

fn block(data: &[(&str, &str)]) -> Block {
    Block {
        data: data
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        ..Default::default()
    }
}

#[derive(Debug, Default, Unmarshal)]
struct Numbers {
    #[newsdoc("data.i8")]
    i8: i8,
    #[newsdoc("data.i16")]
    i16: i16,
    #[newsdoc("data.i32")]
    i32: i32,
    #[newsdoc("data.i64")]
    i64: i64,
    #[newsdoc("data.u8")]
    u8: u8,
    #[newsdoc("data.u64")]
    u64: u64,
    #[newsdoc("data.usize")]
    usize: usize,
    #[newsdoc("data.f32")]
    f32: f32,
    #[newsdoc("data.f64")]
    f64: f64,
}

#[test]
fn numbers_at_their_widths() {
    let numbers: Numbers = darknut::from_block(&block(&[
        ("i8", "-128"),
        ("i16", "32767"),
        ("i32", "-7"),
        ("i64", "9000000000"),
        ("u8", "255"),
        ("u64", "18446744073709551615"),
        ("usize", "42"),
        ("f32", "0.5"),
        ("f64", "-1.25e2"),
    ]))
    .unwrap();

    assert_eq!(numbers.i8, i8::MIN);
    assert_eq!(numbers.i16, i16::MAX);
    assert_eq!(numbers.i32, -7);
    assert_eq!(numbers.i64, 9_000_000_000);
    assert_eq!(numbers.u8, u8::MAX);
    assert_eq!(numbers.u64, u64::MAX);
    assert_eq!(numbers.usize, 42);
    assert_eq!(numbers.f32, 0.5);
    assert_eq!(numbers.f64, -125.0);
}

#[derive(Debug, Default, Unmarshal)]
struct Small {
    #[newsdoc("data.n")]
    n: u8,
}

#[test]
fn out_of_range_integer_is_rejected() {
    let err = darknut::from_block::<Small>(&block(&[("n", "256")])).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidUint);
    insta::assert_snapshot!(err, @r#"failed to unmarshal Small.n: invalid 8-bit unsigned integer "256": number too large to fit in target type"#);
}

#[derive(Debug, Default, Unmarshal)]
struct Measures {
    #[newsdoc("data.wide,optional")]
    wide: f64,
    #[newsdoc("data.narrow,optional")]
    narrow: f32,
    #[newsdoc("data.count,optional")]
    count: u64,
}

#[test]
fn overflowing_floats_are_rejected() {
    let err = darknut::from_block::<Measures>(&block(&[("wide", "1e400")])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFloat);
    insta::assert_snapshot!(err, @r#"failed to unmarshal Measures.wide: invalid 64-bit float "1e400": value out of range"#);

    let err = darknut::from_block::<Measures>(&block(&[("narrow", "1e40")])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFloat);

    let measures: Measures =
        darknut::from_block(&block(&[("wide", "-Inf"), ("narrow", "1e38")])).unwrap();
    assert_eq!(measures.wide, f64::NEG_INFINITY);
    assert_eq!(measures.narrow, 1e38);
}

#[test]
fn signed_unsigned_is_rejected() {
    let err = darknut::from_block::<Measures>(&block(&[("count", "+5")])).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidUint);
    insta::assert_snapshot!(err, @r#"failed to unmarshal Measures.count: invalid 64-bit unsigned integer "+5": unexpected sign"#);
}

#[derive(Debug, Default, Unmarshal)]
struct Flags {
    #[newsdoc("data.a")]
    a: bool,
    #[newsdoc("data.b")]
    b: bool,
    #[newsdoc("data.c")]
    c: Option<bool>,
}

#[test]
fn booleans() {
    let flags: Flags = darknut::from_block(&block(&[("a", "T"), ("b", "0")])).unwrap();

    assert!(flags.a);
    assert!(!flags.b);
    assert_eq!(flags.c, None);

    let err = darknut::from_block::<Flags>(&block(&[("a", "yes"), ("b", "0")])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidBool);
    insta::assert_snapshot!(err, @r#"failed to unmarshal Flags.a: invalid boolean value "yes""#);
}

#[derive(Debug, Default, Unmarshal)]
struct Optionals {
    #[newsdoc("data.required")]
    required: String,
    #[newsdoc("data.flagged,optional")]
    flagged: String,
    #[newsdoc("data.indirect")]
    indirect: Option<i64>,
}

#[test]
fn missing_required_value() {
    let err = darknut::from_block::<Optionals>(&block(&[])).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingRequiredValue);
    insta::assert_snapshot!(err, @"failed to unmarshal Optionals.required: missing required value");
}

#[test]
fn optional_flag_and_indirection() {
    let mut target = Optionals {
        flagged: "kept".into(),
        ..Default::default()
    };
    darknut::unmarshal_block(&block(&[("required", "x")]), &mut target).unwrap();

    assert_eq!(target.required, "x");
    assert_eq!(target.flagged, "kept");
    assert_eq!(target.indirect, None);

    darknut::unmarshal_block(
        &block(&[("required", "y"), ("flagged", ""), ("indirect", "3")]),
        &mut target,
    )
    .unwrap();

    assert_eq!(target.required, "y");
    assert_eq!(target.flagged, "");
    assert_eq!(target.indirect, Some(3));
}

#[derive(Debug, Default, Unmarshal)]
struct Times {
    #[newsdoc("data.default")]
    default: DateTime<FixedOffset>,
    #[newsdoc("data.utc")]
    utc: DateTime<Utc>,
    #[newsdoc("data.day,format=2006-01-02")]
    day: NaiveDate,
    #[newsdoc("data.local,format=02 Jan 2006 15:04")]
    local: NaiveDateTime,
    #[newsdoc("data.kitchen,format=3:04PM")]
    kitchen: Option<NaiveDateTime>,
}

#[test]
fn timestamps_with_layouts() {
    let times: Times = darknut::from_block(&block(&[
        ("default", "2023-08-21T14:34:47+02:00"),
        ("utc", "2023-08-21T14:34:47+02:00"),
        ("day", "2023-08-13"),
        ("local", "21 Aug 2023 09:05"),
        ("kitchen", "4:20PM"),
    ]))
    .unwrap();

    assert_eq!(times.default.offset().local_minus_utc(), 7200);
    assert_eq!(times.default.to_rfc3339(), "2023-08-21T14:34:47+02:00");
    assert_eq!(times.utc.to_rfc3339(), "2023-08-21T12:34:47+00:00");
    assert_eq!(times.day, NaiveDate::from_ymd_opt(2023, 8, 13).unwrap());
    assert_eq!(
        times.local,
        NaiveDate::from_ymd_opt(2023, 8, 21)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap()
    );
    assert_eq!(
        times.kitchen,
        NaiveDate::from_ymd_opt(0, 1, 1).unwrap().and_hms_opt(16, 20, 0)
    );
}

#[test]
fn timestamp_not_matching_layout() {
    let err = darknut::from_block::<Times>(&block(&[("default", "2023-08-21")])).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidTime);
    assert!(
        err.to_string().starts_with(
            r#"failed to unmarshal Times.default: invalid timestamp "2023-08-21" for layout "2006-01-02T15:04:05Z07:00""#
        ),
        "{err}"
    );
}

#[derive(Debug, Default, PartialEq)]
struct Sector(String);

#[derive(Debug)]
struct UnknownSector(String);

impl fmt::Display for UnknownSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sector {:?}", self.0)
    }
}

impl std::error::Error for UnknownSector {}

impl FromStr for Sector {
    type Err = UnknownSector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domestic" | "foreign" | "sports" => Ok(Sector(s.to_owned())),
            _ => Err(UnknownSector(s.to_owned())),
        }
    }
}

darknut::impl_text_decodable!(Sector);

#[derive(Debug, Default, Unmarshal)]
struct Section {
    #[newsdoc("value")]
    sector: Sector,
    #[newsdoc("uuid")]
    uuid: Option<uuid::Uuid>,
}

#[test]
fn text_decodable_types() {
    let section: Section = darknut::from_block(&Block {
        value: "sports".into(),
        uuid: "ea3f5d8b-2c1a-4e6f-9b0d-7c8e9f0a1b2c".into(),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(section.sector, Sector("sports".into()));
    assert_eq!(
        section.uuid.map(|u| u.to_string()).as_deref(),
        Some("ea3f5d8b-2c1a-4e6f-9b0d-7c8e9f0a1b2c")
    );

    let err = darknut::from_block::<Section>(&Block {
        value: "weather".into(),
        ..Default::default()
    })
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TextDecode);
    let source = std::error::Error::source(&err).unwrap();
    let cause = source.source().unwrap();
    assert_eq!(cause.to_string(), r#"unknown sector "weather""#);
}

#[derive(Debug, Default, Unmarshal)]
struct Root {
    #[newsdoc("uuid")]
    uuid: String,
    #[newsdoc("language")]
    language: String,
    #[newsdoc("url")]
    url: Option<String>,
}

#[test]
fn document_attributes() {
    let root: Root = darknut::from_document(&Document {
        uuid: "abc".into(),
        language: "sv-se".into(),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(root.uuid, "abc");
    assert_eq!(root.language, "sv-se");
    // known attributes exist even when empty
    assert_eq!(root.url, Some(String::new()));
}

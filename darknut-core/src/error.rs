//! Errors produced while parsing annotations, decoding scalars and
//! unmarshalling documents.

use core::fmt;
use core::num::{ParseFloatError, ParseIntError};
use std::error::Error;

/// An annotation string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagParseError {
    /// The annotation as written on the field.
    pub raw: &'static str,
    /// What was wrong with it.
    pub reason: TagParseErrorReason,
}

/// Why an annotation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagParseErrorReason {
    /// The part before the first comma is empty.
    EmptyName,
    /// An option between two commas (or after a trailing comma) is empty.
    EmptyOption {
        /// 1-based position of the option after the name.
        position: usize,
    },
    /// An option of the form `=value`.
    EmptyOptionKey {
        /// The offending option text.
        option: &'static str,
    },
}

impl fmt::Display for TagParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid annotation {:?}: ", self.raw)?;
        match self.reason {
            TagParseErrorReason::EmptyName => write!(f, "empty name"),
            TagParseErrorReason::EmptyOption { position } => {
                write!(f, "option {position} is empty")
            }
            TagParseErrorReason::EmptyOptionKey { option } => {
                write!(f, "option {option:?} has an empty key")
            }
        }
    }
}

impl Error for TagParseError {}

/// A single attribute value that could not be converted to the field's type.
#[derive(Debug)]
pub enum ValueError {
    /// Not one of the accepted boolean spellings.
    InvalidBool {
        /// The raw attribute value.
        value: String,
    },
    /// Not a base-10 signed integer that fits the target width.
    InvalidInt {
        /// The raw attribute value.
        value: String,
        /// Bit width of the target type.
        bits: u32,
        /// The underlying parse failure.
        source: ParseIntError,
    },
    /// Not a base-10 unsigned integer that fits the target width.
    InvalidUint {
        /// The raw attribute value.
        value: String,
        /// Bit width of the target type.
        bits: u32,
        /// The underlying parse failure.
        source: ParseIntError,
    },
    /// A sign in front of an unsigned integer.
    SignedUint {
        /// The raw attribute value.
        value: String,
        /// Bit width of the target type.
        bits: u32,
    },
    /// Not a floating point number.
    InvalidFloat {
        /// The raw attribute value.
        value: String,
        /// Bit width of the target type.
        bits: u32,
        /// The underlying parse failure.
        source: ParseFloatError,
    },
    /// A finite number too large for the target width.
    FloatOutOfRange {
        /// The raw attribute value.
        value: String,
        /// Bit width of the target type.
        bits: u32,
    },
    /// Does not match the timestamp layout.
    InvalidTime {
        /// The raw attribute value.
        value: String,
        /// The layout the value was parsed against.
        layout: String,
        /// The underlying parse failure.
        source: chrono::ParseError,
    },
    /// A text-decodable type rejected the value.
    TextDecode {
        /// The raw attribute value.
        value: String,
        /// Name of the target type.
        type_name: &'static str,
        /// The error returned by the type's parser.
        source: Box<dyn Error + Send + Sync>,
    },
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::InvalidBool { value } => {
                write!(f, "invalid boolean value {value:?}")
            }
            ValueError::InvalidInt {
                value,
                bits,
                source,
            } => write!(f, "invalid {bits}-bit integer {value:?}: {source}"),
            ValueError::InvalidUint {
                value,
                bits,
                source,
            } => write!(f, "invalid {bits}-bit unsigned integer {value:?}: {source}"),
            ValueError::SignedUint { value, bits } => {
                write!(f, "invalid {bits}-bit unsigned integer {value:?}: unexpected sign")
            }
            ValueError::InvalidFloat {
                value,
                bits,
                source,
            } => write!(f, "invalid {bits}-bit float {value:?}: {source}"),
            ValueError::FloatOutOfRange { value, bits } => {
                write!(f, "invalid {bits}-bit float {value:?}: value out of range")
            }
            ValueError::InvalidTime {
                value,
                layout,
                source,
            } => write!(
                f,
                "invalid timestamp {value:?} for layout {layout:?}: {source}"
            ),
            ValueError::TextDecode {
                value,
                type_name,
                source,
            } => write!(f, "invalid {type_name} value {value:?}: {source}"),
        }
    }
}

impl ValueError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValueError::InvalidBool { .. } => ErrorKind::InvalidBool,
            ValueError::InvalidInt { .. } => ErrorKind::InvalidInt,
            ValueError::InvalidUint { .. } | ValueError::SignedUint { .. } => {
                ErrorKind::InvalidUint
            }
            ValueError::InvalidFloat { .. } | ValueError::FloatOutOfRange { .. } => {
                ErrorKind::InvalidFloat
            }
            ValueError::InvalidTime { .. } => ErrorKind::InvalidTime,
            ValueError::TextDecode { .. } => ErrorKind::TextDecode,
        }
    }
}

impl Error for ValueError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ValueError::InvalidBool { .. }
            | ValueError::SignedUint { .. }
            | ValueError::FloatOutOfRange { .. } => None,
            ValueError::InvalidInt { source, .. } | ValueError::InvalidUint { source, .. } => {
                Some(source)
            }
            ValueError::InvalidFloat { source, .. } => Some(source),
            ValueError::InvalidTime { source, .. } => Some(source),
            ValueError::TextDecode { source, .. } => Some(source.as_ref()),
        }
    }
}

/// A field whose Rust type cannot hold what its annotation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeViolation {
    /// A collection of indirect elements (`Vec<Option<T>>`, `Vec<Box<T>>`).
    IndirectElement,
    /// A block group annotation on a scalar field.
    GroupTagOnScalarField,
    /// An attribute annotation on a block field.
    ScalarTagOnBlockField,
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeViolation::IndirectElement => {
                write!(f, "collections of optional or boxed elements are not supported")
            }
            ShapeViolation::GroupTagOnScalarField => {
                write!(f, "block group annotation on a scalar field")
            }
            ShapeViolation::ScalarTagOnBlockField => {
                write!(f, "attribute annotation on a block field")
            }
        }
    }
}

/// Category of the innermost failure behind an [`UnmarshalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A malformed annotation.
    TagParse,
    /// A required attribute was absent.
    MissingRequiredValue,
    /// No block matched a required block field.
    MissingRequiredBlock,
    /// A field type that doesn't fit its annotation.
    InvalidFieldShape,
    /// See [`ValueError::InvalidBool`].
    InvalidBool,
    /// See [`ValueError::InvalidInt`].
    InvalidInt,
    /// See [`ValueError::InvalidUint`].
    InvalidUint,
    /// See [`ValueError::InvalidFloat`].
    InvalidFloat,
    /// See [`ValueError::InvalidTime`].
    InvalidTime,
    /// See [`ValueError::TextDecode`].
    TextDecode,
}

/// A `Type.field` pair naming where an error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef {
    /// Name of the struct.
    pub type_name: &'static str,
    /// Name of the field.
    pub field: &'static str,
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.field)
    }
}

/// Error returned when a document or block can't be mapped onto a type.
///
/// Every variant names the struct and field it happened on. Failures inside
/// nested blocks are wrapped in [`UnmarshalError::Blocks`], one layer per
/// level, so [`UnmarshalError::path`] reads outermost first.
#[derive(Debug)]
pub enum UnmarshalError {
    /// The field's annotation could not be parsed.
    TagParse {
        /// Name of the struct.
        type_name: &'static str,
        /// Name of the field.
        field: &'static str,
        /// The parse failure.
        source: TagParseError,
    },
    /// A required attribute does not exist.
    MissingRequiredValue {
        /// Name of the struct.
        type_name: &'static str,
        /// Name of the field.
        field: &'static str,
    },
    /// No block matched the filters of a required block field.
    MissingRequiredBlock {
        /// Name of the struct.
        type_name: &'static str,
        /// Name of the field.
        field: &'static str,
    },
    /// The field's type and annotation don't fit together.
    InvalidFieldShape {
        /// Name of the struct.
        type_name: &'static str,
        /// Name of the field.
        field: &'static str,
        /// What doesn't fit.
        reason: ShapeViolation,
    },
    /// An attribute value could not be decoded.
    Value {
        /// Name of the struct.
        type_name: &'static str,
        /// Name of the field.
        field: &'static str,
        /// The decoding failure.
        source: ValueError,
    },
    /// Unmarshalling a matched block failed.
    Blocks {
        /// Name of the struct.
        type_name: &'static str,
        /// Name of the field.
        field: &'static str,
        /// The failure inside the block.
        source: Box<UnmarshalError>,
    },
}

impl UnmarshalError {
    /// The category of the innermost failure, looking through
    /// [`UnmarshalError::Blocks`] layers.
    pub fn kind(&self) -> ErrorKind {
        match self.root_cause() {
            UnmarshalError::TagParse { .. } => ErrorKind::TagParse,
            UnmarshalError::MissingRequiredValue { .. } => ErrorKind::MissingRequiredValue,
            UnmarshalError::MissingRequiredBlock { .. } => ErrorKind::MissingRequiredBlock,
            UnmarshalError::InvalidFieldShape { .. } => ErrorKind::InvalidFieldShape,
            UnmarshalError::Value { source, .. } => source.kind(),
            // root_cause never stops on a Blocks layer
            UnmarshalError::Blocks { source, .. } => source.kind(),
        }
    }

    /// The struct and field this error is reported on.
    pub fn field(&self) -> FieldRef {
        let (type_name, field) = match self {
            UnmarshalError::TagParse {
                type_name, field, ..
            }
            | UnmarshalError::MissingRequiredValue { type_name, field }
            | UnmarshalError::MissingRequiredBlock { type_name, field }
            | UnmarshalError::InvalidFieldShape {
                type_name, field, ..
            }
            | UnmarshalError::Value {
                type_name, field, ..
            }
            | UnmarshalError::Blocks {
                type_name, field, ..
            } => (*type_name, *field),
        };
        FieldRef { type_name, field }
    }

    /// The chain of fields from the outermost struct down to the failure.
    pub fn path(&self) -> Vec<FieldRef> {
        let mut path = vec![self.field()];
        let mut current = self;
        while let UnmarshalError::Blocks { source, .. } = current {
            path.push(source.field());
            current = source;
        }
        path
    }

    /// The innermost error, below all [`UnmarshalError::Blocks`] layers.
    pub fn root_cause(&self) -> &UnmarshalError {
        let mut current = self;
        while let UnmarshalError::Blocks { source, .. } = current {
            current = source;
        }
        current
    }
}

impl fmt::Display for UnmarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = self.field();
        match self {
            UnmarshalError::TagParse { source, .. } => {
                write!(f, "failed to parse annotation for {at}: {source}")
            }
            UnmarshalError::MissingRequiredValue { .. } => {
                write!(f, "failed to unmarshal {at}: missing required value")
            }
            UnmarshalError::MissingRequiredBlock { .. } => {
                write!(f, "missing required block for {at}")
            }
            UnmarshalError::InvalidFieldShape { reason, .. } => {
                write!(f, "invalid field shape for {at}: {reason}")
            }
            UnmarshalError::Value { source, .. } => {
                write!(f, "failed to unmarshal {at}: {source}")
            }
            UnmarshalError::Blocks { source, .. } => {
                write!(f, "failed to unmarshal blocks for {at}: {source}")
            }
        }
    }
}

impl Error for UnmarshalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            UnmarshalError::TagParse { source, .. } => Some(source),
            UnmarshalError::Value { source, .. } => Some(source),
            UnmarshalError::Blocks { source, .. } => Some(source.as_ref()),
            UnmarshalError::MissingRequiredValue { .. }
            | UnmarshalError::MissingRequiredBlock { .. }
            | UnmarshalError::InvalidFieldShape { .. } => None,
        }
    }
}

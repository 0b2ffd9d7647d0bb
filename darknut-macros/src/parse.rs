//! Grammar for the derive input.
//!
//! Only what the derive needs is recognised: the struct name, its named
//! fields, their `#[newsdoc]` annotation and the outer shape of their type.

use proc_macro2::{Delimiter, Group, Ident, Span, TokenStream, TokenTree};
use quote::quote_spanned;
use unsynn::*;

const GROUPS: [&str; 3] = ["meta", "links", "content"];

keyword! {
    KStruct = "struct";
    KEnum = "enum";
    KUnion = "union";
    KWhere = "where";
    KPub = "pub";
    KNewsdoc = "newsdoc";
}

operator! {
    Equals = "=";
    Arrow = "->";
    PathSep = "::";
    Open = "<";
    Close = ">";
}

unsynn! {
    /// `pub`, `pub(crate)`, `pub(in path)`
    enum Vis {
        Restricted(Cons<KPub, ParenthesisGroup>),
        Pub(KPub),
    }

    /// `#[...]`, including desugared doc comments
    struct Attribute {
        _pound: Pound,
        content: BracketGroup,
    }

    enum DeriveInput {
        Struct(StructDef),
        Enum(EnumDef),
        Union(UnionDef),
    }

    struct StructDef {
        _attrs: Vec<Attribute>,
        _vis: Option<Vis>,
        _kw: KStruct,
        name: Ident,
        generics: Option<AngleBracketed>,
        body: StructBody,
    }

    enum StructBody {
        Named(BraceGroupContaining<CommaDelimitedVec<NamedField>>),
        Tuple(ParenthesisGroup),
        Where(KWhere),
        Unit(Semicolon),
    }

    struct EnumDef {
        _attrs: Vec<Attribute>,
        _vis: Option<Vis>,
        _kw: KEnum,
        name: Ident,
        _rest: Any<TokenTree>,
    }

    struct UnionDef {
        _attrs: Vec<Attribute>,
        _vis: Option<Vis>,
        _kw: KUnion,
        name: Ident,
        _rest: Any<TokenTree>,
    }

    struct NamedField {
        attrs: Vec<Attribute>,
        _vis: Option<Vis>,
        name: Ident,
        _colon: Colon,
        ty: FieldType,
    }

    /// Tokens up to the next comma outside of `<...>`.
    struct FieldType {
        tokens: Any<TypeToken>,
    }

    enum TypeToken {
        Arrow(Arrow),
        Angle(AngleBracketed),
        Other(Cons<Except<Either<Comma, Close>>, TokenTree>),
    }

    struct AngleBracketed {
        _open: Open,
        inner: Any<InnerToken>,
        _close: Close,
    }

    enum InnerToken {
        Arrow(Arrow),
        Angle(AngleBracketed),
        Other(Cons<Except<Close>, TokenTree>),
    }

    /// `path::Name<inner>` and nothing else
    struct Wrapped {
        _leading: Option<PathSep>,
        _path: Any<Cons<Ident, PathSep>>,
        name: Ident,
        _open: Open,
        inner: Any<InnerToken>,
        _close: Close,
        _end: EndOfStream,
    }

    struct NewsdocAttr {
        _name: KNewsdoc,
        args: NewsdocArgs,
        _end: EndOfStream,
    }

    enum NewsdocArgs {
        List(ParenthesisGroupContaining<Cons<LiteralString, Option<Comma>>>),
        Value(Cons<Equals, LiteralString>),
    }
}

pub struct ParsedStruct {
    pub name: Ident,
    pub fields: Vec<ParsedField>,
}

pub struct ParsedField {
    pub ident: Ident,
    /// The field name with any `r#` prefix removed.
    pub name: String,
    pub annotation: Option<Annotation>,
    pub ty: TypeShape,
}

pub struct Annotation {
    pub value: String,
    pub span: Span,
}

impl Annotation {
    /// Whether the annotation names a block group rather than an attribute.
    pub fn is_group(&self) -> bool {
        let name = self.value.split(',').next().unwrap_or_default();
        GROUPS.contains(&name)
    }
}

/// The outer shape of a field type, decided syntactically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    Plain,
    Option,
    Vec,
    /// `Vec<Option<T>>` or `Vec<Box<T>>`
    VecIndirect,
}

pub struct CompileError {
    span: Span,
    message: String,
}

impl CompileError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }

    pub fn to_compile_error(&self) -> TokenStream {
        let message = &self.message;
        quote_spanned! {self.span=>
            ::core::compile_error!(#message);
        }
    }
}

pub fn parse_struct(input: TokenStream) -> std::result::Result<ParsedStruct, CompileError> {
    let input = flatten_transparent_groups(input);
    let mut i = input.to_token_iter();

    let def = match i.parse::<DeriveInput>() {
        Ok(DeriveInput::Struct(def)) => def,
        Ok(DeriveInput::Enum(def)) => {
            return Err(CompileError::new(
                def.name.span(),
                "Unmarshal can only be derived for structs with named fields, not enums",
            ));
        }
        Ok(DeriveInput::Union(def)) => {
            return Err(CompileError::new(
                def.name.span(),
                "Unmarshal can only be derived for structs with named fields, not unions",
            ));
        }
        Err(err) => {
            return Err(CompileError::new(
                Span::call_site(),
                format!("expected a struct with named fields: {err}"),
            ));
        }
    };

    if def.generics.is_some() {
        return Err(CompileError::new(
            def.name.span(),
            "Unmarshal cannot be derived for generic structs",
        ));
    }

    let fields = match def.body {
        StructBody::Named(body) => body.content,
        StructBody::Tuple(group) => {
            return Err(CompileError::new(
                group.0.span(),
                "Unmarshal can only be derived for structs with named fields, not tuple structs",
            ));
        }
        StructBody::Where(_) => {
            return Err(CompileError::new(
                def.name.span(),
                "Unmarshal cannot be derived for generic structs",
            ));
        }
        StructBody::Unit(_) => {
            return Err(CompileError::new(
                def.name.span(),
                "Unmarshal can only be derived for structs with named fields, not unit structs",
            ));
        }
    };

    let fields = fields
        .iter()
        .map(|d| parse_field(&d.value))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(ParsedStruct {
        name: def.name,
        fields,
    })
}

fn parse_field(field: &NamedField) -> std::result::Result<ParsedField, CompileError> {
    let mut annotation: Option<Annotation> = None;

    for attr in &field.attrs {
        let Some(found) = parse_newsdoc_attribute(attr)? else {
            continue;
        };
        if annotation.is_some() {
            return Err(CompileError::new(
                attr.content.0.span(),
                "duplicate #[newsdoc] attribute",
            ));
        }
        annotation = Some(found);
    }

    let raw = field.name.to_string();
    let name = raw.strip_prefix("r#").unwrap_or(&raw).to_owned();

    Ok(ParsedField {
        ident: field.name.clone(),
        name,
        annotation,
        ty: type_shape(field.ty.to_token_stream()),
    })
}

/// Reads `newsdoc("...")` or `newsdoc = "..."` from the inside of `#[...]`.
/// Returns `None` for any other attribute.
fn parse_newsdoc_attribute(
    attr: &Attribute,
) -> std::result::Result<Option<Annotation>, CompileError> {
    let stream = attr.content.0.stream();
    let span = attr.content.0.span();

    if stream.clone().to_token_iter().parse::<KNewsdoc>().is_err() {
        return Ok(None);
    }

    let literal = match stream.clone().to_token_iter().parse::<NewsdocAttr>() {
        Ok(parsed) => match parsed.args {
            NewsdocArgs::List(args) => args.content.first,
            NewsdocArgs::Value(args) => args.second,
        },
        Err(_) if stream
            .to_token_iter()
            .parse::<Cons<KNewsdoc, ParenthesisGroup>>()
            .is_ok() =>
        {
            return Err(CompileError::new(
                span,
                "expected a single string literal: #[newsdoc(\"name,option,...\")]",
            ));
        }
        Err(_) => {
            return Err(CompileError::new(
                span,
                "expected #[newsdoc(\"name,option,...\")] or #[newsdoc = \"name,option,...\"]",
            ));
        }
    };

    let value = literal.value().trim_matches('"').to_owned();
    if value.contains('\\') {
        return Err(CompileError::new(
            span,
            "escape sequences are not supported in #[newsdoc] annotations",
        ));
    }

    Ok(Some(Annotation { value, span }))
}

fn type_shape(ty: TokenStream) -> TypeShape {
    let Some((name, inner)) = wrapped(ty) else {
        return TypeShape::Plain;
    };
    match name.as_str() {
        "Option" => TypeShape::Option,
        "Vec" => match wrapped(inner) {
            Some((inner, _)) if inner == "Option" || inner == "Box" => TypeShape::VecIndirect,
            _ => TypeShape::Vec,
        },
        _ => TypeShape::Plain,
    }
}

/// For `path::Name<inner>`, returns the last path segment and the tokens of
/// `inner`.
fn wrapped(ty: TokenStream) -> Option<(String, TokenStream)> {
    let parsed = ty.to_token_iter().parse::<Wrapped>().ok()?;
    Some((parsed.name.to_string(), parsed.inner.to_token_stream()))
}

// `$ty:ty` and friends arrive wrapped in invisible groups when the derive is
// applied from inside a `macro_rules!`
fn flatten_transparent_groups(input: TokenStream) -> TokenStream {
    input
        .into_iter()
        .flat_map(|tt| match tt {
            TokenTree::Group(group) if group.delimiter() == Delimiter::None => {
                flatten_transparent_groups(group.stream())
            }
            TokenTree::Group(group) => {
                let mut flattened =
                    Group::new(group.delimiter(), flatten_transparent_groups(group.stream()));
                flattened.set_span(group.span());
                std::iter::once(TokenTree::Group(flattened)).collect()
            }
            other => std::iter::once(other).collect(),
        })
        .collect()
}

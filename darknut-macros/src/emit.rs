//! Generation of the `Unmarshal` impl.

use proc_macro2::{Literal, TokenStream};
use quote::{quote, quote_spanned};

use crate::parse::{Annotation, ParsedField, ParsedStruct, TypeShape};

pub fn emit(parsed: &ParsedStruct) -> TokenStream {
    let name = &parsed.name;
    let type_name = name.to_string();
    let type_name = type_name.strip_prefix("r#").unwrap_or(&type_name);

    let fields = parsed.fields.iter().filter_map(|field| {
        let annotation = field.annotation.as_ref()?;
        Some(emit_field(field, annotation))
    });

    quote! {
        #[automatically_derived]
        impl ::darknut::Unmarshal for #name {
            const SHAPE: &'static ::darknut::Shape<Self> = &::darknut::Shape {
                type_name: #type_name,
                fields: &[#(#fields),*],
            };
        }
    }
}

fn emit_field(field: &ParsedField, annotation: &Annotation) -> TokenStream {
    let ident = &field.ident;
    let name = &field.name;
    let mut tag = Literal::string(&annotation.value);
    tag.set_span(annotation.span);

    let kind = if annotation.is_group() {
        let (shape, assign) = match field.ty {
            TypeShape::Plain => (
                quote!(Required),
                quote!(|target, block| ::darknut::__private::assign_required(&mut target.#ident, block)),
            ),
            TypeShape::Option => (
                quote!(Optional),
                quote!(|target, block| ::darknut::__private::assign_optional(&mut target.#ident, block)),
            ),
            TypeShape::Vec => (
                quote!(Repeated),
                quote!(|target, block| ::darknut::__private::assign_repeated(&mut target.#ident, block)),
            ),
            TypeShape::VecIndirect => (
                quote!(RepeatedIndirect),
                quote!(::darknut::__private::assign_unsupported),
            ),
        };
        quote_spanned! {annotation.span=>
            ::darknut::FieldKind::Blocks(::darknut::BlockField {
                shape: ::darknut::FieldShape::#shape,
                assign: #assign,
            })
        }
    } else {
        let (shape, decode) = match field.ty {
            TypeShape::Option => (
                quote!(Optional),
                quote!(|target, value, tag| ::darknut::__private::decode_optional(&mut target.#ident, value, tag)),
            ),
            _ => (
                quote!(Required),
                quote!(|target, value, tag| ::darknut::__private::decode_required(&mut target.#ident, value, tag)),
            ),
        };
        quote_spanned! {annotation.span=>
            ::darknut::FieldKind::Scalar(::darknut::ScalarField {
                shape: ::darknut::FieldShape::#shape,
                decode: #decode,
            })
        }
    };

    quote! {
        ::darknut::FieldDef {
            name: #name,
            tag: #tag,
            kind: #kind,
        }
    }
}

//! The `#[darknut_testhelpers::test]` attribute.

use unsynn::*;

keyword! {
    KFn = "fn";
}

unsynn! {
    /// Attributes, visibility and qualifiers in front of `fn`.
    struct UntilFn {
        items: Any<Cons<Except<KFn>, TokenTree>>,
    }

    /// Generics, arguments, return type and where clause.
    struct UntilBody {
        items: Any<Cons<Except<BraceGroup>, TokenTree>>,
    }

    struct Body {
        items: BraceGroup,
    }

    struct TestFn {
        until_fn: UntilFn,
        _fn: KFn,
        name: Ident,
        until_body: UntilBody,
        body: Body,
        _end: EndOfStream,
    }
}

impl quote::ToTokens for UntilFn {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for UntilBody {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for Body {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(self.items.0.stream())
    }
}

/// Marks a test and installs the tracing subscriber before its body runs.
///
/// ```ignore
/// use darknut_testhelpers::test;
///
/// #[test]
/// fn decodes_planning_item() {
///     // DARKNUT_LOG applies here
/// }
/// ```
///
/// Another test attribute can be passed as argument, e.g.
/// `#[darknut_testhelpers::test(tokio::test)]`.
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    expand(attr.into(), item.into()).into()
}

fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut i = item.to_token_iter();
    let TestFn {
        until_fn,
        name,
        until_body,
        body,
        ..
    } = match i.parse::<TestFn>() {
        Ok(decl) => decl,
        Err(err) => {
            let message = format!("#[darknut_testhelpers::test] expects a function with a body: {err}");
            return quote::quote! { ::core::compile_error!(#message); };
        }
    };

    let test_attr = if attr.is_empty() {
        quote::quote! { #[::core::prelude::rust_2024::test] }
    } else {
        quote::quote! { #[#attr] }
    };

    quote::quote! {
        #test_attr
        #until_fn fn #name #until_body {
            ::darknut_testhelpers::setup();

            #body
        }
    }
}

//! The attribute macro re-exported as `jolyglot_testhelpers::test`.

use unsynn::*;

keyword! {
    KFn = "fn";
}

unsynn! {
    struct UntilFn {
        items: Any<Cons<Except<KFn>, TokenTree>>,
    }

    struct UntilBody {
        items: Any<Cons<Except<BraceGroup>, TokenTree>>,
    }

    struct Body {
        items: BraceGroup,
    }

    struct FunctionDecl {
        until_fn: UntilFn, _fn: KFn, name: Ident,
        until_body: UntilBody, body: Body
    }
}

impl quote::ToTokens for UntilFn {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for UntilBody {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for Body {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        tokens.extend(self.items.0.stream())
    }
}

/// Test attribute that installs the tracing subscriber before running the
/// test body.
///
/// ```ignore
/// use jolyglot_testhelpers::test;
///
/// #[test]
/// fn decodes_mock() {
///     // adapter events are printed if the test fails
/// }
/// ```
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    if !attr.is_empty() {
        return quote::quote! {
            compile_error!("#[jolyglot_testhelpers::test] takes no arguments");
        }
        .into();
    }

    let item = TokenStream::from(item);
    let mut i = item.to_token_iter();
    let fdecl = match i.parse::<FunctionDecl>() {
        Ok(fdecl) => fdecl,
        Err(err) => {
            let msg = format!("#[jolyglot_testhelpers::test] expects a function: {err:?}");
            return quote::quote! { compile_error!(#msg); }.into();
        }
    };

    let FunctionDecl {
        until_fn,
        _fn,
        name,
        until_body,
        body,
    } = fdecl;

    quote::quote! {
        #[::core::prelude::rust_2024::test]
        #until_fn fn #name #until_body {
            ::jolyglot_testhelpers::setup();

            #body
        }
    }
    .into()
}

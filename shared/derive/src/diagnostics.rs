use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote_spanned};

use replica_weaver::{WeaveError, WeaveWarning};

use crate::input::SpanTable;

/// One `compile_error!` per weave error, each pointing at its declaration
pub fn weave_errors(errors: &[WeaveError], spans: &SpanTable) -> TokenStream {
    errors
        .iter()
        .map(|error| syn::Error::new(error_span(error, spans), error.to_string()).to_compile_error())
        .collect()
}

fn error_span(error: &WeaveError, spans: &SpanTable) -> Span {
    match error {
        WeaveError::HookNotFound {
            type_name, field, ..
        }
        | WeaveError::HookSignatureMismatch {
            type_name, field, ..
        } => spans.hook_span(type_name, field),
        _ => match error.field() {
            Some(field) => spans.member_span(error.type_name(), field),
            None => spans.type_span(error.type_name()),
        },
    }
}

/// Stable Rust has no warning API for proc-macros, so each warning is
/// surfaced as the use of a deprecated item carrying the message
pub fn weave_warnings(warnings: &[WeaveWarning], spans: &SpanTable) -> TokenStream {
    warnings
        .iter()
        .enumerate()
        .map(|(index, warning)| {
            let span = spans.member_span(warning.type_name(), warning.field());
            let message = warning.to_string();
            let item = format_ident!("replica_warning_{}", index, span = span);
            quote_spanned! {span=>
                const _: () = {
                    #[deprecated(note = #message)]
                    #[allow(non_upper_case_globals)]
                    const #item: () = ();
                    #item
                };
            }
        })
        .collect()
}

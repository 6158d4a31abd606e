use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::Ident;

/// Path generated code uses to reach the runtime crate
pub fn shared_crate() -> TokenStream {
    quote! { ::replica_shared }
}

/// Hidden member holding an object's `DirtyBits`
pub fn dirty_bits_ident() -> Ident {
    Ident::new("__replica_dirty_bits", Span::call_site())
}

/// Hidden method applying a remote value to one field
pub fn remote_setter_ident(field: &str) -> Ident {
    format_ident!("__replica_remote_{}", field)
}

pub fn ident(name: &str) -> Ident {
    Ident::new(name, Span::call_site())
}

/// Local holding a decoded member until the whole input has been read
pub fn value_local_ident(field: &str) -> Ident {
    format_ident!("__replica_value_{}", field)
}

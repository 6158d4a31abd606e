//! # Replica Derive
//! The `replicate!` macro. Items inside the block are lowered into
//! `replica_weaver` metadata, validated, and rewritten so every replicated
//! field is stored in a `ReplicatedField` wired to the object's `DirtyBits`.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod diagnostics;
mod expand;
mod input;
mod plan;
mod rewrite;
mod shared;

use input::ReplicateInput;

/// Rewrites a block of structs and their impls for replication.
///
/// ```ignore
/// replicate! {
///     #[replicate(sync_interval = 0.0)]
///     pub struct Monster {
///         #[replicated(hook = "on_health_changed", init = 100)]
///         pub health: i32,
///         pub inventory: ReplicatedList<u32>,
///     }
///
///     impl Monster {
///         pub fn new() -> Self {
///             Self { inventory: ReplicatedList::new() }
///         }
///
///         pub fn damage(&mut self, amount: i32) {
///             self.health -= amount;
///         }
///
///         fn on_health_changed(&mut self, old_value: &i32, new_value: &i32) {}
///     }
/// }
/// ```
///
/// Inside the block, `self.health` reads become `self.network_health()`,
/// assignments go through `set_network_health`, and `Self { .. }` literals
/// create the dirty tracker and bind every replicated member to it.
#[proc_macro]
pub fn replicate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as ReplicateInput);
    expand::expand(input).into()
}

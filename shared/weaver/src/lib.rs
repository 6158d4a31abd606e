//! # Replica Weaver
//! The field replication transform, expressed as a pure function over type
//! metadata. `replica-derive` lowers Rust items into [`TypeDecl`]s, calls
//! [`Weaver::weave`], and emits code from the returned [`Woven`] plan. Nothing
//! in here touches a compiler, so every validation rule is unit-testable.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod decl;
mod diagnostics;
mod hook;
mod weaver;
mod woven;

pub use decl::{FieldDecl, MethodDecl, Receiver, ReplicatedMarker, TypeDecl, TypeRef, TypeShape};
pub use diagnostics::{WeaveError, WeaveFailure, WeaveWarning};
pub use hook::{hook_signature_message, HookKind, ResolvedHook};
pub use weaver::{Weaver, MASK_WIDTH};
pub use woven::{AccessLists, FieldPath, Woven, WovenCollection, WovenField, WovenMember, WovenType};

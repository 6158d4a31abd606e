//! # Replica Shared
//! Replicated fields, per-object dirty-bit tracking, replicated collections
//! and the snapshot delta codec.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use replica_derive::replicate;
pub use replica_serde::{
    ByteCounter, ByteReader, ByteWrite, ByteWriter, Serde, SerdeErr, UnsignedVariableInteger,
};

mod collections;
mod config;
mod delta;
mod dirty;
mod field;
mod replicate;

pub use collections::{CollectionError, ReplicatedCollection, ReplicatedList, ReplicatedMap};
pub use config::{DeltaConfig, SyncConfig, ANCHOR_WIDTH};
pub use delta::{
    apply_patch, compute_delta, BaselineDecoder, BaselineEncoder, Delta, DeltaCodec, DeltaError,
    Snapshot, SyncPayload,
};
pub use dirty::{
    bit_index::BitIndex, dirty_bits::DirtyBits, error::DirtyBitsError, layout::ReplicaLayout,
    MASK_WIDTH,
};
pub use field::{hook::Hook, replicated_field::ReplicatedField, OnDirty};
pub use replicate::{DirtyHeader, Remainder, Replicate};

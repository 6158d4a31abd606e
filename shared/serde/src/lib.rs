//! # Replica Serde
//! Byte-level serialization buffer shared by every replica crate.
//! Snapshots are produced with a [`ByteWriter`] and consumed with a [`ByteReader`].

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod byte_reader;
mod byte_writer;
mod error;
mod impls;
mod integer;
mod serde;

pub use byte_reader::ByteReader;
pub use byte_writer::{ByteCounter, ByteWrite, ByteWriter};
pub use error::SerdeErr;
pub use integer::{zigzag_decode, zigzag_encode, UnsignedVariableInteger, MAX_VARINT_BYTES};
pub use serde::Serde;

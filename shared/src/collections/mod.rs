mod error;
mod replicated_list;
mod replicated_map;

pub use error::CollectionError;
pub use replicated_list::ReplicatedList;
pub use replicated_map::ReplicatedMap;

use replica_serde::Serde;

use crate::field::OnDirty;

/// A container that reports its own mutations to one collection bit
pub trait ReplicatedCollection: Serde {
    fn set_on_dirty(&mut self, on_dirty: Option<OnDirty>);

    fn has_on_dirty(&self) -> bool;

    /// Takes over the contents of `incoming` without notifying, keeping
    /// this collection's dirty binding
    fn replace_remote(&mut self, incoming: Self);
}

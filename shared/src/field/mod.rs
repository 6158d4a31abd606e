pub mod hook;
pub mod replicated_field;

/// Change notification, typically bound to one bit of a `DirtyBits`
pub type OnDirty = Box<dyn FnMut() + Send>;

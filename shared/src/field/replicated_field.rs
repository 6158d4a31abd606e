use std::ops::Deref;

use replica_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use super::{hook::Hook, OnDirty};

/// A value holder whose every mutation is observable.
///
/// `set` stores the new value, then calls `on_dirty`, then the hook with
/// `(old, new)`. Either callback may be absent. Reads go through `get` or
/// `Deref`; there is no `DerefMut`, so a change can't bypass notification.
///
/// Cloning produces a detached field: the value is cloned, while the hook
/// and dirty binding are reset, since they belong to the original owner.
pub struct ReplicatedField<T, O = ()> {
    value: T,
    hook: Hook<T, O>,
    on_dirty: Option<OnDirty>,
}

impl<T, O> ReplicatedField<T, O> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            hook: Hook::None,
            on_dirty: None,
        }
    }

    pub fn with_hook(value: T, hook: Hook<T, O>) -> Self {
        Self {
            value,
            hook,
            on_dirty: None,
        }
    }

    /// Binds the change notification at construction
    pub fn on_dirty<F: FnMut() + Send + 'static>(mut self, on_dirty: F) -> Self {
        self.on_dirty = Some(Box::new(on_dirty));
        self
    }

    pub fn set_on_dirty(&mut self, on_dirty: Option<OnDirty>) {
        self.on_dirty = on_dirty;
    }

    pub fn has_on_dirty(&self) -> bool {
        self.on_dirty.is_some()
    }

    pub fn hook(&self) -> &Hook<T, O> {
        &self.hook
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Stores `value` and returns the previous one
    pub fn set(&mut self, value: T) -> T {
        let old_value = std::mem::replace(&mut self.value, value);
        if let Some(on_dirty) = &mut self.on_dirty {
            on_dirty();
        }
        self.hook.call_detached(&old_value, &self.value);
        old_value
    }

    /// Stores a value received from the remote authority. Hooks fire,
    /// but nothing is marked dirty: this state is already in sync.
    pub fn set_remote(&mut self, value: T) -> T {
        let old_value = std::mem::replace(&mut self.value, value);
        self.hook.call_detached(&old_value, &self.value);
        old_value
    }

    /// The hook to dispatch with the owner as receiver after `set`
    pub fn instance_hook(&self) -> Option<fn(&mut O, &T, &T)> {
        self.hook.instance()
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

// Read-only coercion only, see type docs
impl<T, O> Deref for ReplicatedField<T, O> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T: Clone, O> Clone for ReplicatedField<T, O> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T: PartialEq, O> PartialEq for ReplicatedField<T, O> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Default, O> Default for ReplicatedField<T, O> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug, O> std::fmt::Debug for ReplicatedField<T, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicatedField")
            .field("value", &self.value)
            .field("hook", &self.hook)
            .field("on_dirty", &self.on_dirty.is_some())
            .finish()
    }
}

impl<T: Serde, O> Serde for ReplicatedField<T, O> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.value.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self::new(T::de(reader)?))
    }

    fn byte_length(&self) -> u32 {
        self.value.byte_length()
    }
}

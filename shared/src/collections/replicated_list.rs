use std::ops::Index;

use replica_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::field::OnDirty;

use super::{error::CollectionError, ReplicatedCollection};

/// An ordered list that notifies on every successful mutation.
/// Rejected mutations leave the list and its dirty state untouched.
pub struct ReplicatedList<T> {
    items: Vec<T>,
    on_dirty: Option<OnDirty>,
}

impl<T> ReplicatedList<T> {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items,
            on_dirty: None,
        }
    }

    pub fn on_dirty<F: FnMut() + Send + 'static>(mut self, on_dirty: F) -> Self {
        self.on_dirty = Some(Box::new(on_dirty));
        self
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
        self.notify();
    }

    pub fn pop(&mut self) -> Option<T> {
        let value = self.items.pop()?;
        self.notify();
        Some(value)
    }

    pub fn insert(&mut self, index: usize, value: T) -> Result<(), CollectionError> {
        if index > self.items.len() {
            return Err(self.out_of_bounds(index));
        }
        self.items.insert(index, value);
        self.notify();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<T, CollectionError> {
        if index >= self.items.len() {
            return Err(self.out_of_bounds(index));
        }
        let value = self.items.remove(index);
        self.notify();
        Ok(value)
    }

    /// Replaces the item at `index`, returning the previous one
    pub fn set(&mut self, index: usize, value: T) -> Result<T, CollectionError> {
        let Some(slot) = self.items.get_mut(index) else {
            return Err(self.out_of_bounds(index));
        };
        let old_value = std::mem::replace(slot, value);
        self.notify();
        Ok(old_value)
    }

    /// Clearing an empty list does not notify
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.notify();
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    fn notify(&mut self) {
        if let Some(on_dirty) = &mut self.on_dirty {
            on_dirty();
        }
    }

    fn out_of_bounds(&self, index: usize) -> CollectionError {
        CollectionError::IndexOutOfBounds {
            index,
            len: self.items.len(),
        }
    }
}

impl<T: Serde> ReplicatedCollection for ReplicatedList<T> {
    fn set_on_dirty(&mut self, on_dirty: Option<OnDirty>) {
        self.on_dirty = on_dirty;
    }

    fn has_on_dirty(&self) -> bool {
        self.on_dirty.is_some()
    }

    fn replace_remote(&mut self, incoming: Self) {
        self.items = incoming.items;
    }
}

impl<T> Default for ReplicatedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for ReplicatedList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T> Index<usize> for ReplicatedList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a ReplicatedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Clone> Clone for ReplicatedList<T> {
    fn clone(&self) -> Self {
        Self::from_vec(self.items.clone())
    }
}

impl<T: PartialEq> PartialEq for ReplicatedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ReplicatedList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T: Serde> Serde for ReplicatedList<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.items.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self::from_vec(Vec::<T>::de(reader)?))
    }

    fn byte_length(&self) -> u32 {
        self.items.byte_length()
    }
}

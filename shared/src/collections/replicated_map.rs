use std::collections::{btree_map, BTreeMap};

use replica_serde::{ByteReader, ByteWrite, Serde, SerdeErr, UnsignedVariableInteger};

use crate::field::OnDirty;

use super::ReplicatedCollection;

/// A key-ordered map that notifies on every mutation that changes it.
/// Ordering keeps serialization deterministic.
pub struct ReplicatedMap<K, V> {
    entries: BTreeMap<K, V>,
    on_dirty: Option<OnDirty>,
}

impl<K: Ord, V> ReplicatedMap<K, V> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            on_dirty: None,
        }
    }

    pub fn on_dirty<F: FnMut() + Send + 'static>(mut self, on_dirty: F) -> Self {
        self.on_dirty = Some(Box::new(on_dirty));
        self
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let old_value = self.entries.insert(key, value);
        self.notify();
        old_value
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let old_value = self.entries.remove(key)?;
        self.notify();
        Some(old_value)
    }

    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.entries.clear();
        self.notify();
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, K, V> {
        self.entries.keys()
    }

    fn notify(&mut self) {
        if let Some(on_dirty) = &mut self.on_dirty {
            on_dirty();
        }
    }
}

impl<K: Ord + Serde, V: Serde> ReplicatedCollection for ReplicatedMap<K, V> {
    fn set_on_dirty(&mut self, on_dirty: Option<OnDirty>) {
        self.on_dirty = on_dirty;
    }

    fn has_on_dirty(&self) -> bool {
        self.on_dirty.is_some()
    }

    fn replace_remote(&mut self, incoming: Self) {
        self.entries = incoming.entries;
    }
}

impl<K: Ord, V> Default for ReplicatedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for ReplicatedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            on_dirty: None,
        }
    }
}

impl<K: Clone, V: Clone> Clone for ReplicatedMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            on_dirty: None,
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for ReplicatedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for ReplicatedMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Ord + Serde, V: Serde> Serde for ReplicatedMap<K, V> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        UnsignedVariableInteger::write_usize(self.entries.len(), writer);
        for (key, value) in &self.entries {
            key.ser(writer);
            value.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let length = UnsignedVariableInteger::read_usize(reader)?;
        let mut entries = BTreeMap::new();
        for _ in 0..length {
            let key = K::de(reader)?;
            let value = V::de(reader)?;
            entries.insert(key, value);
        }
        Ok(Self {
            entries,
            on_dirty: None,
        })
    }

    fn byte_length(&self) -> u32 {
        let prefix = UnsignedVariableInteger::new(self.entries.len() as u64).byte_length();
        self.entries
            .iter()
            .map(|(key, value)| key.byte_length() + value.byte_length())
            .sum::<u32>()
            + prefix
    }
}

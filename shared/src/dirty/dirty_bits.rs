use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};

use log::{debug, trace};

use crate::config::SyncConfig;

use super::{bit_index::BitIndex, layout::ReplicaLayout};

// Shared with field notifiers so they can mark bits without borrowing the owner
#[derive(Debug, Default)]
struct DirtyMask {
    scalar: AtomicU64,
    collection: AtomicU64,
}

impl DirtyMask {
    fn with_bits(scalar: u64, collection: u64) -> Self {
        Self {
            scalar: AtomicU64::new(scalar),
            collection: AtomicU64::new(collection),
        }
    }
}

/// Per-object record of which replicated members changed since the last sync.
///
/// Bits are set with an atomic OR, so concurrent notifiers can never corrupt
/// the mask, but the order between a subscriber-triggered clear and a field
/// mutation on the same object is the caller's to enforce: the last writer
/// wins.
#[derive(Debug)]
pub struct DirtyBits {
    mask: Arc<DirtyMask>,
    layout: Option<&'static ReplicaLayout>,
    last_sync: Instant,
    sync_interval: f32,
    subscribers: usize,
}

impl DirtyBits {
    /// `sync_interval` is in seconds; 0 disables the time gate
    pub fn new(sync_interval: f32) -> Self {
        Self {
            mask: Arc::new(DirtyMask::default()),
            layout: None,
            last_sync: Instant::now(),
            sync_interval: sanitize_interval(sync_interval),
            subscribers: 0,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.sync_interval)
    }

    pub fn with_layout(mut self, layout: &'static ReplicaLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn layout(&self) -> Option<&'static ReplicaLayout> {
        self.layout
    }

    // Bits

    pub fn set_scalar_bit(&self, index: BitIndex) {
        trace!("DirtyBits: scalar bit {} set", index.get());
        self.mask.scalar.fetch_or(index.mask(), Ordering::AcqRel);
    }

    pub fn set_collection_bit(&self, index: BitIndex) {
        trace!("DirtyBits: collection bit {} set", index.get());
        self.mask.collection.fetch_or(index.mask(), Ordering::AcqRel);
    }

    pub fn scalar_bits(&self) -> u64 {
        self.mask.scalar.load(Ordering::Acquire)
    }

    pub fn collection_bits(&self) -> u64 {
        self.mask.collection.load(Ordering::Acquire)
    }

    pub fn has_bits(&self) -> bool {
        self.scalar_bits() != 0 || self.collection_bits() != 0
    }

    /// Something changed and the sync interval has elapsed. Never clears.
    pub fn is_dirty(&self) -> bool {
        self.is_dirty_at(Instant::now())
    }

    pub fn is_dirty_at(&self, now: Instant) -> bool {
        self.has_bits() && self.interval_elapsed(now)
    }

    fn interval_elapsed(&self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_sync).as_secs_f32();
        elapsed >= self.sync_interval
    }

    /// Call after a successful sync: clears both masks and restarts the interval
    pub fn clear_all(&mut self) {
        self.clear_all_at(Instant::now());
    }

    pub fn clear_all_at(&mut self, now: Instant) {
        self.mask.scalar.store(0, Ordering::Release);
        self.mask.collection.store(0, Ordering::Release);
        self.last_sync = now;
    }

    pub fn last_sync(&self) -> Instant {
        self.last_sync
    }

    pub fn sync_interval(&self) -> f32 {
        self.sync_interval
    }

    pub fn set_sync_interval(&mut self, sync_interval: f32) {
        self.sync_interval = sanitize_interval(sync_interval);
    }

    // Subscribers

    /// Returns true if this was the first subscriber. A first subscriber
    /// receives the full state on spawn, so earlier changes are dropped
    /// instead of being resent as a redundant update.
    pub fn add_subscriber(&mut self) -> bool {
        self.subscribers += 1;
        if self.subscribers != 1 {
            return false;
        }
        if self.has_bits() {
            debug!(
                "DirtyBits: first subscriber for {}, discarding scalar bits {:#b} and collection bits {:#b}",
                self.type_name(),
                self.scalar_bits(),
                self.collection_bits()
            );
        }
        self.clear_all();
        true
    }

    /// Returns true if that was the last subscriber
    pub fn remove_subscriber(&mut self) -> bool {
        if self.subscribers == 0 {
            return false;
        }
        self.subscribers -= 1;
        self.subscribers == 0
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
    }

    pub fn has_subscribers(&self) -> bool {
        self.subscribers > 0
    }

    // Notifiers

    /// A callback that sets `index` in the scalar mask, for `ReplicatedField::on_dirty`
    pub fn scalar_notifier(&self, index: BitIndex) -> impl FnMut() + Send + 'static {
        let mask = self.mask.clone();
        move || {
            mask.scalar.fetch_or(index.mask(), Ordering::AcqRel);
        }
    }

    /// A callback that sets `index` in the collection mask
    pub fn collection_notifier(&self, index: BitIndex) -> impl FnMut() + Send + 'static {
        let mask = self.mask.clone();
        move || {
            mask.collection.fetch_or(index.mask(), Ordering::AcqRel);
        }
    }

    // Diagnostics

    pub fn dirty_scalar_names(&self) -> Vec<&'static str> {
        self.layout
            .map(|layout| layout.scalar_names(self.scalar_bits()))
            .unwrap_or_default()
    }

    pub fn dirty_collection_names(&self) -> Vec<&'static str> {
        self.layout
            .map(|layout| layout.collection_names(self.collection_bits()))
            .unwrap_or_default()
    }

    fn type_name(&self) -> &'static str {
        self.layout.map(ReplicaLayout::type_name).unwrap_or("<unknown>")
    }
}

impl Default for DirtyBits {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

// A clone starts from the same bits but no longer shares them with notifiers
impl Clone for DirtyBits {
    fn clone(&self) -> Self {
        Self {
            mask: Arc::new(DirtyMask::with_bits(
                self.scalar_bits(),
                self.collection_bits(),
            )),
            layout: self.layout,
            last_sync: self.last_sync,
            sync_interval: self.sync_interval,
            subscribers: self.subscribers,
        }
    }
}

fn sanitize_interval(sync_interval: f32) -> f32 {
    if sync_interval.is_nan() || sync_interval < 0.0 {
        0.0
    } else {
        sync_interval
    }
}

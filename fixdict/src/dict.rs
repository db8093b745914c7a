use std::hash::BuildHasher;

use crate::error::{DictError, Result};
use crate::hash::{hash_bytes, FnvBuildHasher};
use crate::iter::Iter;
use crate::slot::{Slot, Status};

/// Slots allocated by a fresh dictionary; capacity is never zero.
const MIN_CAPACITY: usize = 64;
/// Occupancy ratio at which the table grows.
const RESIZE_THRESHOLD: f64 = 0.8;
/// Below this many live entries the table grows 4x per resize, above it 2x,
/// mirroring the fast/slow growth phases of common dynamic maps.
const FAST_GROWTH_CEILING: usize = 50_000;
const FAST_GROWTH_RATE: usize = 4;
const SLOW_GROWTH_RATE: usize = 2;

/// Collision handling for [`FixedDict::put`] and [`FixedDict::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutMode {
    /// Rewrite the value in place when the key already exists.
    Overwrite,
    /// Leave an existing key untouched; only fresh keys are written.
    Ignore,
}

/// Outcome of a probe walk: the slot holding the key, the slot a fresh
/// record should go into, or a walk that ran out of steps without finding
/// either (the probe step function can cycle, so this is resolved by
/// growing and retrying).
enum FindSlot {
    Found(usize),
    Vacant(usize),
    Exhausted,
}

/// Open-addressing hash dictionary over fixed-width byte records.
///
/// Key and value widths are fixed at construction; every record is
/// `key_size + value_size` contiguous bytes in a single owned arena, with a
/// one-byte status tag per slot carrying empty/full/tombstone state.
/// Collisions resolve by double hashing: the next probe index is the hash
/// of the previous one, so the sequence is pseudo-random but reproducible
/// for a given capacity.
#[derive(Debug)]
pub struct FixedDict<S = FnvBuildHasher> {
    tags: Vec<Slot>,
    records: Vec<u8>,
    capacity: usize,
    occupied: usize,
    key_size: usize,
    value_size: usize,
    /// Probe steps accumulated by inserts since the last resize;
    /// saturation forces a resize regardless of load factor.
    collisions: u8,
    hasher: S,
}

impl FixedDict {
    /// Creates a dictionary for `key_size`-byte keys and `value_size`-byte
    /// values, hashed with FNV-1a. Fails if either width is zero.
    pub fn new(key_size: usize, value_size: usize) -> Result<Self> {
        Self::with_hasher(key_size, value_size, FnvBuildHasher)
    }

    /// Like [`FixedDict::new`] with at least `capacity` slots up front.
    pub fn with_capacity(key_size: usize, value_size: usize, capacity: usize) -> Result<Self> {
        let mut dict = Self::new(key_size, value_size)?;
        if capacity > dict.capacity {
            let record_size = dict.record_size();
            let (tags, records) = alloc_table(capacity, record_size)?;
            dict.tags = tags;
            dict.records = records;
            dict.capacity = capacity;
        }
        Ok(dict)
    }

    /// Builds a dictionary from pre-assembled key/value pairs, overwriting
    /// earlier pairs with later ones on duplicate keys.
    pub fn from_pairs(key_size: usize, value_size: usize, pairs: &[(&[u8], &[u8])]) -> Result<Self> {
        let mut dict = Self::new(key_size, value_size)?;
        for (key, value) in pairs {
            dict.put(key, value, PutMode::Overwrite)?;
        }
        Ok(dict)
    }
}

impl<S: BuildHasher> FixedDict<S> {
    /// Creates a dictionary with a caller-supplied hasher. The hasher must
    /// be deterministic for the dictionary's lifetime: both bucket
    /// placement and the probe sequence are derived from it.
    pub fn with_hasher(key_size: usize, value_size: usize, hasher: S) -> Result<Self> {
        if key_size == 0 || value_size == 0 {
            return Err(DictError::ZeroWidth {
                key: key_size,
                value: value_size,
            });
        }
        let (tags, records) = alloc_table(MIN_CAPACITY, key_size + value_size)?;
        Ok(Self {
            tags,
            records,
            capacity: MIN_CAPACITY,
            occupied: 0,
            key_size,
            value_size,
            collisions: 0,
            hasher,
        })
    }

    /// Number of live key/value pairs.
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Number of slots in the backing arena.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn key_size(&self) -> usize {
        self.key_size
    }

    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// Ratio of live slots to capacity.
    pub fn load_factor(&self) -> f64 {
        self.occupied as f64 / self.capacity as f64
    }

    /// Inserts or updates a record. Both slices must match the widths fixed
    /// at construction. Returns whether the record was written: `Ok(false)`
    /// only when `mode` is [`PutMode::Ignore`] and the key already exists.
    ///
    /// Fails on width mismatch, or on allocation exhaustion during a forced
    /// resize; in the latter case the table is left unchanged and the
    /// insert is not applied.
    pub fn put(&mut self, key: &[u8], value: &[u8], mode: PutMode) -> Result<bool> {
        self.check_width("key", key.len(), self.key_size)?;
        self.check_width("value", value.len(), self.value_size)?;
        if self.should_grow() {
            self.grow()?;
        }
        loop {
            let (found, steps) = self.find_slot(key);
            self.note_collisions(steps);
            match found {
                FindSlot::Found(idx) => {
                    return Ok(match mode {
                        PutMode::Overwrite => {
                            self.write_record(idx, key, value);
                            true
                        }
                        PutMode::Ignore => false,
                    });
                }
                FindSlot::Vacant(idx) => {
                    self.write_record(idx, key, value);
                    self.tags[idx].mark_full();
                    self.occupied += 1;
                    return Ok(true);
                }
                // No reachable slot on this key's probe path; growing
                // reshapes the probe graph.
                FindSlot::Exhausted => self.grow()?,
            }
        }
    }

    /// Looks up a key, returning the value bytes of the matching record.
    /// Absence is signalled by `None`, never by the value bytes themselves,
    /// so a zero-filled value is distinguishable from a missing key.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        if key.len() != self.key_size {
            return None;
        }
        match self.find_slot(key).0 {
            FindSlot::Found(idx) => Some(self.value_at(idx)),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Removes a key, returning whether it was present.
    ///
    /// The slot becomes a tombstone rather than reverting to empty: other
    /// keys may have probed through it, and vacating it would cut their
    /// chains. Lookups probe through tombstones, inserts may reuse them,
    /// and the next resize compacts them away.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        if key.len() != self.key_size {
            return false;
        }
        match self.find_slot(key).0 {
            FindSlot::Found(idx) => {
                self.tags[idx].mark_deleted();
                let range = self.record_range(idx);
                self.records[range].fill(0);
                self.occupied -= 1;
                true
            }
            _ => false,
        }
    }

    /// Puts every live entry of `src` into `self` under `mode`, returning
    /// the resulting occupancy of `self`. Record layouts must match.
    pub fn merge<S2: BuildHasher>(&mut self, src: &FixedDict<S2>, mode: PutMode) -> Result<usize> {
        if src.key_size != self.key_size || src.value_size != self.value_size {
            return Err(DictError::LayoutMismatch);
        }
        for (key, value) in src.iter() {
            self.put(key, value, mode)?;
        }
        Ok(self.occupied)
    }

    /// Iterates over live `(key, value)` slices in slot order.
    pub fn iter(&self) -> Iter<'_, S> {
        Iter::new(self)
    }

    fn check_width(&self, what: &'static str, got: usize, expected: usize) -> Result<()> {
        if got != expected {
            return Err(DictError::WidthMismatch {
                what,
                expected,
                got,
            });
        }
        Ok(())
    }

    fn record_size(&self) -> usize {
        self.key_size + self.value_size
    }

    fn record_range(&self, idx: usize) -> std::ops::Range<usize> {
        let start = idx * self.record_size();
        start..start + self.record_size()
    }

    pub(crate) fn is_live(&self, idx: usize) -> bool {
        self.tags[idx].is_full()
    }

    pub(crate) fn key_at(&self, idx: usize) -> &[u8] {
        let start = idx * self.record_size();
        &self.records[start..start + self.key_size]
    }

    pub(crate) fn value_at(&self, idx: usize) -> &[u8] {
        let start = idx * self.record_size() + self.key_size;
        &self.records[start..start + self.value_size]
    }

    fn write_record(&mut self, idx: usize, key: &[u8], value: &[u8]) {
        let start = idx * self.record_size();
        self.records[start..start + self.key_size].copy_from_slice(key);
        let value_start = start + self.key_size;
        self.records[value_start..value_start + self.value_size].copy_from_slice(value);
    }

    fn home_bucket(&self, key: &[u8]) -> usize {
        (hash_bytes(&self.hasher, key) % self.capacity as u64) as usize
    }

    fn probe_step(&self, idx: usize, capacity: usize) -> usize {
        let digest = hash_bytes(&self.hasher, &(idx as u64).to_le_bytes());
        (digest % capacity as u64) as usize
    }

    /// Walks the probe sequence for `key`, bounded by `capacity` steps.
    ///
    /// Stops at the slot holding the key, or at the first empty slot (a
    /// fresh insert goes to the first tombstone passed on the way, if any,
    /// since no live key can lie beyond the empty slot on this path). Also
    /// reports the number of occupied, non-matching slots stepped over.
    fn find_slot(&self, key: &[u8]) -> (FindSlot, usize) {
        let mut idx = self.home_bucket(key);
        let mut reuse = None;
        let mut steps = 0;
        for _ in 0..self.capacity {
            match self.tags[idx].state() {
                Status::Empty => return (FindSlot::Vacant(reuse.unwrap_or(idx)), steps),
                Status::Full => {
                    if self.key_at(idx) == key {
                        return (FindSlot::Found(idx), steps);
                    }
                    steps += 1;
                }
                Status::Deleted => {
                    if reuse.is_none() {
                        reuse = Some(idx);
                    }
                    steps += 1;
                }
                Status::Reserved => {}
            }
            idx = self.probe_step(idx, self.capacity);
        }
        // The walk may have cycled without touching an empty slot. A
        // tombstone seen along the way is not safe to reuse here: the key
        // could live on an unvisited part of the path.
        (FindSlot::Exhausted, steps)
    }

    fn note_collisions(&mut self, steps: usize) {
        let steps = u8::try_from(steps).unwrap_or(u8::MAX);
        self.collisions = self.collisions.saturating_add(steps);
    }

    fn should_grow(&self) -> bool {
        self.load_factor() >= RESIZE_THRESHOLD || self.collisions == u8::MAX
    }

    /// Reallocates the arena at the next capacity and rehashes every live
    /// record; every hash-derived index is capacity-dependent, so a plain
    /// buffer copy would scatter the table. Tombstones are dropped and the
    /// collision counter resets. On allocation failure the table keeps its
    /// pre-resize state.
    fn grow(&mut self) -> Result<()> {
        let mut new_capacity = self
            .capacity
            .checked_mul(growth_rate(self.occupied))
            .ok_or(DictError::CapacityExhausted)?;
        loop {
            if let Some((tags, records)) = self.try_migrate(new_capacity)? {
                self.tags = tags;
                self.records = records;
                self.capacity = new_capacity;
                self.collisions = 0;
                return Ok(());
            }
            // Some record's probe path had no reachable empty slot at this
            // capacity; a larger table reshapes every path.
            new_capacity = new_capacity
                .checked_mul(SLOW_GROWTH_RATE)
                .ok_or(DictError::CapacityExhausted)?;
        }
    }

    /// Rehashes all live records into fresh buffers of `new_capacity`
    /// slots. Returns `Ok(None)` when a record could not be placed within
    /// the bounded probe walk, leaving `self` untouched.
    fn try_migrate(&self, new_capacity: usize) -> Result<Option<(Vec<Slot>, Vec<u8>)>> {
        let record_size = self.record_size();
        let (mut tags, mut records) = alloc_table(new_capacity, record_size)?;
        for idx in 0..self.capacity {
            if !self.tags[idx].is_full() {
                continue;
            }
            let mut pos = (hash_bytes(&self.hasher, self.key_at(idx)) % new_capacity as u64) as usize;
            let mut placed = false;
            for _ in 0..new_capacity {
                if tags[pos].state() == Status::Empty {
                    let src = idx * record_size;
                    let dst = pos * record_size;
                    records[dst..dst + record_size]
                        .copy_from_slice(&self.records[src..src + record_size]);
                    tags[pos].mark_full();
                    placed = true;
                    break;
                }
                pos = self.probe_step(pos, new_capacity);
            }
            if !placed {
                return Ok(None);
            }
        }
        Ok(Some((tags, records)))
    }
}

/// Growth factor for the next resize: 4x during the fast-growth phase, 2x
/// once the table is large.
fn growth_rate(occupied: usize) -> usize {
    if occupied < FAST_GROWTH_CEILING {
        FAST_GROWTH_RATE
    } else {
        SLOW_GROWTH_RATE
    }
}

/// Fallibly allocates zeroed slot tags and a zeroed record arena. Going
/// through `try_reserve_exact` keeps a failed resize from aborting the
/// process, so the caller can surface it and keep the old table.
fn alloc_table(capacity: usize, record_size: usize) -> Result<(Vec<Slot>, Vec<u8>)> {
    let mut tags = Vec::new();
    tags.try_reserve_exact(capacity)
        .map_err(|_| DictError::CapacityExhausted)?;
    tags.resize(capacity, Slot::empty());

    let bytes = capacity
        .checked_mul(record_size)
        .ok_or(DictError::CapacityExhausted)?;
    let mut records = Vec::new();
    records
        .try_reserve_exact(bytes)
        .map_err(|_| DictError::CapacityExhausted)?;
    records.resize(bytes, 0);

    Ok((tags, records))
}

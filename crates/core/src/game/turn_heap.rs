//! Max-heap of entities waiting to act in the current scheduler pass.
//! This module exists to keep readiness ordering and insertion-order tie-breaking in one place.
//! It does not own energy accrual or membership in the live set.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Distance-to-player standing used only to break energy ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Proximity {
    /// The player itself, and anything that is not an actor.
    Exempt,
    /// An actor the player distance field has not reached.
    Unknown,
    Known(u32),
}

/// Ordering key captured when an entity enters the heap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TurnKey {
    pub energy: i32,
    pub proximity: Proximity,
}

impl TurnKey {
    /// `Greater` when `self` should act before `other`. `Equal` defers to
    /// insertion order.
    pub fn readiness(&self, other: &TurnKey) -> Ordering {
        self.energy.cmp(&other.energy).then_with(|| match (self.proximity, other.proximity) {
            (Proximity::Known(mine), Proximity::Known(theirs)) => theirs.cmp(&mine),
            _ => Ordering::Equal,
        })
    }
}

#[derive(Clone, Debug)]
struct HeapEntry<T> {
    item: T,
    key: TurnKey,
    order: u64,
}

impl<T> HeapEntry<T> {
    fn outranks(&self, other: &HeapEntry<T>) -> bool {
        match self.key.readiness(&other.key) {
            Ordering::Equal => self.order < other.order,
            ordering => ordering == Ordering::Greater,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TurnHeap<T> {
    entries: Vec<HeapEntry<T>>,
    next_order: u64,
}

impl<T> Default for TurnHeap<T> {
    fn default() -> Self {
        Self { entries: Vec::new(), next_order: 0 }
    }
}

impl<T> TurnHeap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn insert(&mut self, item: T, key: TurnKey) {
        let order = self.next_order;
        self.next_order += 1;
        self.entries.push(HeapEntry { item, key, order });
        self.sift_up(self.entries.len() - 1);
    }

    pub fn peek(&self) -> Option<&T> {
        self.entries.first().map(|entry| &entry.item)
    }

    pub fn pop_max(&mut self) -> Option<T> {
        if self.entries.is_empty() {
            return None;
        }
        let top = self.entries.swap_remove(0);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(top.item)
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if !self.entries[idx].outranks(&self.entries[parent]) {
                break;
            }
            self.entries.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut best = idx;
            if left < len && self.entries[left].outranks(&self.entries[best]) {
                best = left;
            }
            if right < len && self.entries[right].outranks(&self.entries[best]) {
                best = right;
            }
            if best == idx {
                break;
            }
            self.entries.swap(idx, best);
            idx = best;
        }
    }
}

impl<T: PartialEq> TurnHeap<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.entries.iter().any(|entry| entry.item == *item)
    }

    /// Removes the first copy of `item` found. Returns `false` when absent.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(idx) = self.entries.iter().position(|entry| entry.item == *item) else {
            return false;
        };
        self.entries.swap_remove(idx);
        if idx < self.entries.len() {
            self.sift_up(idx);
            self.sift_down(idx);
        }
        true
    }
}

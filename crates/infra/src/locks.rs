//! Per-item exclusive locks with bounded waits.
//!
//! Every read-check-write sequence against an item's stock runs while holding
//! that item's lock. Locks for different items are independent.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;

use stockledger_core::ItemId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LockError {
    #[error("timed out after {waited:?} waiting for item {item_id}")]
    Timeout { item_id: ItemId, waited: Duration },
}

#[derive(Debug, Default)]
struct Slot {
    held: Mutex<bool>,
    released: Condvar,
}

impl Slot {
    /// The flag carries no invariant a panicking holder could break.
    fn flag(&self) -> MutexGuard<'_, bool> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

type SlotMap = HashMap<ItemId, Arc<Slot>>;

fn lock_slots(slots: &Mutex<SlotMap>) -> MutexGuard<'_, SlotMap> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drop the registry entry once the caller's handle is the only one left
/// outside the map. Clones are only taken under the registry mutex, so the
/// count cannot grow while it is held.
fn forget_if_idle(slots: &Mutex<SlotMap>, item_id: ItemId, slot: &Arc<Slot>) {
    let mut slots = lock_slots(slots);
    if Arc::strong_count(slot) == 2 {
        slots.remove(&item_id);
    }
}

/// Registry of item locks. An entry lives only while the item is held or
/// waited on.
#[derive(Debug)]
pub struct ItemLocks {
    slots: Arc<Mutex<SlotMap>>,
    timeout: Duration,
}

impl ItemLocks {
    pub fn new(timeout: Duration) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    /// Block until `item_id` is free or the configured timeout elapses.
    pub fn acquire(&self, item_id: ItemId) -> Result<ItemLockGuard, LockError> {
        let slot = lock_slots(&self.slots).entry(item_id).or_default().clone();

        let deadline = Instant::now() + self.timeout;
        let mut held = slot.flag();
        while *held {
            let now = Instant::now();
            if now >= deadline {
                drop(held);
                forget_if_idle(&self.slots, item_id, &slot);
                return Err(LockError::Timeout {
                    item_id,
                    waited: self.timeout,
                });
            }
            held = match slot.released.wait_timeout(held, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        *held = true;
        drop(held);

        Ok(ItemLockGuard {
            item_id,
            slot,
            slots: self.slots.clone(),
        })
    }

    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        lock_slots(&self.slots).len()
    }
}

/// Releases the item lock when dropped.
#[derive(Debug)]
pub struct ItemLockGuard {
    item_id: ItemId,
    slot: Arc<Slot>,
    slots: Arc<Mutex<SlotMap>>,
}

impl Drop for ItemLockGuard {
    fn drop(&mut self) {
        *self.slot.flag() = false;
        self.slot.released.notify_one();
        forget_if_idle(&self.slots, self.item_id, &self.slot);
    }
}

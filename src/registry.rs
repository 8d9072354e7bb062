//! The keyed keeper of prototypes.
//!
//! A [`Registry`] owns one slot per key. The first request for a key runs the
//! supplied factory and publishes the result as an `Arc`; every later request
//! for that key, from any thread, gets a [`Prototype`] handle to that same
//! instance. The map lock is only held while finding or inserting a slot, and
//! the factory runs under the slot's own lock, so construction of unrelated
//! keys is never serialized.
//!
//! Prototypes are read-only. The only way to get something mutable out of a
//! registry is [`Prototype::instantiate`], which replicates.

use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasherDefault, Hash};
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use seahash::SeaHasher;
use tracing::{debug, trace, warn};

use crate::error::{Result, StencilError};
use crate::replicate::Replicate;
use crate::settings::Settings;

pub type KeyHasher = BuildHasherDefault<SeaHasher>;

// ------------- Prototype -------------
/// A shared, read-only handle to a published template.
pub struct Prototype<E> {
    kept: Arc<E>,
}

impl<E> Prototype<E> {
    /// True when both handles refer to the same published instance.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.kept, &b.kept)
    }
    /// Number of handles currently alive, the registry's own included.
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.kept)
    }
}

impl<E: Replicate> Prototype<E> {
    /// An owned, independently mutable copy of the template.
    pub fn instantiate(&self) -> E {
        self.kept.replicate()
    }
}

impl<E> Clone for Prototype<E> {
    fn clone(&self) -> Self {
        Self {
            kept: Arc::clone(&self.kept),
        }
    }
}

impl<E> Deref for Prototype<E> {
    type Target = E;
    fn deref(&self) -> &E {
        &self.kept
    }
}

impl<E: fmt::Debug> fmt::Debug for Prototype<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Prototype").field(&*self.kept).finish()
    }
}

// ------------- Slot -------------
// A slot only ever holds a complete prototype or nothing, so a factory that
// panicked under the lock leaves nothing half-built and the poison is ignored.
enum Kept<E> {
    Empty,
    Ready(Arc<E>),
    // taken out of the map; whoever still waits on it starts over
    Retired,
}

struct Slot<E> {
    kept: Mutex<Kept<E>>,
}

impl<E> Slot<E> {
    fn new() -> Self {
        Self {
            kept: Mutex::new(Kept::Empty),
        }
    }
    fn lock(&self) -> MutexGuard<'_, Kept<E>> {
        self.kept.lock().unwrap_or_else(PoisonError::into_inner)
    }
    fn prototype(&self) -> Option<Prototype<E>> {
        match &*self.lock() {
            Kept::Ready(kept) => Some(Prototype {
                kept: Arc::clone(kept),
            }),
            Kept::Empty | Kept::Retired => None,
        }
    }
    fn retire(&self) -> Option<Prototype<E>> {
        match std::mem::replace(&mut *self.lock(), Kept::Retired) {
            Kept::Ready(kept) => Some(Prototype { kept }),
            Kept::Empty | Kept::Retired => None,
        }
    }
}

// ------------- Registry -------------
pub struct Registry<K, E> {
    slots: Mutex<HashMap<K, Arc<Slot<E>>, KeyHasher>>,
}

impl<K, E> Registry<K, E>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::default()),
        }
    }
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(HashMap::with_capacity_and_hasher(
                capacity,
                KeyHasher::default(),
            )),
        }
    }
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_capacity(settings.registry_capacity)
    }

    fn slot(&self, key: &K) -> Result<Arc<Slot<E>>> {
        let mut slots = self.slots.lock()?;
        if let Some(slot) = slots.get(key) {
            return Ok(Arc::clone(slot));
        }
        let slot = Arc::new(Slot::new());
        slots.insert(key.clone(), Arc::clone(&slot));
        Ok(slot)
    }

    /// Returns the prototype kept under `key`, creating it with `factory` if
    /// this is the first request. Once a key is kept, later factories are
    /// never invoked, even if they would build something different.
    pub fn get_or_create<F>(&self, key: K, factory: F) -> Result<Prototype<E>>
    where
        F: FnOnce() -> E,
    {
        self.get_or_try_create(key, || Ok::<E, std::convert::Infallible>(factory()))
    }

    /// Like [`Registry::get_or_create`] for a factory that can fail. The
    /// failure is surfaced as [`StencilError::Registry`] and nothing is kept,
    /// so a later call may retry.
    pub fn get_or_try_create<F, X>(&self, key: K, factory: F) -> Result<Prototype<E>>
    where
        F: FnOnce() -> std::result::Result<E, X>,
        X: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        loop {
            let slot = self.slot(&key)?;
            // concurrent callers for the same key queue up here
            let mut kept = slot.lock();
            match &*kept {
                Kept::Ready(prototype) => {
                    trace!(?key, "prototype already kept");
                    return Ok(Prototype {
                        kept: Arc::clone(prototype),
                    });
                }
                Kept::Retired => continue,
                Kept::Empty => {}
            }
            return match factory() {
                Ok(entity) => {
                    let prototype = Arc::new(entity);
                    *kept = Kept::Ready(Arc::clone(&prototype));
                    debug!(?key, "prototype created");
                    Ok(Prototype { kept: prototype })
                }
                Err(e) => {
                    // the map lock is never held while waiting on a slot
                    let mut slots = self.slots.lock()?;
                    if slots.get(&key).is_some_and(|s| Arc::ptr_eq(s, &slot)) {
                        slots.remove(&key);
                    }
                    *kept = Kept::Retired;
                    let source = e.into();
                    warn!(?key, error = %source, "prototype factory failed");
                    Err(StencilError::Registry {
                        key: format!("{key:?}"),
                        source,
                    })
                }
            };
        }
    }

    /// The prototype kept under `key`, without creating one.
    pub fn get(&self, key: &K) -> Result<Option<Prototype<E>>> {
        let slot = match self.slots.lock()?.get(key) {
            Some(slot) => Arc::clone(slot),
            None => return Ok(None),
        };
        Ok(slot.prototype())
    }

    pub fn contains(&self, key: &K) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Number of keys with a published prototype.
    pub fn len(&self) -> Result<usize> {
        Ok(self.keys()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn keys(&self) -> Result<Vec<K>> {
        let slots: Vec<(K, Arc<Slot<E>>)> = self
            .slots
            .lock()?
            .iter()
            .map(|(key, slot)| (key.clone(), Arc::clone(slot)))
            .collect();
        Ok(slots
            .into_iter()
            .filter(|(_, slot)| slot.prototype().is_some())
            .map(|(key, _)| key)
            .collect())
    }

    /// Forgets `key`. Handles already given out stay valid; the next request
    /// for the key runs a factory again.
    pub fn remove(&self, key: &K) -> Result<Option<Prototype<E>>> {
        let removed = self.slots.lock()?.remove(key);
        let Some(slot) = removed else {
            return Ok(None);
        };
        debug!(?key, "prototype removed");
        Ok(slot.retire())
    }

    pub fn clear(&self) -> Result<()> {
        let drained: Vec<Arc<Slot<E>>> = self.slots.lock()?.drain().map(|(_, slot)| slot).collect();
        debug!(keys = drained.len(), "registry cleared");
        for slot in drained {
            slot.retire();
        }
        Ok(())
    }
}

impl<K, E> Default for Registry<K, E>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

//! Generational slot arena.
//!
//! Both the linked graph and the branch graph keep their vertices and edges in
//! an [`Arena`]. Entities are addressed by small `Copy` ids carrying a slot
//! index and a generation; removing an entity bumps the slot generation, so an
//! id that outlived its entity is detected instead of silently aliasing
//! whatever reuses the slot.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Slot index plus generation. Every typed id wraps one of these.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RawIndex {
    index: u32,
    generation: u32,
}

impl RawIndex {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub const fn index(&self) -> u32 {
        self.index
    }

    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for RawIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.index, self.generation)
    }
}

/// Typed handle into an [`Arena`].
pub trait ArenaKey: Copy + Eq {
    fn from_raw(raw: RawIndex) -> Self;
    fn raw(self) -> RawIndex;
}

/// Declares a typed arena id with a short display prefix.
macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        pub struct $name($crate::arena::RawIndex);

        impl $name {
            /// Slot index, stable for the lifetime of the entity.
            pub fn index(&self) -> u32 {
                self.0.index()
            }
        }

        impl $crate::arena::ArenaKey for $name {
            fn from_raw(raw: $crate::arena::RawIndex) -> Self {
                Self(raw)
            }

            fn raw(self) -> $crate::arena::RawIndex {
                self.0
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, concat!($prefix, "{:?}"), self.0)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0.index())
            }
        }
    };
}
pub(crate) use arena_id;

/// Index of the next pushed slot. Truncating would alias a live slot.
fn slot_index(len: usize) -> u32 {
    match u32::try_from(len) {
        Ok(index) => index,
        Err(_) => panic!("arena slot index space exhausted at {len} slots"),
    }
}

enum Slot<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32, next_free: Option<u32> },
}

/// Slot storage with a free list and generation checks.
pub struct Arena<K, T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    len: usize,
    _key: PhantomData<fn(K) -> K>,
}

impl<K: ArenaKey, T> Default for Arena<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ArenaKey, T> Arena<K, T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
            _key: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
            _key: PhantomData,
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores `value`, reusing a vacant slot when there is one.
    ///
    /// # Panics
    ///
    /// Panics if a new slot index would not fit in a `u32`.
    pub fn insert(&mut self, value: T) -> K {
        if let Some(index) = self.free_head {
            if let Some(&Slot::Vacant {
                generation,
                next_free,
            }) = self.slots.get(index as usize)
            {
                self.free_head = next_free;
                self.slots[index as usize] = Slot::Occupied { generation, value };
                self.len += 1;
                return K::from_raw(RawIndex::new(index, generation));
            }
        }
        let index = slot_index(self.slots.len());
        self.slots.push(Slot::Occupied {
            generation: 0,
            value,
        });
        self.len += 1;
        K::from_raw(RawIndex::new(index, 0))
    }

    pub fn remove(&mut self, key: K) -> Option<T> {
        let raw = key.raw();
        let slot = self.slots.get_mut(raw.index() as usize)?;
        match slot {
            Slot::Occupied { generation, .. } if *generation == raw.generation() => {}
            _ => return None,
        }
        let next = Slot::Vacant {
            generation: raw.generation().wrapping_add(1),
            next_free: self.free_head,
        };
        let old = std::mem::replace(slot, next);
        self.free_head = Some(raw.index());
        self.len -= 1;
        match old {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get(&self, key: K) -> Option<&T> {
        let raw = key.raw();
        match self.slots.get(raw.index() as usize)? {
            Slot::Occupied { generation, value } if *generation == raw.generation() => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        let raw = key.raw();
        match self.slots.get_mut(raw.index() as usize)? {
            Slot::Occupied { generation, value } if *generation == raw.generation() => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Occupied { generation, value } => Some((
                    K::from_raw(RawIndex::new(index as u32, *generation)),
                    value,
                )),
                Slot::Vacant { .. } => None,
            })
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Drops every entry. Slot generations survive so older ids stay invalid.
    pub fn clear(&mut self) {
        let mut free_head = None;
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            let generation = match slot {
                Slot::Occupied { generation, .. } => generation.wrapping_add(1),
                Slot::Vacant { generation, .. } => *generation,
            };
            *slot = Slot::Vacant {
                generation,
                next_free: free_head,
            };
            free_head = Some(index as u32);
        }
        self.free_head = free_head;
        self.len = 0;
    }
}

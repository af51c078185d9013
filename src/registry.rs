//! Live contact storage for the in-progress interaction.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::GestureError;
use crate::geom::Point;

/// One finger, from touch-down to touch-up.
#[derive(Debug, Clone)]
pub struct TouchContact {
    /// Device-assigned id; unique among live contacts, may be reused after
    /// release.
    pub id: i32,
    /// Position at touch-down. Never changes.
    pub origin: Point,
    /// Latest position reported by motion events.
    pub current: Point,
    /// Input-stack timestamp of the touch-down, in milliseconds (wraps).
    pub down_time: u32,
    /// Distance from `origin` to the interaction anchor's origin at the
    /// moment this contact landed; 0 for the anchor itself.
    pub baseline_distance: f64,
}

impl TouchContact {
    pub fn new(id: i32, x: f64, y: f64, time_ms: u32, baseline_distance: f64) -> Self {
        Self {
            id,
            origin: (x, y),
            current: (x, y),
            down_time: time_ms,
            baseline_distance,
        }
    }
}

/// Id-keyed set of currently-down contacts.
#[derive(Debug, Default)]
pub struct TouchRegistry {
    contacts: HashMap<i32, TouchContact>,
}

impl TouchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuses to overwrite a live id: silently replacing the stored contact
    /// would corrupt its baseline.
    pub fn insert(&mut self, contact: TouchContact) -> Result<(), GestureError> {
        match self.contacts.entry(contact.id) {
            Entry::Occupied(_) => Err(GestureError::DuplicateContact(contact.id)),
            Entry::Vacant(slot) => {
                slot.insert(contact);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: i32) -> Option<&TouchContact> {
        self.contacts.get(&id)
    }

    pub fn update_position(&mut self, id: i32, x: f64, y: f64) -> Result<(), GestureError> {
        let contact = self
            .contacts
            .get_mut(&id)
            .ok_or(GestureError::UnknownContact(id))?;
        contact.current = (x, y);
        Ok(())
    }

    pub fn remove(&mut self, id: i32) -> Result<TouchContact, GestureError> {
        self.contacts
            .remove(&id)
            .ok_or(GestureError::UnknownContact(id))
    }

    pub fn count(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TouchContact> {
        self.contacts.values()
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
    }
}

//! Gesture → command dispatch.

use std::collections::HashMap;

use log::{debug, error, info};

use crate::classifier::GestureKind;
use crate::config::Profile;

/// Receives the resolved gesture once per interaction.
///
/// Injected into [`GestureSession`](crate::GestureSession) at construction,
/// so recognition can be exercised without a command table.
pub trait BindingDispatcher {
    fn find_and_execute(&mut self, gesture: GestureKind, peak_contacts: u32);
}

/// Any `FnMut(GestureKind, u32)` works as a dispatcher.
impl<F: FnMut(GestureKind, u32)> BindingDispatcher for F {
    fn find_and_execute(&mut self, gesture: GestureKind, peak_contacts: u32) {
        self(gesture, peak_contacts)
    }
}

/// Key into a profile's binding table: `"swipe_up.3"`.
pub fn binding_key(gesture: GestureKind, peak_contacts: u32) -> String {
    format!("{}.{}", gesture.slug(), peak_contacts)
}

/// Table-backed dispatcher: exact-match lookup of `(gesture, peak contact
/// count)` in a binding table, handing the bound command string to the
/// executor. A missing binding is a no-op; executor failures are logged and
/// never reach the session.
pub struct CommandDispatcher<E> {
    bindings: HashMap<String, String>,
    executor: E,
}

impl<E: FnMut(&str) -> anyhow::Result<()>> CommandDispatcher<E> {
    pub fn new(bindings: HashMap<String, String>, executor: E) -> Self {
        Self { bindings, executor }
    }

    pub fn from_profile(profile: &Profile, executor: E) -> Self {
        Self::new(profile.bindings.clone(), executor)
    }
}

impl<E: FnMut(&str) -> anyhow::Result<()>> BindingDispatcher for CommandDispatcher<E> {
    fn find_and_execute(&mut self, gesture: GestureKind, peak_contacts: u32) {
        let key = binding_key(gesture, peak_contacts);
        let Some(command) = self.bindings.get(&key) else {
            debug!("no binding for {key}");
            return;
        };
        info!("{key} -> '{command}'");
        if let Err(e) = (self.executor)(command) {
            error!("command for {key} failed: {e}");
        }
    }
}

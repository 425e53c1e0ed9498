//! Observer lists
//!
//! Every signal a controller raises towards its host is an [`EventSource`]:
//! an ordered list of handlers that are invoked in registration order.
//! Handlers receive the payload mutably so that a listener can write a
//! result back (a correlation id, a "handled" flag) for the raiser to read.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};

use crate::types::Vec2;

/// Handle returned by [`EventSource::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

/// Event handler function type
pub type EventHandler<A> = Box<dyn FnMut(&mut A)>;

/// An ordered list of handlers for one signal
pub struct EventSource<A> {
    handlers: IndexMap<HandlerId, EventHandler<A>, FxBuildHasher>,
    next_id: u64,
}

impl<A> EventSource<A> {
    pub fn new() -> Self {
        Self {
            handlers: IndexMap::default(),
            next_id: 0,
        }
    }

    /// Register a handler. It runs after every handler registered before it.
    pub fn subscribe<F>(&mut self, handler: F) -> HandlerId
    where
        F: FnMut(&mut A) + 'static,
    {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.insert(id, Box::new(handler));
        id
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        self.handlers.shift_remove(&id).is_some()
    }

    /// Remove every handler
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when nobody is listening
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Dispatch `args` to all handlers in registration order
    pub fn emit(&mut self, args: &mut A) {
        for handler in self.handlers.values_mut() {
            handler(args);
        }
    }
}

impl<A> Default for EventSource<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for EventSource<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSource")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Kind of device behind a pointer press
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerDevice {
    #[default]
    Mouse,
    Touch,
    Pen,
}

impl PointerDevice {
    /// Touch and pen presses are handed to the host for direct manipulation
    pub fn is_direct_manipulation(self) -> bool {
        matches!(self, PointerDevice::Touch | PointerDevice::Pen)
    }
}

/// Pointer state at the time of a press
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerInfo {
    pub pointer_id: u32,
    pub device: PointerDevice,
    /// Position relative to the element that received the press
    pub position: Vec2,
}

impl PointerInfo {
    pub fn new(device: PointerDevice, position: Vec2) -> Self {
        Self {
            pointer_id: 0,
            device,
            position,
        }
    }
}

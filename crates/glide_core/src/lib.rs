//! Glide Core
//!
//! Foundational primitives shared by the Glide scroll-controller crates:
//!
//! - **Event Sources**: Ordered observer lists with explicit subscribe/unsubscribe
//! - **State Machines**: Flat statecharts for interaction states
//! - **Deferred Dispatch**: Work queued until after the current layout pass
//!
//! Everything here is single-threaded. Handlers and callbacks are plain
//! `FnMut` closures and are never required to be `Send`.
//!
//! # Example
//!
//! ```rust
//! use glide_core::EventSource;
//!
//! let mut changed: EventSource<u32> = EventSource::new();
//! let id = changed.subscribe(|value| *value += 1);
//!
//! let mut payload = 1;
//! changed.emit(&mut payload);
//! assert_eq!(payload, 2);
//!
//! assert!(changed.unsubscribe(id));
//! assert!(changed.is_empty());
//! ```

pub mod dispatch;
pub mod events;
pub mod fsm;
pub mod types;

pub use dispatch::{DeferredQueue, Priority};
pub use events::{EventSource, HandlerId, PointerDevice, PointerInfo};
pub use fsm::{StateMachine, StateMachineBuilder};
pub use types::{Orientation, Vec2};

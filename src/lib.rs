//! Multi-touch gesture recognition for a single logical seat.
//!
//! Feed raw per-contact touch events into a [`GestureSession`]. While the
//! interaction is in flight the session answers whether raw events may still
//! be passed through to the focused surface; once every contact has lifted it
//! resolves one gesture (tap, long tap, 4-way swipe, pinch in/out) plus the
//! peak contact count and hands the pair to the [`BindingDispatcher`] it was
//! constructed with.
//!
//! ```no_run
//! use touch_gestures::{GestureKind, GestureSession};
//!
//! // 400mm wide display mapped onto 1000px.
//! let mut session = GestureSession::new(400.0, 1000.0, |gesture: GestureKind, peak: u32| {
//!     println!("{gesture} with {peak} contact(s)");
//! })?;
//!
//! let _passthrough = session.touch_down(1, 0.0, 0.0, 100)?;
//! session.touch_motion(1, 200.0, 0.0);
//! session.touch_up(1, 180); // resolves SwipeRight, peak 1
//! # Ok::<(), touch_gestures::GestureError>(())
//! ```

mod bindings;
mod classifier;
mod config;
mod error;
mod geom;
mod hysteresis;
mod registry;
mod session;

pub use bindings::{BindingDispatcher, CommandDispatcher, binding_key};
pub use classifier::GestureKind;
pub use config::{Meta, Profile, Thresholds, parse_binding_key};
pub use error::GestureError;
pub use geom::Point;
pub use hysteresis::{DEFAULT_DRAG_MARGIN_MM, calibrate, calibrate_with_margin};
pub use registry::{TouchContact, TouchRegistry};
pub use session::{GestureSession, LONG_TAP_MS};

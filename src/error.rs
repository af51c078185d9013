use thiserror::Error;

/// Everything that can go wrong inside the recognizer.
///
/// Only `InvalidMetrics` and `DuplicateContact` ever reach callers of the
/// session API; `UnknownContact` is swallowed there, since stray motion and
/// release events are ordinary driver noise.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GestureError {
    #[error("invalid display metrics: {physical_size_mm}mm over {pixel_size_px}px")]
    InvalidMetrics {
        physical_size_mm: f64,
        pixel_size_px: f64,
    },

    #[error("touch id {0} is already tracked")]
    DuplicateContact(i32),

    #[error("touch id {0} is not tracked")]
    UnknownContact(i32),
}

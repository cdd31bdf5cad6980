//! Construction-time errors. Per-frame updates never fail.

/// Errors raised while building the sky from configuration.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SkyError {
    /// The day length must be a positive, finite number of minutes.
    #[error("cycle duration must be positive and finite, got {0} minutes")]
    InvalidCycleDuration(f32),

    /// The color palette breaks an ordering or seam invariant.
    #[error("invalid color palette: {0}")]
    InvalidPalette(String),

    /// Render distance or chunk size would collapse the sky to nothing.
    #[error("world scale must be positive, got {render_distance} chunks of {chunk_size} units")]
    InvalidWorldScale { render_distance: u32, chunk_size: f32 },
}

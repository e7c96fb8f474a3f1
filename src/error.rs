//! Simulation-specific error types.
//!
//! The simulation core is a closed numeric model: geometric edge cases are
//! guarded with epsilon checks, not errors.  What remains here are contract
//! violations a caller can actually commit, like asking the palette registry
//! for a color it doesn't have or building a simulation that can't rotate
//! its color theme.
//!
//! ## Usage
//!
//! ```rust
//! use contrail::error::SimResult;
//! use contrail::palette::PaletteRegistry;
//!
//! fn first_color(registry: &PaletteRegistry) -> SimResult<bevy::color::Srgba> {
//!     registry.color(0, 0)
//! }
//! ```

use thiserror::Error;

/// Top-level error enum for the contrail simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A palette index past the end of the registry.
    #[error("palette index {index} is out of range (registry holds {count} palettes)")]
    PaletteOutOfRange {
        /// Index that was requested.
        index: usize,
        /// Number of palettes in the registry.
        count: usize,
    },

    /// A color slot outside `0..PALETTE_SLOTS`.
    #[error("color slot {slot} is out of range (palettes hold 4 colors)")]
    SlotOutOfRange {
        /// Slot that was requested.
        slot: usize,
    },

    /// The palette rotation on respawn needs at least two palettes to pick a
    /// different one.
    #[error("palette rotation needs at least 2 palettes, got {count}")]
    TooFewPalettes {
        /// Number of palettes available.
        count: usize,
    },
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

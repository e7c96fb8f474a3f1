//! Contrail: a click-guided craft leaving a color-themed cloud trail.
//!
//! The simulation core ([`guidance`], [`trail`], [`spawn`], [`palette`],
//! [`simulation`]) is plain Rust driven one tick per frame; the remaining
//! modules wire it into a Bevy app.

pub mod config;
pub mod constants;
pub mod error;
pub mod graphics;
pub mod guidance;
pub mod input;
pub mod palette;
pub mod rendering;
pub mod simulation;
pub mod spawn;
pub mod trail;

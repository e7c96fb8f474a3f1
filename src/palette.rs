//! Named four-color palettes for the trail.
//!
//! The registry is built once from [`PaletteRegistry::default`] and is
//! read-only afterwards.  The simulation keeps an *active* palette index into
//! it and rotates that index every time the craft re-enters the viewport, so
//! each pass of the craft paints its trail in a different theme.

use crate::constants::{DEFAULT_BLOB_ALPHA, PALETTE_SLOTS};
use crate::error::{SimError, SimResult};
use bevy::color::Srgba;

/// One named set of exactly four colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub name: &'static str,
    pub colors: [Srgba; PALETTE_SLOTS],
}

impl Palette {
    /// Build a palette from 8-bit RGB triples, each with an explicit alpha.
    pub fn from_bytes(name: &'static str, colors: [([u8; 3], f32); PALETTE_SLOTS]) -> Self {
        Self {
            name,
            colors: colors.map(|(rgb, alpha)| byte_color(rgb, alpha)),
        }
    }
}

/// Convert an 8-bit RGB triple to a color.
///
/// Channels are divided by 256, not 255, so `0xFF` lands just below 1.0.
fn byte_color([r, g, b]: [u8; 3], alpha: f32) -> Srgba {
    Srgba::new(
        f32::from(r) / 256.0,
        f32::from(g) / 256.0,
        f32::from(b) / 256.0,
        alpha,
    )
}

/// Fixed list of palettes, indexed by `(palette, slot)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteRegistry {
    palettes: Vec<Palette>,
}

impl PaletteRegistry {
    /// Registry holding exactly `palettes`, in order.
    ///
    /// Mostly useful for tests that need a degenerate registry; the game uses
    /// [`PaletteRegistry::default`].
    pub fn new(palettes: Vec<Palette>) -> Self {
        Self { palettes }
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Palette> {
        self.palettes.iter()
    }

    /// Name of palette `index`.
    pub fn name(&self, index: usize) -> SimResult<&'static str> {
        self.palette(index).map(|p| p.name)
    }

    /// Look up palette `index`, rejecting indices past the end.
    pub fn palette(&self, index: usize) -> SimResult<&Palette> {
        self.palettes.get(index).ok_or(SimError::PaletteOutOfRange {
            index,
            count: self.palettes.len(),
        })
    }

    /// Color in `slot` of palette `palette`.
    pub fn color(&self, palette: usize, slot: usize) -> SimResult<Srgba> {
        let palette = self.palette(palette)?;
        palette
            .colors
            .get(slot)
            .copied()
            .ok_or(SimError::SlotOutOfRange { slot })
    }
}

impl Default for PaletteRegistry {
    fn default() -> Self {
        let a = DEFAULT_BLOB_ALPHA;
        Self::new(vec![
            // flat red/pink
            Palette::from_bytes(
                "rednpink",
                [
                    ([0xEE, 0x45, 0x40], a),
                    ([0xC7, 0x27, 0x41], a),
                    ([0x80, 0x13, 0x36], a),
                    ([0x51, 0x0A, 0x32], a),
                ],
            ),
            Palette::from_bytes(
                "greennpink",
                [
                    ([0x8F, 0xB9, 0xA8], a),
                    ([0xFE, 0xFA, 0xD4], 0.9),
                    ([0xFC, 0xD0, 0xBA], a),
                    ([0xF1, 0x82, 0x8D], a),
                ],
            ),
            Palette::from_bytes(
                "pastelpink",
                [
                    ([0xFB, 0xD1, 0xD3], a),
                    ([0xF1, 0x98, 0xAF], a),
                    ([0xEB, 0xB2, 0xD6], a),
                    ([0x9F, 0x81, 0xCD], a),
                ],
            ),
            Palette::from_bytes(
                "blue",
                [
                    ([0x9D, 0xC6, 0xD8], a),
                    ([0x00, 0xB3, 0xCA], a),
                    ([0x7D, 0xD0, 0xB6], a),
                    ([0x1D, 0x4E, 0x89], a),
                ],
            ),
            Palette::from_bytes(
                "olive",
                [
                    ([0x83, 0xB7, 0x99], a),
                    ([0xE2, 0xCD, 0x6D], a),
                    ([0xC2, 0xB2, 0x8F], a),
                    ([0xE4, 0xD8, 0xB4], a),
                ],
            ),
        ])
    }
}

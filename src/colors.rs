// 🎨 Color Assignment - One palette color per player
//
// The palette is shuffled once per migration, then handed out in profile
// order. More profiles than colors → colors wrap around and repeat.
// Colors are cosmetic, so nothing here is stable across runs unless the
// random source is seeded.

use crate::error::{MigrationError, Result};
use crate::ids::RandomSource;
use serde::{Deserialize, Serialize};

// ============================================================================
// PALETTE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteColor {
    pub name: String,
    /// `#rrggbb`
    pub hex: String,
}

impl PaletteColor {
    pub fn new(name: &str, hex: &str) -> Self {
        PaletteColor {
            name: name.to_string(),
            hex: hex.to_string(),
        }
    }
}

/// Preset colors offered by the app's player editor
pub const PRESET_COLORS: [(&str, &str); 14] = [
    ("red", "#ef4444"),
    ("orange", "#f97316"),
    ("yellow", "#eab308"),
    ("green", "#22c55e"),
    ("teal", "#14b8a6"),
    ("blue", "#3b82f6"),
    ("violet", "#8b5cf6"),
    ("pink", "#ec4899"),
    ("indigo", "#6366f1"),
    ("cyan", "#06b6d4"),
    ("brown", "#92400e"),
    ("dark gray", "#1f2937"),
    ("slate", "#64748b"),
    ("lime", "#84cc16"),
];

/// Immutable, non-empty list of colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<PaletteColor>,
}

impl Palette {
    pub fn new(colors: Vec<PaletteColor>) -> Result<Self> {
        if colors.is_empty() {
            return Err(MigrationError::EmptyPalette);
        }
        Ok(Palette { colors })
    }

    pub fn colors(&self) -> &[PaletteColor] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Assign a color to each of `count` players, in order
    ///
    /// Shuffles a copy of the palette, then player `i` gets
    /// `shuffled[i % len]`. The palette itself is never reordered.
    pub fn assign<R: RandomSource + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<PaletteColor> {
        let mut shuffled = self.colors.clone();
        rng.shuffle(&mut shuffled);

        (0..count)
            .map(|i| shuffled[i % shuffled.len()].clone())
            .collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            colors: PRESET_COLORS
                .iter()
                .map(|(name, hex)| PaletteColor::new(name, hex))
                .collect(),
        }
    }
}

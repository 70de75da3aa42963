//! Cake color customization for the preview modal's model.

pub type Rgba = [f32; 4];

/// Used when the picker hands us something that is not `#rrggbb`.
pub const FALLBACK_PINK: Rgba = [1.0, 0.4, 0.8, 1.0];
const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];

/// Parses `#rrggbb` (leading `#` optional, any case) into an opaque color.
pub fn parse_hex_color(hex: &str) -> Option<Rgba> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map(|v| v as f32 / 255.0);
    Some([channel(0).ok()?, channel(2).ok()?, channel(4).ok()?, 1.0])
}

pub fn hex_to_rgba(hex: &str) -> Rgba {
    parse_hex_color(hex).unwrap_or(FALLBACK_PINK)
}

/// Whether a preset swatch (`data-color`) is the picker's current value.
pub fn preset_matches(preset: &str, selected: &str) -> bool {
    preset.eq_ignore_ascii_case(selected)
}

/// Base color access over a model's material list.
pub trait MaterialPalette {
    fn material_count(&self) -> usize;
    /// Materials without a metallic-roughness block are never recolored.
    fn is_pbr(&self, index: usize) -> bool;
    fn base_color(&self, index: usize) -> Option<Rgba>;
    fn set_base_color(&mut self, index: usize, color: Rgba) -> anyhow::Result<()>;
}

/// Recolors every PBR material of the current model and can put the
/// captured colors back.
pub struct ColorCustomizer<P> {
    palette: Option<P>,
    originals: Vec<Rgba>,
}

impl<P> Default for ColorCustomizer<P> {
    fn default() -> Self {
        Self { palette: None, originals: Vec::new() }
    }
}

impl<P: MaterialPalette> ColorCustomizer<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn palette(&self) -> Option<&P> {
        self.palette.as_ref()
    }

    pub fn originals(&self) -> &[Rgba] {
        &self.originals
    }

    /// Replaces the current model and captures its colors.
    pub fn on_model_loaded(&mut self, palette: Option<P>) {
        self.originals.clear();
        self.palette = palette;
        let Some(palette) = &self.palette else {
            return;
        };
        self.originals = (0..palette.material_count())
            .map(|i| if palette.is_pbr(i) { palette.base_color(i).unwrap_or(WHITE) } else { WHITE })
            .collect();
        log::debug!("captured {} material colors", self.originals.len());
    }

    /// Tints every PBR material with `hex`. Returns the applied color.
    pub fn change_color(&mut self, hex: &str) -> Option<Rgba> {
        let palette = self.palette.as_mut()?;
        let color = hex_to_rgba(hex);
        for i in 0..palette.material_count() {
            if !palette.is_pbr(i) {
                continue;
            }
            if let Err(e) = palette.set_base_color(i, color) {
                log::warn!("material {i}: {e:#}");
            }
        }
        Some(color)
    }

    /// Restores captured colors. `false` when there was nothing to restore.
    pub fn reset(&mut self) -> bool {
        let Some(palette) = self.palette.as_mut() else {
            return false;
        };
        if self.originals.is_empty() {
            return false;
        }
        for (i, color) in self.originals.iter().enumerate().take(palette.material_count()) {
            if !palette.is_pbr(i) {
                continue;
            }
            if let Err(e) = palette.set_base_color(i, *color) {
                log::warn!("material {i}: {e:#}");
            }
        }
        true
    }
}

//! Scroll position → reveal progress.
//!
//! Everything in here is pure: the same scroll offset and section bounds
//! always produce the same progress value.

/// Fraction of the section height over which the reveal runs.
pub const DEFAULT_REVEAL_FRACTION: f64 = 0.7;

/// Page-space bounds of the section the reveal is tied to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SectionBounds {
    /// Document offset of the section's top edge (px).
    pub top: f64,
    /// Laid-out height of the section (px). 0 while hidden.
    pub height: f64,
}

impl SectionBounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Scroll distance over which progress goes from 0 to 1.
    pub fn reveal_range(&self, fraction: f64) -> f64 {
        self.height * fraction
    }

    /// How far the page has scrolled past the section top, never negative.
    pub fn scroll_within(&self, scroll_offset: f64) -> f64 {
        let within = scroll_offset - self.top;
        if within.is_finite() { within.max(0.0) } else { 0.0 }
    }
}

/// Cubic ease-in-out on `[0, 1]`.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Linear progress through the reveal range, clamped to `[0, 1]`.
///
/// Degenerate layouts (zero or negative height, non-finite numbers) yield 0.
pub fn raw_progress(scroll_offset: f64, section: SectionBounds, fraction: f64) -> f64 {
    let range = section.reveal_range(fraction);
    if !(range.is_finite() && range > 0.0) {
        return 0.0;
    }
    let raw = (scroll_offset - section.top) / range;
    if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.0 }
}

/// Eased reveal progress for an explicit reveal fraction.
pub fn compute_progress_with(scroll_offset: f64, section: SectionBounds, fraction: f64) -> f64 {
    ease_in_out_cubic(raw_progress(scroll_offset, section, fraction)).clamp(0.0, 1.0)
}

/// Eased reveal progress using the default 70% reveal range.
pub fn compute_progress(scroll_offset: f64, section_top: f64, section_height: f64) -> f64 {
    compute_progress_with(
        scroll_offset,
        SectionBounds::new(section_top, section_height),
        DEFAULT_REVEAL_FRACTION,
    )
}

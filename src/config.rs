//! Site configuration.
//!
//! The page may embed a JSON block (`<script type="application/json"
//! id="site-config">`) overriding any of these values. Missing fields fall
//! back to the defaults below.

use anyhow::{Context, ensure};
use serde::Deserialize;

use crate::catalog::CakeCatalog;
use crate::progress::DEFAULT_REVEAL_FRACTION;

/// Tunables for the scroll reveal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Share of the section height the reveal is spread over.
    pub reveal_fraction: f64,
    /// Below this progress meshes are pure skeleton.
    pub skeleton_threshold: f64,
    /// Overlay opacity at progress 0 of the blend window.
    pub overlay_max_opacity: f64,
    /// Overlays at or below this opacity are removed.
    pub overlay_cutoff: f64,
    /// Camera azimuth per scrolled pixel.
    pub degrees_per_pixel: f64,
    pub polar_degrees: f64,
    /// RGB of the skeleton and overlay wireframes.
    pub wire_color: [f32; 3],
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            reveal_fraction: DEFAULT_REVEAL_FRACTION,
            skeleton_threshold: 0.05,
            overlay_max_opacity: 0.5,
            overlay_cutoff: 0.1,
            degrees_per_pixel: 0.3,
            polar_degrees: 75.0,
            wire_color: [0.0, 0.0, 0.0],
        }
    }
}

impl RevealConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.reveal_fraction.is_finite() && self.reveal_fraction > 0.0,
            "reveal_fraction must be positive, got {}",
            self.reveal_fraction
        );
        ensure!(
            (0.0..1.0).contains(&self.skeleton_threshold),
            "skeleton_threshold must be in [0, 1), got {}",
            self.skeleton_threshold
        );
        ensure!(
            (0.0..=1.0).contains(&self.overlay_max_opacity),
            "overlay_max_opacity must be in [0, 1], got {}",
            self.overlay_max_opacity
        );
        ensure!(
            (0.0..=1.0).contains(&self.overlay_cutoff),
            "overlay_cutoff must be in [0, 1], got {}",
            self.overlay_cutoff
        );
        ensure!(
            self.degrees_per_pixel.is_finite() && self.polar_degrees.is_finite(),
            "camera orbit factors must be finite"
        );
        ensure!(
            self.wire_color.iter().all(|c| (0.0..=1.0).contains(c)),
            "wire_color components must be in [0, 1]"
        );
        Ok(())
    }
}

/// Ids of the page elements the glue code binds to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub reveal_section: String,
    pub reveal_viewer: String,
    pub hero_viewer: String,
    pub modal: String,
    pub modal_viewer: String,
    pub modal_title: String,
    pub ar_modal: String,
    pub ar_iframe: String,
    pub model_select: String,
    pub exposure_slider: String,
    pub exposure_value: String,
    pub shadow_slider: String,
    pub shadow_value: String,
    pub environment_select: String,
    pub auto_rotate_check: String,
    pub color_picker: String,
    pub reset_color: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            reveal_section: "skeleton-reveal".into(),
            reveal_viewer: "reveal-model-viewer".into(),
            hero_viewer: "hero-model-viewer".into(),
            modal: "modal-3d".into(),
            modal_viewer: "model-viewer".into(),
            modal_title: "modal-cake-name".into(),
            ar_modal: "modal-ar".into(),
            ar_iframe: "ar-iframe".into(),
            model_select: "model-select".into(),
            exposure_slider: "exposure-slider".into(),
            exposure_value: "exposure-value".into(),
            shadow_slider: "shadow-slider".into(),
            shadow_value: "shadow-value".into(),
            environment_select: "environment-select".into(),
            auto_rotate_check: "auto-rotate-check".into(),
            color_picker: "color-picker".into(),
            reset_color: "reset-color".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub reveal: RevealConfig,
    pub elements: ElementIds,
    pub catalog: CakeCatalog,
    /// Value the color picker is reset to.
    pub default_color: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            reveal: RevealConfig::default(),
            elements: ElementIds::default(),
            catalog: CakeCatalog::default(),
            default_color: "#ff69b4".into(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: SiteConfig = serde_json::from_str(text).context("parsing site config")?;
        config.reveal.validate().context("invalid reveal config")?;
        Ok(config)
    }

    /// Parses `text` if present, falling back to defaults on any error.
    pub fn load_or_default(text: Option<&str>) -> Self {
        let Some(text) = text else {
            return Self::default();
        };
        match Self::from_json(text) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e:#}; using default site config");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        RevealConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SiteConfig::from_json(r#"{ "reveal": { "polar_degrees": 60.0 } }"#).unwrap();
        assert_eq!(config.reveal.polar_degrees, 60.0);
        assert_eq!(config.reveal.skeleton_threshold, 0.05);
        assert_eq!(config.elements.modal, "modal-3d");
        assert_eq!(config.default_color, "#ff69b4");
        assert!(config.catalog.get("wedding-cake").is_some());
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let err = SiteConfig::from_json(r#"{ "reveal": { "skeleton_threshold": 1.5 } }"#).unwrap_err();
        assert!(format!("{err:#}").contains("skeleton_threshold"));
    }

    #[test]
    fn test_rejects_zero_fraction() {
        let config = RevealConfig { reveal_fraction: 0.0, ..RevealConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_on_garbage() {
        assert_eq!(SiteConfig::load_or_default(Some("{not json")), SiteConfig::default());
        assert_eq!(SiteConfig::load_or_default(None), SiteConfig::default());
    }
}

//! Scroll-driven reveal and interactive 3D previews for the cake showcase.
//!
//! Everything except [`web`] is plain logic over small traits
//! ([`SceneModel`], [`ViewerSurface`], [`PageLayout`]) and runs natively; the
//! browser bindings are only compiled for `wasm32`.

pub mod catalog;
pub mod color;
pub mod config;
pub mod controls;
pub mod modal;
pub mod progress;
pub mod reveal;
pub mod scene;

#[cfg(target_arch = "wasm32")]
mod web;

pub use config::{RevealConfig, SiteConfig};
pub use progress::compute_progress;
pub use reveal::{RevealController, RevealMode, RevealPhase};
pub use scene::{PageLayout, SceneModel, ViewerSurface};

// ── Web entry‑point ──
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Redirect `log` macros & panic messages to the browser console
    console_log::init_with_level(log::Level::Debug).ok();
    console_error_panic_hook::set_once();

    web::install().map_err(|e| JsValue::from_str(&format!("{e:#}")))
}

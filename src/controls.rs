//! Hero viewer controls: model picker, lighting sliders, environment and
//! auto-rotate. Each control maps to attribute writes on the viewer.

use crate::catalog::{CakeCatalog, CakeEntry, CatalogCursor, SELECT_FALLBACK};
use crate::scene::AttributeChange;

pub const ATTR_SRC: &str = "src";
pub const ATTR_ALT: &str = "alt";
pub const ATTR_EXPOSURE: &str = "exposure";
pub const ATTR_SHADOW_INTENSITY: &str = "shadow-intensity";
pub const ATTR_ENVIRONMENT_IMAGE: &str = "environment-image";
pub const ATTR_AUTO_ROTATE: &str = "auto-rotate";

/// New value for a slider plus the text for its readout label.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderUpdate {
    pub change: AttributeChange,
    pub label: String,
}

fn slider(attr: &'static str, raw: &str) -> Option<SliderUpdate> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(SliderUpdate { change: AttributeChange::Set(attr, raw.to_string()), label: format!("{value:.1}") })
}

pub fn exposure(raw: &str) -> Option<SliderUpdate> {
    slider(ATTR_EXPOSURE, raw)
}

pub fn shadow_intensity(raw: &str) -> Option<SliderUpdate> {
    slider(ATTR_SHADOW_INTENSITY, raw)
}

/// An empty selection means the viewer's built-in lighting.
pub fn environment(value: &str) -> AttributeChange {
    if value.is_empty() {
        AttributeChange::Remove(ATTR_ENVIRONMENT_IMAGE)
    } else {
        AttributeChange::Set(ATTR_ENVIRONMENT_IMAGE, value.to_string())
    }
}

pub fn auto_rotate(checked: bool) -> AttributeChange {
    if checked {
        AttributeChange::Set(ATTR_AUTO_ROTATE, String::new())
    } else {
        AttributeChange::Remove(ATTR_AUTO_ROTATE)
    }
}

/// Attribute writes that put `entry` into a viewer.
pub fn show_cake(entry: &CakeEntry) -> [AttributeChange; 2] {
    [AttributeChange::Set(ATTR_SRC, entry.model.clone()), AttributeChange::Set(ATTR_ALT, entry.alt_text())]
}

/// Outcome of switching the hero model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSwitch {
    /// Value the model select should show.
    pub id: String,
    pub changes: [AttributeChange; 2],
}

impl ModelSwitch {
    fn to(entry: &CakeEntry) -> Self {
        Self { id: entry.id.clone(), changes: show_cake(entry) }
    }
}

#[derive(Debug, Default)]
pub struct HeroControls {
    cursor: CatalogCursor,
}

impl HeroControls {
    /// "Change model" button: next cake in catalog order.
    pub fn change_model(&mut self, catalog: &CakeCatalog) -> Option<ModelSwitch> {
        self.cursor.advance(catalog).map(ModelSwitch::to)
    }

    /// Model select: unknown ids fall back to the wedding cake. The `alt`
    /// text keeps the selected value, as the select shows it.
    pub fn select_model(&mut self, catalog: &CakeCatalog, id: &str) -> Option<ModelSwitch> {
        let entry = catalog.get_or(id, SELECT_FALLBACK)?;
        self.cursor.sync_to(catalog, &entry.id);
        Some(ModelSwitch {
            id: id.to_string(),
            changes: [
                AttributeChange::Set(ATTR_SRC, entry.model.clone()),
                AttributeChange::Set(ATTR_ALT, id.replacen('-', " ", 1)),
            ],
        })
    }
}

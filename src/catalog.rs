//! Static cake lookup table: model files and AR experiences keyed by cake id.

use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CakeEntry {
    pub id: String,
    /// Path of the `.glb` the viewer loads.
    pub model: String,
    /// External AR experience, if the cake has one.
    #[serde(default)]
    pub ar_url: Option<String>,
}

impl CakeEntry {
    fn builtin(id: &str) -> Self {
        Self { id: id.to_string(), model: format!("assets/{id}.glb"), ar_url: None }
    }

    /// Viewer `alt` text: the first `-` becomes a space.
    pub fn alt_text(&self) -> String {
        self.id.replacen('-', " ", 1)
    }
}

static DEFAULT_CATALOG: Lazy<Vec<CakeEntry>> = Lazy::new(|| {
    [
        "chocolate",
        "wedding-cake",
        "strawberry",
        "carousel",
        "flower-cake",
        "pear-cake",
        "Macarons-cake",
        "circus",
        "blackforest",
        "lanterm",
        "flower-25",
        "flower-flat-25",
    ]
    .into_iter()
    .map(CakeEntry::builtin)
    .collect()
});

/// Id used when the model select holds an unknown value.
pub const SELECT_FALLBACK: &str = "wedding-cake";
/// Id used when a "View in 3D" button names an unknown cake.
pub const PREVIEW_FALLBACK: &str = "chocolate";

/// Ordered catalog; order drives the "change model" cycle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct CakeCatalog {
    entries: Vec<CakeEntry>,
}

impl Default for CakeCatalog {
    fn default() -> Self {
        Self { entries: DEFAULT_CATALOG.clone() }
    }
}

impl CakeCatalog {
    pub fn new(entries: Vec<CakeEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CakeEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn model_path(&self, id: &str) -> Option<&str> {
        self.get(id).map(|e| e.model.as_str())
    }

    /// Entry for `id`, or for `fallback` when `id` is unknown.
    pub fn get_or<'a>(&'a self, id: &str, fallback: &str) -> Option<&'a CakeEntry> {
        self.get(id).or_else(|| self.get(fallback))
    }

    pub fn ar_url(&self, id: &str) -> Option<&str> {
        self.get(id)?.ar_url.as_deref()
    }
}

/// Position in the catalog for the "change model" button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCursor {
    index: usize,
}

impl Default for CatalogCursor {
    /// Starts on the second entry, the hero's initial wedding cake.
    fn default() -> Self {
        Self { index: 1 }
    }
}

impl CatalogCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Steps to the next entry, wrapping at the end.
    pub fn advance<'a>(&mut self, catalog: &'a CakeCatalog) -> Option<&'a CakeEntry> {
        if catalog.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % catalog.len();
        catalog.entries.get(self.index)
    }

    /// Moves the cursor onto `id` so cycling continues from there.
    pub fn sync_to(&mut self, catalog: &CakeCatalog, id: &str) {
        if let Some(index) = catalog.position(id) {
            self.index = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_paths() {
        let catalog = CakeCatalog::default();
        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog.model_path("carousel"), Some("assets/carousel.glb"));
        assert_eq!(catalog.model_path("Macarons-cake"), Some("assets/Macarons-cake.glb"));
        assert_eq!(catalog.model_path("vanilla"), None);
    }

    #[test]
    fn test_fallbacks() {
        let catalog = CakeCatalog::default();
        assert_eq!(catalog.get_or("nope", SELECT_FALLBACK).unwrap().id, "wedding-cake");
        assert_eq!(catalog.get_or("nope", PREVIEW_FALLBACK).unwrap().id, "chocolate");
        assert_eq!(catalog.get_or("circus", PREVIEW_FALLBACK).unwrap().id, "circus");
    }

    #[test]
    fn test_alt_text_replaces_first_dash_only() {
        let catalog = CakeCatalog::default();
        assert_eq!(catalog.get("wedding-cake").unwrap().alt_text(), "wedding cake");
        assert_eq!(catalog.get("flower-flat-25").unwrap().alt_text(), "flower flat-25");
        assert_eq!(catalog.get("circus").unwrap().alt_text(), "circus");
    }

    #[test]
    fn test_cursor_cycles_from_wedding_cake() {
        let catalog = CakeCatalog::default();
        let mut cursor = CatalogCursor::default();
        assert_eq!(cursor.advance(&catalog).unwrap().id, "strawberry");
        for _ in 0..9 {
            cursor.advance(&catalog);
        }
        assert_eq!(cursor.index(), 11);
        assert_eq!(cursor.advance(&catalog).unwrap().id, "chocolate");
    }

    #[test]
    fn test_cursor_sync() {
        let catalog = CakeCatalog::default();
        let mut cursor = CatalogCursor::default();
        cursor.sync_to(&catalog, "lanterm");
        assert_eq!(cursor.advance(&catalog).unwrap().id, "flower-25");
        cursor.sync_to(&catalog, "unknown");
        assert_eq!(cursor.index(), 10);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = CakeCatalog::new(Vec::new());
        assert!(CatalogCursor::default().advance(&catalog).is_none());
    }

    #[test]
    fn test_ar_urls_from_json() {
        let catalog: CakeCatalog = serde_json::from_str(
            r#"[{ "id": "circus", "model": "m/circus.glb", "ar_url": "https://ar.example/circus" },
                { "id": "pear-cake", "model": "m/pear.glb" }]"#,
        )
        .unwrap();
        assert_eq!(catalog.ar_url("circus"), Some("https://ar.example/circus"));
        assert_eq!(catalog.ar_url("pear-cake"), None);
        assert_eq!(catalog.ar_url("missing"), None);
    }
}

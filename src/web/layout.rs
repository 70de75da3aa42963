use web_sys::{Element, Window};

use crate::progress::SectionBounds;
use crate::scene::PageLayout;

/// Measures the reveal section against the window's scroll position.
pub struct DomLayout {
    window: Window,
    section: Element,
}

impl DomLayout {
    pub fn new(window: Window, section: Element) -> Self {
        Self { window, section }
    }
}

impl PageLayout for DomLayout {
    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn section_bounds(&self) -> Option<SectionBounds> {
        if !self.section.is_connected() {
            return None;
        }
        let rect = self.section.get_bounding_client_rect();
        Some(SectionBounds::new(rect.top() + self.scroll_offset(), rect.height()))
    }
}

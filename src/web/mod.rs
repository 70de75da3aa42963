//! Browser glue: reads the page config and wires every widget to the DOM.

mod dom;
mod layout;
mod model_viewer;
mod page;
mod scroll;

use std::rc::Rc;

use web_sys::{Document, Window};

use crate::config::SiteConfig;

/// Id of the optional `<script type="application/json">` config block.
const CONFIG_SCRIPT_ID: &str = "site-config";

fn read_config(doc: &Document) -> SiteConfig {
    let json = doc.get_element_by_id(CONFIG_SCRIPT_ID).and_then(|s| s.text_content());
    SiteConfig::load_or_default(json.as_deref())
}

fn wire_page(window: &Window, doc: &Document) {
    let config = Rc::new(read_config(doc));
    let parts: [(&str, anyhow::Result<()>); 5] = [
        ("scroll reveal", scroll::install(window, doc, &config)),
        ("hero controls", page::install_hero_controls(doc, &config)),
        ("3D preview", page::install_preview_modal(window, doc, &config)),
        ("AR preview", page::install_ar(window, doc, &config)),
        ("audio buttons", page::install_audio(doc)),
    ];
    for (name, result) in parts {
        if let Err(e) = result {
            log::error!("{name}: {e:#}");
        }
    }
}

/// Wires the page now, or once the DOM has been parsed.
pub fn install() -> anyhow::Result<()> {
    let window = dom::window()?;
    let doc = dom::document()?;
    if doc.ready_state() != "loading" {
        wire_page(&window, &doc);
        return Ok(());
    }
    let target = doc.clone();
    dom::listen(&target, "DOMContentLoaded", move |_| wire_page(&window, &doc))
}

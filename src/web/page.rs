//! Hero controls, preview and AR dialogs, color swatches, audio buttons.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, Event, HtmlAudioElement, HtmlElement, HtmlIFrameElement, HtmlInputElement,
    HtmlSelectElement, KeyboardEvent, Window,
};

use super::dom::{by_id, js_err, listen, select_all, set_display};
use super::model_viewer::{ElementSurface, ViewerMaterials};
use crate::catalog::PREVIEW_FALLBACK;
use crate::color::{ColorCustomizer, preset_matches};
use crate::config::SiteConfig;
use crate::controls::{self, HeroControls, ModelSwitch, SliderUpdate};
use crate::modal::{ArLauncher, ModalEvent, ModalState};
use crate::scene::AttributeChange;

fn apply_all(surface: &mut ElementSurface, changes: &[AttributeChange]) {
    for change in changes {
        if let Err(e) = change.apply_to(surface) {
            log::warn!("{change:?}: {e:#}");
        }
    }
}

fn input_value(event: &Event) -> Option<HtmlInputElement> {
    event.target()?.dyn_into::<HtmlInputElement>().ok()
}

fn is_target(event: &Event, element: &Element) -> bool {
    event
        .target()
        .is_some_and(|t| js_sys::Object::is(t.as_ref(), element.as_ref()))
}

pub fn install_hero_controls(doc: &Document, config: &Rc<SiteConfig>) -> anyhow::Result<()> {
    let ids = &config.elements;
    let Some(hero) = by_id::<Element>(doc, &ids.hero_viewer) else {
        return Ok(());
    };
    let surface = Rc::new(RefCell::new(ElementSurface::new(hero)));
    let state = Rc::new(RefCell::new(HeroControls::default()));
    let select = by_id::<HtmlSelectElement>(doc, &ids.model_select);

    let show = {
        let surface = surface.clone();
        let select = select.clone();
        move |switch: Option<ModelSwitch>, sync_select: bool| {
            let Some(switch) = switch else {
                return;
            };
            apply_all(&mut surface.borrow_mut(), &switch.changes);
            if let (true, Some(select)) = (sync_select, &select) {
                select.set_value(&switch.id);
            }
            log::debug!("hero model -> {}", switch.id);
        }
    };

    if let Ok(Some(button)) = doc.query_selector(".btn-change") {
        let (config, state, show) = (config.clone(), state.clone(), show.clone());
        listen(&button, "click", move |_| {
            let switch = state.borrow_mut().change_model(&config.catalog);
            show(switch, true);
        })?;
    }

    if let Some(select) = &select {
        let (config, state, target) = (config.clone(), state.clone(), select.clone());
        listen(select, "change", move |_| {
            let switch = state.borrow_mut().select_model(&config.catalog, &target.value());
            show(switch, false);
        })?;
    }

    let sliders = [
        (&ids.exposure_slider, &ids.exposure_value, controls::exposure as fn(&str) -> Option<SliderUpdate>),
        (&ids.shadow_slider, &ids.shadow_value, controls::shadow_intensity),
    ];
    for (slider_id, label_id, update) in sliders {
        let Some(slider) = by_id::<HtmlInputElement>(doc, slider_id) else {
            continue;
        };
        let label = by_id::<HtmlElement>(doc, label_id);
        let surface = surface.clone();
        listen(&slider, "input", move |event| {
            let Some(input) = input_value(&event) else {
                return;
            };
            let Some(update) = update(&input.value()) else {
                return;
            };
            if let Some(label) = &label {
                label.set_text_content(Some(&update.label));
            }
            apply_all(&mut surface.borrow_mut(), &[update.change]);
        })?;
    }

    if let Some(environment) = by_id::<HtmlSelectElement>(doc, &ids.environment_select) {
        let (surface, target) = (surface.clone(), environment.clone());
        listen(&environment, "change", move |_| {
            apply_all(&mut surface.borrow_mut(), &[controls::environment(&target.value())]);
        })?;
    }

    if let Some(check) = by_id::<HtmlInputElement>(doc, &ids.auto_rotate_check) {
        let target = check.clone();
        listen(&check, "change", move |_| {
            apply_all(&mut surface.borrow_mut(), &[controls::auto_rotate(target.checked())]);
        })?;
    }
    Ok(())
}

/// Swatches, picker and reset button bound to the preview modal's model.
struct ColorPanel {
    picker: Option<HtmlInputElement>,
    presets: Vec<Element>,
    default_color: String,
}

impl ColorPanel {
    fn highlight(&self, selected: &str) {
        for preset in &self.presets {
            let color = preset.get_attribute("data-color").unwrap_or_default();
            let result = if preset_matches(&color, selected) {
                preset.class_list().add_1("active")
            } else {
                preset.class_list().remove_1("active")
            };
            if let Err(e) = result {
                log::warn!("{}", js_err(e));
            }
        }
    }

    fn clear(&self) {
        if let Some(picker) = &self.picker {
            picker.set_value(&self.default_color);
        }
        for preset in &self.presets {
            if let Err(e) = preset.class_list().remove_1("active") {
                log::warn!("{}", js_err(e));
            }
        }
    }
}

pub fn install_preview_modal(window: &Window, doc: &Document, config: &Rc<SiteConfig>) -> anyhow::Result<()> {
    let ids = &config.elements;
    let (Some(modal), Some(viewer)) = (by_id::<HtmlElement>(doc, &ids.modal), by_id::<Element>(doc, &ids.modal_viewer))
    else {
        return Ok(());
    };
    let title = by_id::<HtmlElement>(doc, &ids.modal_title);
    let state = Rc::new(RefCell::new(ModalState::default()));
    let colors = Rc::new(RefCell::new(ColorCustomizer::<ViewerMaterials>::new()));
    let panel = Rc::new(ColorPanel {
        picker: by_id::<HtmlInputElement>(doc, &ids.color_picker),
        presets: select_all(doc, ".color-preset")?,
        default_color: config.default_color.clone(),
    });

    {
        let (colors, target) = (colors.clone(), viewer.clone());
        listen(&viewer, "load", move |_| {
            let palette = ViewerMaterials::from_viewer(&target).unwrap_or_else(|e| {
                log::warn!("reading viewer materials: {e:#}");
                None
            });
            colors.borrow_mut().on_model_loaded(palette);
        })?;
    }

    if let Some(picker) = &panel.picker {
        let (colors, panel_ref) = (colors.clone(), panel.clone());
        listen(picker, "input", move |event| {
            let Some(input) = input_value(&event) else {
                return;
            };
            let selected = input.value();
            colors.borrow_mut().change_color(&selected);
            panel_ref.highlight(&selected);
        })?;
    }

    for preset in &panel.presets {
        let (colors, panel_ref, target) = (colors.clone(), panel.clone(), preset.clone());
        listen(preset, "click", move |_| {
            let color = target.get_attribute("data-color").unwrap_or_default();
            if let Some(picker) = &panel_ref.picker {
                picker.set_value(&color);
            }
            colors.borrow_mut().change_color(&color);
            panel_ref.highlight(&color);
        })?;
    }

    if let Some(reset) = by_id::<Element>(doc, &ids.reset_color) {
        let (colors, panel_ref) = (colors.clone(), panel.clone());
        listen(&reset, "click", move |_| {
            if colors.borrow_mut().reset() {
                panel_ref.clear();
            }
        })?;
    }

    for button in select_all(doc, ".btn-3d")? {
        let (config, state, panel_ref) = (config.clone(), state.clone(), panel.clone());
        let (modal, viewer, title, target) = (modal.clone(), viewer.clone(), title.clone(), button.clone());
        listen(&button, "click", move |_| {
            let cake_id = target.get_attribute("data-cake").unwrap_or_default();
            let Some(entry) = config.catalog.get_or(&cake_id, PREVIEW_FALLBACK) else {
                log::warn!("no model for {cake_id}");
                return;
            };
            let name = target
                .closest(".cake-card")
                .ok()
                .flatten()
                .and_then(|card| card.query_selector(".cake-name").ok().flatten())
                .and_then(|n| n.text_content());
            if let (Some(title), Some(name)) = (&title, name) {
                title.set_text_content(Some(&name));
            }
            if let Err(e) = viewer.set_attribute(controls::ATTR_SRC, &entry.model) {
                log::warn!("{}", js_err(e));
            }
            state.borrow_mut().open();
            set_display(&modal, "block");
            panel_ref.clear();
        })?;
    }

    let close = {
        let (state, modal) = (state.clone(), modal.clone());
        move |event: ModalEvent| {
            if state.borrow_mut().handle(event) {
                set_display(&modal, "none");
            }
        }
    };
    if let Ok(Some(button)) = doc.query_selector(".modal-close") {
        let close = close.clone();
        listen(&button, "click", move |_| close(ModalEvent::CloseButton))?;
    }
    install_dismissal(window, doc, modal.into(), close)
}

/// Backdrop clicks and Escape for one dialog.
fn install_dismissal(
    window: &Window,
    doc: &Document,
    modal: Element,
    close: impl Fn(ModalEvent) + Clone + 'static,
) -> anyhow::Result<()> {
    {
        let close = close.clone();
        listen(window, "click", move |event| {
            if is_target(&event, &modal) {
                close(ModalEvent::Click { on_backdrop: true });
            }
        })?;
    }
    listen(doc, "keydown", move |event| {
        let key = event.dyn_ref::<KeyboardEvent>().map(|k| k.key());
        if let Some(dismiss) = key.as_deref().and_then(ModalEvent::from_key) {
            close(dismiss);
        }
    })
}

pub fn install_ar(window: &Window, doc: &Document, config: &Rc<SiteConfig>) -> anyhow::Result<()> {
    let ids = &config.elements;
    let (Some(modal), Some(iframe)) =
        (by_id::<HtmlElement>(doc, &ids.ar_modal), by_id::<HtmlIFrameElement>(doc, &ids.ar_iframe))
    else {
        return Ok(());
    };
    let launcher = Rc::new(RefCell::new(ArLauncher::default()));

    for button in select_all(doc, ".btn-ar")? {
        let (config, launcher, modal, iframe, target) =
            (config.clone(), launcher.clone(), modal.clone(), iframe.clone(), button.clone());
        listen(&button, "click", move |_| {
            let cake_id = target.get_attribute("data-cake").unwrap_or_default();
            if let Some(url) = launcher.borrow_mut().open(&config.catalog, &cake_id) {
                iframe.set_src(url);
                set_display(&modal, "block");
            }
        })?;
    }

    let close = {
        let (launcher, modal) = (launcher.clone(), modal.clone());
        move |event: ModalEvent| {
            if launcher.borrow_mut().handle(event) {
                if let Err(e) = iframe.remove_attribute("src") {
                    log::warn!("clearing AR frame: {}", js_err(e));
                }
                set_display(&modal, "none");
            }
        }
    };
    if let Ok(Some(button)) = doc.query_selector(".ar-modal-close") {
        let close = close.clone();
        listen(&button, "click", move |_| close(ModalEvent::CloseButton))?;
    }
    install_dismissal(window, doc, modal.into(), close)
}

/// `<button data-audio="clip-id">` plays `<audio id="clip-id">` from the start.
pub fn install_audio(doc: &Document) -> anyhow::Result<()> {
    for button in select_all(doc, "[data-audio]")? {
        let Some(clip_id) = button.get_attribute("data-audio") else {
            continue;
        };
        let Some(audio) = by_id::<HtmlAudioElement>(doc, &clip_id) else {
            log::warn!("no <audio id=\"{clip_id}\">");
            continue;
        };
        listen(&button, "click", move |_| {
            audio.set_current_time(0.0);
            match audio.play() {
                Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::warn!("playback refused: {}", js_err(e));
                    }
                }),
                Err(e) => log::warn!("playback failed: {}", js_err(e)),
            }
        })?;
    }
    Ok(())
}

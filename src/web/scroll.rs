//! Hooks the reveal controller up to window scroll/resize and viewer load.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Window};

use super::dom::{by_id, get, js_err, listen, listen_passive};
use super::layout::DomLayout;
use super::model_viewer::{ElementSurface, ThreeModel};
use crate::config::SiteConfig;
use crate::reveal::{FrameRequest, RevealController, ViewportEvent};

type Controller = RevealController<DomLayout, ElementSurface, ThreeModel>;

fn capture(controller: &RefCell<Controller>, viewer: &Element) -> FrameRequest {
    let model = ThreeModel::from_viewer(viewer).unwrap_or_else(|e| {
        log::warn!("reading viewer scene: {e:#}");
        None
    });
    controller.borrow_mut().on_model_loaded(model)
}

pub fn install(window: &Window, doc: &Document, config: &SiteConfig) -> anyhow::Result<()> {
    let ids = &config.elements;
    let (Some(section), Some(viewer)) =
        (by_id::<Element>(doc, &ids.reveal_section), by_id::<Element>(doc, &ids.reveal_viewer))
    else {
        log::info!("no #{} on this page; scroll reveal disabled", ids.reveal_section);
        return Ok(());
    };

    let controller = Rc::new(RefCell::new(RevealController::new(
        config.reveal.clone(),
        DomLayout::new(window.clone(), section),
        ElementSurface::new(viewer.clone()),
    )));

    let frame = {
        let controller = controller.clone();
        Rc::new(Closure::<dyn FnMut()>::new(move || controller.borrow_mut().on_animation_frame()))
    };
    let schedule: Rc<dyn Fn(FrameRequest)> = {
        let window = window.clone();
        Rc::new(move |request: FrameRequest| {
            if request == FrameRequest::Skip {
                return;
            }
            let callback: &Closure<dyn FnMut()> = &frame;
            if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                log::error!("requestAnimationFrame failed: {}", js_err(e));
            }
        })
    };

    {
        let controller = controller.clone();
        let schedule = schedule.clone();
        listen_passive(window, "scroll", move |_| {
            let request = controller.borrow_mut().on_scroll_or_resize(ViewportEvent::Scroll);
            schedule(request);
        })?;
    }
    {
        let controller = controller.clone();
        let schedule = schedule.clone();
        listen(window, "resize", move |_| {
            let request = controller.borrow_mut().on_scroll_or_resize(ViewportEvent::Resize);
            schedule(request);
        })?;
    }
    {
        let controller = controller.clone();
        let schedule = schedule.clone();
        let target = viewer.clone();
        listen(&viewer, "load", move |_| {
            let request = capture(&controller, &target);
            schedule(request);
        })?;
    }
    {
        let controller = controller.clone();
        listen(window, "pagehide", move |_| {
            controller.borrow_mut().unload();
        })?;
    }

    // The model may have finished loading before we got here.
    if get(viewer.as_ref(), "loaded").is_ok_and(|v| v.is_truthy()) {
        schedule(capture(&controller, &viewer));
    }
    let request = controller.borrow_mut().on_scroll_or_resize(ViewportEvent::Resize);
    schedule(request);
    log::info!("scroll reveal ready on #{}", ids.reveal_viewer);
    Ok(())
}

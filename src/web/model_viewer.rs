//! `<model-viewer>` bindings.
//!
//! The reveal needs per-mesh material control, which the element's public
//! API does not expose, so [`ThreeModel`] walks the element's internal
//! three.js scene. Color customization only needs the public
//! `model.materials` API ([`ViewerMaterials`]).

use js_sys::{Array, Object, Symbol};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use super::dom::{call, get, get_bool, get_f64, get_object, has_method, js_err, set};
use crate::color::{MaterialPalette, Rgba};
use crate::scene::{BlendState, MaterialSlots, SceneModel, ViewerSurface, WireStyle};

/// Name given to the overlay meshes we add, so scene walks skip them.
const OVERLAY_NAME: &str = "reveal-wire-overlay";

/// Reads `obj[Symbol(name)]` for a symbol-keyed internal property.
fn symbol_property(obj: &JsValue, name: &str) -> anyhow::Result<Option<JsValue>> {
    let Some(object) = obj.dyn_ref::<Object>() else {
        return Ok(None);
    };
    let wanted = format!("Symbol({name})");
    for key in Object::get_own_property_symbols(object).iter() {
        let Some(symbol) = key.dyn_ref::<Symbol>() else {
            continue;
        };
        if String::from(symbol.to_string()) == wanted {
            return js_sys::Reflect::get(obj, &key).map(Some).map_err(js_err);
        }
    }
    Ok(None)
}

/// The three.js scene behind a loaded `<model-viewer>`.
pub struct ThreeModel {
    identity: String,
    scene: JsValue,
}

impl ThreeModel {
    /// `None` when the viewer has no scene yet.
    pub fn from_viewer(viewer: &Element) -> anyhow::Result<Option<Self>> {
        let Some(scene) = symbol_property(viewer.as_ref(), "scene")? else {
            return Ok(None);
        };
        if !scene.is_object() {
            return Ok(None);
        }
        let identity = viewer.get_attribute("src").unwrap_or_default();
        Ok(Some(Self { identity, scene }))
    }

    fn collect_meshes(node: &JsValue, out: &mut Vec<JsValue>) {
        if get(node, "name").ok().and_then(|n| n.as_string()).as_deref() == Some(OVERLAY_NAME) {
            return;
        }
        if get(node, "isMesh").is_ok_and(|v| v.is_truthy()) {
            out.push(node.clone());
        }
        let Ok(children) = get(node, "children") else {
            return;
        };
        if let Some(children) = children.dyn_ref::<Array>() {
            for child in children.iter() {
                Self::collect_meshes(&child, out);
            }
        }
    }
}

impl SceneModel for ThreeModel {
    type Mesh = JsValue;
    type Material = JsValue;
    type Overlay = JsValue;

    fn identity(&self) -> String {
        self.identity.clone()
    }

    fn meshes(&self) -> Vec<JsValue> {
        let mut meshes = Vec::new();
        Self::collect_meshes(&self.scene, &mut meshes);
        meshes
    }

    fn materials(&self, mesh: &JsValue) -> anyhow::Result<MaterialSlots<JsValue>> {
        let material = get(mesh, "material")?;
        if Array::is_array(&material) {
            let list: Array = material.unchecked_into();
            let slots: Vec<JsValue> = list.iter().collect();
            anyhow::ensure!(slots.iter().all(JsValue::is_object), "material list has holes");
            return Ok(MaterialSlots::Multiple(slots));
        }
        anyhow::ensure!(material.is_object(), "mesh has no material");
        Ok(MaterialSlots::Single(material))
    }

    fn blend(&self, material: &JsValue) -> anyhow::Result<BlendState> {
        Ok(BlendState {
            opacity: get_f64(material, "opacity")? as f32,
            transparent: get_bool(material, "transparent")?,
            depth_write: get_bool(material, "depthWrite")?,
        })
    }

    fn set_blend(&mut self, material: &JsValue, blend: BlendState) -> anyhow::Result<()> {
        set(material, "opacity", &JsValue::from_f64(blend.opacity.into()))?;
        set(material, "transparent", &JsValue::from_bool(blend.transparent))?;
        set(material, "depthWrite", &JsValue::from_bool(blend.depth_write))?;
        set(material, "needsUpdate", &JsValue::TRUE)
    }

    fn make_wireframe(&mut self, template: &JsValue, style: WireStyle) -> anyhow::Result<JsValue> {
        let wire = call(template, "clone", &[])?;
        set(&wire, "wireframe", &JsValue::TRUE)?;
        set(&wire, "map", &JsValue::NULL)?;
        let [r, g, b] = style.color.map(|c| JsValue::from_f64(c.into()));
        if let Ok(color) = get_object(&wire, "color") {
            call(&color, "setRGB", &[r.clone(), g.clone(), b.clone()])?;
        }
        if let Ok(emissive) = get_object(&wire, "emissive") {
            call(&emissive, "setRGB", &[r, g, b])?;
        }
        self.set_blend(&wire, style.blend)?;
        Ok(wire)
    }

    fn assign(&mut self, mesh: &JsValue, slots: &MaterialSlots<JsValue>) -> anyhow::Result<()> {
        let value = match slots {
            MaterialSlots::Single(m) => m.clone(),
            MaterialSlots::Multiple(ms) => ms.iter().collect::<Array>().into(),
        };
        set(mesh, "material", &value)
    }

    fn attach_overlay(&mut self, mesh: &JsValue, material: &JsValue) -> anyhow::Result<JsValue> {
        // A shallow clone shares the geometry; as a child it must not
        // inherit the parent's transform a second time.
        let overlay = call(mesh, "clone", &[JsValue::FALSE])?;
        set(&overlay, "material", material)?;
        set(&overlay, "name", &JsValue::from_str(OVERLAY_NAME))?;
        let zero = JsValue::from_f64(0.0);
        let one = JsValue::from_f64(1.0);
        call(&get_object(&overlay, "position")?, "set", &[zero.clone(), zero.clone(), zero])?;
        call(&get_object(&overlay, "quaternion")?, "identity", &[])?;
        call(&get_object(&overlay, "scale")?, "set", &[one.clone(), one.clone(), one])?;
        call(mesh, "add", &[overlay.clone()])?;
        Ok(overlay)
    }

    fn detach_overlay(&mut self, mesh: &JsValue, overlay: JsValue) -> anyhow::Result<()> {
        call(mesh, "remove", &[overlay.clone()])?;
        if let Ok(material) = get_object(&overlay, "material") {
            call(&material, "dispose", &[])?;
        }
        Ok(())
    }

    fn dispose_material(&mut self, material: &JsValue) -> anyhow::Result<()> {
        call(material, "dispose", &[])?;
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        if has_method(&self.scene, "queueRender") {
            call(&self.scene, "queueRender", &[])?;
        }
        Ok(())
    }
}

/// Public material API of a loaded `<model-viewer>`.
pub struct ViewerMaterials {
    materials: Vec<JsValue>,
}

impl ViewerMaterials {
    /// `None` until the viewer has a model.
    pub fn from_viewer(viewer: &Element) -> anyhow::Result<Option<Self>> {
        let model = get(viewer.as_ref(), "model")?;
        if !model.is_object() {
            return Ok(None);
        }
        let materials = get(&model, "materials")?;
        let materials = match materials.dyn_ref::<Array>() {
            Some(list) => list.iter().collect(),
            None => Vec::new(),
        };
        Ok(Some(Self { materials }))
    }

    fn pbr(&self, index: usize) -> Option<JsValue> {
        let material = self.materials.get(index)?;
        get_object(material, "pbrMetallicRoughness").ok()
    }
}

impl MaterialPalette for ViewerMaterials {
    fn material_count(&self) -> usize {
        self.materials.len()
    }

    fn is_pbr(&self, index: usize) -> bool {
        self.pbr(index).is_some()
    }

    fn base_color(&self, index: usize) -> Option<Rgba> {
        let factor = get(&self.pbr(index)?, "baseColorFactor").ok()?;
        let factor = factor.dyn_ref::<Array>()?;
        let mut rgba = [1.0; 4];
        for (i, slot) in rgba.iter_mut().enumerate() {
            *slot = factor.get(i as u32).as_f64()? as f32;
        }
        Some(rgba)
    }

    fn set_base_color(&mut self, index: usize, color: Rgba) -> anyhow::Result<()> {
        let pbr = self
            .pbr(index)
            .ok_or_else(|| anyhow::anyhow!("material {index} has no pbrMetallicRoughness"))?;
        let factor: Array = color.iter().map(|&c| JsValue::from_f64(c.into())).collect();
        call(&pbr, "setBaseColorFactor", &[factor.into()])?;
        Ok(())
    }
}

/// Attribute writes straight onto an element.
pub struct ElementSurface {
    element: Element,
}

impl ElementSurface {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl ViewerSurface for ElementSurface {
    fn set_attribute(&mut self, name: &str, value: &str) -> anyhow::Result<()> {
        self.element.set_attribute(name, value).map_err(js_err)
    }

    fn remove_attribute(&mut self, name: &str) -> anyhow::Result<()> {
        self.element.remove_attribute(name).map_err(js_err)
    }
}

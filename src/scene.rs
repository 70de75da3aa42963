//! Seams between the reveal logic and the page.
//!
//! The controller never touches the DOM or the renderer directly; it talks
//! to a loaded model through [`SceneModel`], to the viewer element through
//! [`ViewerSurface`] and reads layout through [`PageLayout`].

use crate::progress::SectionBounds;

/// Material slots of one mesh: a single material or a per-group list.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialSlots<M> {
    Single(M),
    Multiple(Vec<M>),
}

impl<M> MaterialSlots<M> {
    pub fn is_multiple(&self) -> bool {
        matches!(self, MaterialSlots::Multiple(_))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        match self {
            MaterialSlots::Single(m) => std::slice::from_ref(m).iter(),
            MaterialSlots::Multiple(ms) => ms.iter(),
        }
    }

    /// Same slot layout with every slot set to `m`.
    pub fn fill_with<N: Clone>(&self, m: N) -> MaterialSlots<N> {
        match self {
            MaterialSlots::Single(_) => MaterialSlots::Single(m),
            MaterialSlots::Multiple(ms) => MaterialSlots::Multiple(vec![m; ms.len()]),
        }
    }
}

/// Transparency state of a material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendState {
    pub opacity: f32,
    pub transparent: bool,
    pub depth_write: bool,
}

impl BlendState {
    pub const OPAQUE: BlendState = BlendState { opacity: 1.0, transparent: false, depth_write: true };

    /// See-through state used while cross-fading.
    pub fn fading(opacity: f32) -> Self {
        Self { opacity, transparent: true, depth_write: false }
    }
}

/// Look of a generated wireframe material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireStyle {
    pub color: [f32; 3],
    pub blend: BlendState,
}

/// A loaded 3D model whose meshes can be restyled.
pub trait SceneModel {
    type Mesh: Clone + PartialEq;
    type Material: Clone;
    /// Auxiliary wireframe mesh attached on top of a mesh.
    type Overlay;

    /// Stable identity of this model load (typically the source URL).
    fn identity(&self) -> String;

    /// Every renderable mesh in the scene graph.
    fn meshes(&self) -> Vec<Self::Mesh>;

    fn materials(&self, mesh: &Self::Mesh) -> anyhow::Result<MaterialSlots<Self::Material>>;

    fn blend(&self, material: &Self::Material) -> anyhow::Result<BlendState>;

    fn set_blend(&mut self, material: &Self::Material, blend: BlendState) -> anyhow::Result<()>;

    /// Builds a wireframe material derived from `template`.
    fn make_wireframe(&mut self, template: &Self::Material, style: WireStyle) -> anyhow::Result<Self::Material>;

    fn assign(&mut self, mesh: &Self::Mesh, slots: &MaterialSlots<Self::Material>) -> anyhow::Result<()>;

    fn attach_overlay(&mut self, mesh: &Self::Mesh, material: &Self::Material) -> anyhow::Result<Self::Overlay>;

    fn detach_overlay(&mut self, mesh: &Self::Mesh, overlay: Self::Overlay) -> anyhow::Result<()>;

    /// Frees a material made by [`SceneModel::make_wireframe`].
    fn dispose_material(&mut self, _material: &Self::Material) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called once after a batch of changes, e.g. to queue a redraw.
    fn flush(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Attribute access on the viewer element.
pub trait ViewerSurface {
    fn set_attribute(&mut self, name: &str, value: &str) -> anyhow::Result<()>;
    fn remove_attribute(&mut self, name: &str) -> anyhow::Result<()>;
}

/// Scroll and section measurements.
pub trait PageLayout {
    fn scroll_offset(&self) -> f64;
    /// `None` while the section is not in the document.
    fn section_bounds(&self) -> Option<SectionBounds>;
}

/// One attribute write on a viewer element.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeChange {
    Set(&'static str, String),
    Remove(&'static str),
}

impl AttributeChange {
    pub fn apply_to<S: ViewerSurface + ?Sized>(&self, surface: &mut S) -> anyhow::Result<()> {
        match self {
            AttributeChange::Set(name, value) => surface.set_attribute(name, value),
            AttributeChange::Remove(name) => surface.remove_attribute(name),
        }
    }
}

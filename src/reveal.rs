//! Scroll-driven skeleton-to-solid reveal of a loaded model.
//!
//! [`RevealController`] owns the per-mesh captured materials and maps each
//! recomputed progress value to one of three looks: a black wireframe
//! skeleton, a cross-fade of the original materials under a fading wireframe
//! overlay, or the untouched original materials.

use anyhow::Context;

use crate::config::RevealConfig;
use crate::progress::{SectionBounds, compute_progress_with};
use crate::scene::{BlendState, MaterialSlots, PageLayout, SceneModel, ViewerSurface, WireStyle};

pub const ATTR_CAMERA_ORBIT: &str = "camera-orbit";
pub const ATTR_SKELETON_MODE: &str = "data-skeleton-mode";
pub const ATTR_REVEAL_PROGRESS: &str = "data-reveal-progress";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Unloaded,
    Skeleton,
    Blending,
    Full,
}

/// What every mesh should look like for a given progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealMode {
    Skeleton,
    Blend {
        opacity: f32,
        /// `None` once the overlay has faded below the cutoff.
        overlay: Option<f32>,
    },
    Solid,
}

impl RevealMode {
    pub fn for_progress(progress: f64, config: &RevealConfig) -> Self {
        let progress = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 0.0 };
        if progress < config.skeleton_threshold {
            RevealMode::Skeleton
        } else if progress < 1.0 {
            let overlay = (1.0 - progress) * config.overlay_max_opacity;
            RevealMode::Blend {
                opacity: progress as f32,
                overlay: (overlay > config.overlay_cutoff).then_some(overlay as f32),
            }
        } else {
            RevealMode::Solid
        }
    }

    pub fn phase(&self) -> RevealPhase {
        match self {
            RevealMode::Skeleton => RevealPhase::Skeleton,
            RevealMode::Blend { .. } => RevealPhase::Blending,
            RevealMode::Solid => RevealPhase::Full,
        }
    }
}

/// Whether the caller has to request an animation frame.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    Schedule,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
    Scroll,
    Resize,
}

/// Overlay mesh owned by a [`MeshState`].
struct OverlaySlot<M: SceneModel> {
    handle: M::Overlay,
    material: M::Material,
}

/// Captured look of one mesh plus the auxiliary materials made for it.
pub struct MeshState<M: SceneModel> {
    mesh: M::Mesh,
    originals: MaterialSlots<M::Material>,
    original_blend: Vec<BlendState>,
    skeleton: Option<MaterialSlots<M::Material>>,
    overlay: Option<OverlaySlot<M>>,
}

impl<M: SceneModel> MeshState<M> {
    fn capture(model: &M, mesh: M::Mesh) -> anyhow::Result<Self> {
        let originals = model.materials(&mesh)?;
        anyhow::ensure!(originals.iter().next().is_some(), "mesh has no material slots");
        let original_blend = originals
            .iter()
            .map(|m| model.blend(m))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { mesh, originals, original_blend, skeleton: None, overlay: None })
    }

    pub(crate) fn is_multi_material(&self) -> bool {
        self.originals.is_multiple()
    }

    pub(crate) fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    fn template(&self) -> anyhow::Result<&M::Material> {
        self.originals.iter().next().context("mesh has no material slots")
    }

    fn apply(&mut self, model: &mut M, mode: RevealMode, config: &RevealConfig) -> anyhow::Result<()> {
        match mode {
            RevealMode::Skeleton => {
                if self.skeleton.is_none() {
                    let style = WireStyle { color: config.wire_color, blend: BlendState::OPAQUE };
                    let wire = model.make_wireframe(self.template()?, style)?;
                    self.skeleton = Some(self.originals.fill_with(wire));
                }
                if let Some(skeleton) = &self.skeleton {
                    model.assign(&self.mesh, skeleton)?;
                }
                self.remove_overlay(model)
            }
            RevealMode::Blend { opacity, overlay } => {
                model.assign(&self.mesh, &self.originals)?;
                for material in self.originals.iter() {
                    model.set_blend(material, BlendState::fading(opacity))?;
                }
                match overlay {
                    Some(overlay_opacity) => self.show_overlay(model, overlay_opacity, config),
                    None => self.remove_overlay(model),
                }
            }
            RevealMode::Solid => {
                model.assign(&self.mesh, &self.originals)?;
                for material in self.originals.iter() {
                    model.set_blend(material, BlendState::OPAQUE)?;
                }
                self.remove_overlay(model)
            }
        }
    }

    /// Back to the look captured at load, including any authored transparency.
    fn restore(&self, model: &mut M) -> anyhow::Result<()> {
        model.assign(&self.mesh, &self.originals)?;
        for (material, blend) in self.originals.iter().zip(&self.original_blend) {
            model.set_blend(material, *blend)?;
        }
        Ok(())
    }

    fn show_overlay(&mut self, model: &mut M, opacity: f32, config: &RevealConfig) -> anyhow::Result<()> {
        match &self.overlay {
            Some(slot) => model.set_blend(&slot.material, BlendState::fading(opacity)),
            None => {
                let style = WireStyle { color: config.wire_color, blend: BlendState::fading(opacity) };
                let material = model.make_wireframe(self.template()?, style)?;
                let handle = model.attach_overlay(&self.mesh, &material)?;
                self.overlay = Some(OverlaySlot { handle, material });
                Ok(())
            }
        }
    }

    fn release_skeleton(&mut self, model: &mut M) -> anyhow::Result<()> {
        // every slot shares one wireframe material
        match self.skeleton.take().as_ref().and_then(|s| s.iter().next()) {
            Some(wire) => model.dispose_material(wire),
            None => Ok(()),
        }
    }

    fn remove_overlay(&mut self, model: &mut M) -> anyhow::Result<()> {
        match self.overlay.take() {
            Some(slot) => model.detach_overlay(&self.mesh, slot.handle),
            None => Ok(()),
        }
    }
}

/// Captured state for one loaded model.
pub struct RevealSession<M: SceneModel> {
    identity: String,
    model: M,
    /// Every mesh the scene had at capture, usable or not.
    scene_meshes: Vec<M::Mesh>,
    meshes: Vec<MeshState<M>>,
}

impl<M: SceneModel> RevealSession<M> {
    /// Captures every mesh that has readable materials. `None` if none do.
    fn capture(model: M) -> Option<Self> {
        let identity = model.identity();
        let scene_meshes = model.meshes();
        let mut meshes = Vec::new();
        for mesh in scene_meshes.iter().cloned() {
            match MeshState::capture(&model, mesh) {
                Ok(state) => meshes.push(state),
                Err(e) => log::warn!("{identity}: skipping mesh: {e:#}"),
            }
        }
        if meshes.is_empty() {
            return None;
        }
        Some(Self { identity, model, scene_meshes, meshes })
    }

    /// Same source and the same scene graph objects. A reload of the same
    /// URL builds new meshes, so it is a different load.
    fn is_same_load(&self, identity: &str, meshes: &[M::Mesh]) -> bool {
        self.identity == identity && self.scene_meshes == meshes
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn meshes(&self) -> &[MeshState<M>] {
        &self.meshes
    }

    pub(crate) fn model(&self) -> &M {
        &self.model
    }

    fn apply(&mut self, mode: RevealMode, config: &RevealConfig) {
        let Self { identity, model, meshes, .. } = self;
        for state in meshes.iter_mut() {
            if let Err(e) = state.apply(model, mode, config) {
                log::warn!("{identity}: mesh left unchanged: {e:#}");
            }
        }
        if let Err(e) = model.flush() {
            log::warn!("{identity}: {e:#}");
        }
    }

    /// Puts every mesh back to its captured look and hands the model back.
    fn teardown(mut self) -> M {
        for state in &mut self.meshes {
            if let Err(e) = state.restore(&mut self.model) {
                log::warn!("{}: restore failed: {e:#}", self.identity);
            }
            if let Err(e) = state.remove_overlay(&mut self.model) {
                log::warn!("{}: overlay removal failed: {e:#}", self.identity);
            }
            if let Err(e) = state.release_skeleton(&mut self.model) {
                log::warn!("{}: skeleton disposal failed: {e:#}", self.identity);
            }
        }
        if let Err(e) = self.model.flush() {
            log::warn!("{}: {e:#}", self.identity);
        }
        self.model
    }
}

/// `"<azimuth>deg <polar>deg auto"`, azimuth rounded to hundredths.
pub fn camera_orbit(scroll_within: f64, config: &RevealConfig) -> String {
    let azimuth = format_degrees(scroll_within.max(0.0) * config.degrees_per_pixel);
    let polar = format_degrees(config.polar_degrees);
    format!("{azimuth}deg {polar}deg auto")
}

fn format_degrees(value: f64) -> String {
    if !value.is_finite() {
        return "0".into();
    }
    // + 0.0 folds -0 into 0
    let rounded = (value * 100.0).round() / 100.0 + 0.0;
    format!("{rounded}")
}

pub struct RevealController<L, S, M: SceneModel> {
    config: RevealConfig,
    layout: L,
    surface: S,
    session: Option<RevealSession<M>>,
    bounds: Option<SectionBounds>,
    bounds_stale: bool,
    frame_pending: bool,
    progress: f64,
    phase: RevealPhase,
}

impl<L: PageLayout, S: ViewerSurface, M: SceneModel> RevealController<L, S, M> {
    pub fn new(config: RevealConfig, layout: L, surface: S) -> Self {
        Self {
            config,
            layout,
            surface,
            session: None,
            bounds: None,
            bounds_stale: true,
            frame_pending: false,
            progress: 0.0,
            phase: RevealPhase::Unloaded,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn session(&self) -> Option<&RevealSession<M>> {
        self.session.as_ref()
    }

    pub(crate) fn surface(&self) -> &S {
        &self.surface
    }

    pub(crate) fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }

    /// Captures `model`'s materials. Ignores `None`, models without meshes
    /// and the scene that is already captured.
    pub fn on_model_loaded(&mut self, model: Option<M>) -> FrameRequest {
        let Some(model) = model else {
            log::debug!("load notification without a model");
            return FrameRequest::Skip;
        };
        let identity = model.identity();
        let meshes = model.meshes();
        if self.session.as_ref().is_some_and(|s| s.is_same_load(&identity, &meshes)) {
            log::debug!("{identity} already captured");
            return FrameRequest::Skip;
        }
        if meshes.is_empty() {
            log::debug!("{identity} has no meshes");
            return FrameRequest::Skip;
        }

        match RevealSession::capture(model) {
            Some(session) => {
                self.unload();
                log::info!("captured {} meshes of {identity}", session.meshes.len());
                self.session = Some(session);
                self.request_frame()
            }
            None => {
                log::warn!("{identity}: no mesh with usable materials");
                FrameRequest::Skip
            }
        }
    }

    /// Restores the captured model and forgets it.
    pub fn unload(&mut self) -> Option<M> {
        let session = self.session.take()?;
        log::debug!("releasing {}", session.identity);
        self.phase = RevealPhase::Unloaded;
        Some(session.teardown())
    }

    /// Coalesces bursts of events into one recomputation per frame.
    pub fn on_scroll_or_resize(&mut self, event: ViewportEvent) -> FrameRequest {
        if event == ViewportEvent::Resize {
            self.bounds_stale = true;
        }
        self.request_frame()
    }

    fn request_frame(&mut self) -> FrameRequest {
        if self.frame_pending {
            return FrameRequest::Skip;
        }
        self.frame_pending = true;
        FrameRequest::Schedule
    }

    /// Runs the deferred recomputation against the latest scroll offset.
    pub fn on_animation_frame(&mut self) {
        self.frame_pending = false;
        // A hidden section measures 0 high; keep measuring until it is laid out.
        let unmeasured = self.bounds.is_none_or(|b| b.height <= 0.0);
        if self.bounds_stale || unmeasured {
            self.bounds = self.layout.section_bounds();
            self.bounds_stale = false;
        }
        let bounds = self.bounds.unwrap_or_default();
        let scroll = self.layout.scroll_offset();
        let progress = compute_progress_with(scroll, bounds, self.config.reveal_fraction);

        self.update_camera_orbit(bounds.scroll_within(scroll));
        self.apply_reveal(progress);
        self.publish_state();
    }

    /// Applies the look for `progress` to every captured mesh.
    /// No-op until a model is captured.
    pub fn apply_reveal(&mut self, progress: f64) {
        self.progress = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 0.0 };
        let Some(session) = self.session.as_mut() else {
            self.phase = RevealPhase::Unloaded;
            return;
        };
        let mode = RevealMode::for_progress(self.progress, &self.config);
        let phase = mode.phase();
        if phase != self.phase {
            log::debug!("reveal {:?} -> {:?} at {:.3}", self.phase, phase, self.progress);
            self.phase = phase;
        }
        session.apply(mode, &self.config);
    }

    pub fn update_camera_orbit(&mut self, scroll_within: f64) {
        let orbit = camera_orbit(scroll_within, &self.config);
        if let Err(e) = self.surface.set_attribute(ATTR_CAMERA_ORBIT, &orbit) {
            log::warn!("could not set camera orbit: {e:#}");
        }
    }

    fn publish_state(&mut self) {
        let skeleton = match self.phase {
            RevealPhase::Skeleton => self.surface.set_attribute(ATTR_SKELETON_MODE, ""),
            _ => self.surface.remove_attribute(ATTR_SKELETON_MODE),
        };
        let progress = self
            .surface
            .set_attribute(ATTR_REVEAL_PROGRESS, &format!("{:.3}", self.progress));
        if let Err(e) = skeleton.and(progress) {
            log::warn!("could not publish reveal state: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::testing::{FakeLayout, FakeModel, FakeSurface};

    type Controller = RevealController<FakeLayout, FakeSurface, FakeModel>;

    fn controller(scroll: f64) -> Controller {
        let layout = FakeLayout { scroll, section: Some(SectionBounds::new(1000.0, 800.0)) };
        RevealController::new(RevealConfig::default(), layout, FakeSurface::default())
    }

    fn loaded(scroll: f64, layout: &[usize]) -> Controller {
        let mut c = controller(scroll);
        assert_eq!(c.on_model_loaded(Some(FakeModel::new("cake.glb", layout))), FrameRequest::Schedule);
        c.on_animation_frame();
        c
    }

    fn model(c: &Controller) -> &FakeModel {
        c.session().unwrap().model()
    }

    fn orbit(c: &Controller) -> &str {
        &c.surface().attributes[ATTR_CAMERA_ORBIT]
    }

    #[test]
    fn test_mode_thresholds() {
        let config = RevealConfig::default();
        assert_eq!(RevealMode::for_progress(0.0, &config), RevealMode::Skeleton);
        assert_eq!(RevealMode::for_progress(0.049, &config), RevealMode::Skeleton);
        match RevealMode::for_progress(0.05, &config) {
            RevealMode::Blend { opacity, overlay: Some(overlay) } => {
                assert!((opacity - 0.05).abs() < 1e-6);
                assert!((overlay - 0.475).abs() < 1e-6);
            }
            other => panic!("expected blend, got {other:?}"),
        }
        assert_eq!(
            RevealMode::for_progress(0.5, &config),
            RevealMode::Blend { opacity: 0.5, overlay: Some(0.25) }
        );
        // overlay (1 - 0.85) * 0.5 is under the cutoff
        assert_eq!(
            RevealMode::for_progress(0.85, &config),
            RevealMode::Blend { opacity: 0.85, overlay: None }
        );
        assert_eq!(RevealMode::for_progress(1.0, &config), RevealMode::Solid);
        assert_eq!(RevealMode::for_progress(f64::NAN, &config), RevealMode::Skeleton);
    }

    #[test]
    fn test_camera_orbit_format() {
        let config = RevealConfig::default();
        assert_eq!(camera_orbit(0.0, &config), "0deg 75deg auto");
        assert_eq!(camera_orbit(280.0, &config), "84deg 75deg auto");
        assert_eq!(camera_orbit(-40.0, &config), "0deg 75deg auto");
        assert_eq!(camera_orbit(1.0, &config), "0.3deg 75deg auto");
    }

    #[test]
    fn test_section_start_is_skeleton() {
        let c = loaded(1000.0, &[1, 2]);
        assert_eq!(c.phase(), RevealPhase::Skeleton);
        assert_eq!(c.progress(), 0.0);
        assert_eq!(orbit(&c), "0deg 75deg auto");
        assert_eq!(c.surface().attributes[ATTR_SKELETON_MODE], "");
        assert_eq!(c.surface().attributes[ATTR_REVEAL_PROGRESS], "0.000");

        let m = model(&c);
        for mesh in 0..2 {
            for material in m.assigned(mesh) {
                assert!(material.wireframe);
                assert_eq!(material.color, [0.0, 0.0, 0.0]);
                assert_eq!(material.blend, BlendState::OPAQUE);
            }
            assert!(m.overlay(mesh).is_none());
        }
        assert_eq!(m.assigned(1).len(), 2);
    }

    #[test]
    fn test_midway_blends_with_overlay() {
        let c = loaded(1280.0, &[1, 2]);
        assert_eq!(c.phase(), RevealPhase::Blending);
        assert_eq!(orbit(&c), "84deg 75deg auto");
        assert!(!c.surface().attributes.contains_key(ATTR_SKELETON_MODE));
        assert_eq!(c.surface().attributes[ATTR_REVEAL_PROGRESS], "0.500");

        let m = model(&c);
        for mesh in 0..2 {
            for material in m.assigned(mesh) {
                assert!(!material.wireframe);
                assert_eq!(material.blend, BlendState::fading(0.5));
            }
            let overlay = m.overlay(mesh).unwrap();
            assert!(overlay.wireframe);
            assert_eq!(overlay.blend.opacity, 0.25);
        }
    }

    #[test]
    fn test_past_range_is_fully_revealed() {
        let mut c = loaded(1280.0, &[1, 2]);
        c.layout_mut().scroll = 1800.0;
        assert_eq!(c.on_scroll_or_resize(ViewportEvent::Scroll), FrameRequest::Schedule);
        c.on_animation_frame();

        assert_eq!(c.phase(), RevealPhase::Full);
        assert_eq!(c.progress(), 1.0);
        assert_eq!(orbit(&c), "240deg 75deg auto");
        let m = model(&c);
        for mesh in 0..2 {
            for material in m.assigned(mesh) {
                assert!(!material.wireframe);
                assert_eq!(material.blend, BlendState::OPAQUE);
            }
            assert!(m.overlay(mesh).is_none());
        }
        assert_eq!(m.overlays_attached, 2);
        assert_eq!(m.overlays_detached, 2);
    }

    #[test]
    fn test_overlay_dropped_below_cutoff() {
        let mut c = loaded(1280.0, &[1]);
        c.apply_reveal(0.85);
        assert_eq!(c.phase(), RevealPhase::Blending);
        let m = model(&c);
        assert!(m.overlay(0).is_none());
        assert_eq!(m.assigned(0)[0].blend, BlendState::fading(0.85));
        assert!(!c.session().unwrap().meshes()[0].has_overlay());
    }

    #[test]
    fn test_overlay_reused_across_frames() {
        let mut c = loaded(1280.0, &[1]);
        c.apply_reveal(0.3);
        c.apply_reveal(0.6);
        let m = model(&c);
        assert_eq!(m.overlays_attached, 1);
        assert!((m.overlay(0).unwrap().blend.opacity - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_apply_reveal_is_idempotent() {
        for p in [0.0, 0.02, 0.3, 0.7, 0.95, 1.0] {
            let mut c = loaded(1000.0, &[1, 3]);
            c.apply_reveal(p);
            let once = model(&c).snapshot();
            c.apply_reveal(p);
            assert_eq!(model(&c).snapshot(), once, "progress {p}");
        }
    }

    #[test]
    fn test_scrolling_back_returns_to_skeleton() {
        let mut c = loaded(1280.0, &[2]);
        c.apply_reveal(0.0);
        assert_eq!(c.phase(), RevealPhase::Skeleton);
        let m = model(&c);
        assert!(m.assigned(0).iter().all(|mat| mat.wireframe));
        assert!(m.overlay(0).is_none());
        assert!(c.session().unwrap().meshes()[0].is_multi_material());
    }

    #[test]
    fn test_unloaded_scroll_is_noop() {
        let mut c = controller(1280.0);
        assert_eq!(c.on_scroll_or_resize(ViewportEvent::Scroll), FrameRequest::Schedule);
        c.on_animation_frame();
        assert_eq!(c.phase(), RevealPhase::Unloaded);
        assert!(c.session().is_none());
        assert!(!c.surface().attributes.contains_key(ATTR_SKELETON_MODE));
        c.apply_reveal(0.5);
        assert_eq!(c.phase(), RevealPhase::Unloaded);
    }

    #[test]
    fn test_events_coalesce_per_frame() {
        let mut c = controller(1000.0);
        assert_eq!(c.on_scroll_or_resize(ViewportEvent::Scroll), FrameRequest::Schedule);
        assert_eq!(c.on_scroll_or_resize(ViewportEvent::Scroll), FrameRequest::Skip);
        assert_eq!(c.on_scroll_or_resize(ViewportEvent::Resize), FrameRequest::Skip);
        c.on_animation_frame();
        assert_eq!(c.on_scroll_or_resize(ViewportEvent::Scroll), FrameRequest::Schedule);
    }

    #[test]
    fn test_bounds_refresh_only_on_resize() {
        let mut c = loaded(1280.0, &[1]);
        c.layout_mut().section = Some(SectionBounds::new(0.0, 800.0));
        let _ = c.on_scroll_or_resize(ViewportEvent::Scroll);
        c.on_animation_frame();
        assert_eq!(c.phase(), RevealPhase::Blending);

        let _ = c.on_scroll_or_resize(ViewportEvent::Resize);
        c.on_animation_frame();
        assert_eq!(c.phase(), RevealPhase::Full);
    }

    #[test]
    fn test_hidden_section_stays_skeleton() {
        let mut c = loaded(1000.0, &[1]);
        c.layout_mut().section = Some(SectionBounds::new(1000.0, 0.0));
        c.layout_mut().scroll = 99_999.0;
        let _ = c.on_scroll_or_resize(ViewportEvent::Resize);
        c.on_animation_frame();
        assert_eq!(c.progress(), 0.0);
        assert_eq!(c.phase(), RevealPhase::Skeleton);
    }

    #[test]
    fn test_malformed_mesh_is_skipped() {
        let c = loaded(1280.0, &[1, 0, 2]);
        let session = c.session().unwrap();
        assert_eq!(session.meshes().len(), 2);
        let m = model(&c);
        assert!(m.overlay(0).is_some());
        assert!(m.overlay(1).is_none());
        assert!(m.overlay(2).is_some());
    }

    #[test]
    fn test_ignores_missing_empty_and_repeated_models() {
        let mut c = loaded(1000.0, &[1]);
        assert_eq!(c.on_model_loaded(None), FrameRequest::Skip);
        assert_eq!(c.on_model_loaded(Some(FakeModel::new("empty.glb", &[]))), FrameRequest::Skip);
        assert_eq!(c.on_model_loaded(Some(FakeModel::new("broken.glb", &[0, 0]))), FrameRequest::Skip);
        let same = c.session().unwrap().model().clone();
        assert_eq!(c.on_model_loaded(Some(same)), FrameRequest::Skip);
        assert_eq!(c.session().unwrap().identity(), "cake.glb");
        assert_eq!(c.session().unwrap().meshes().len(), 1);
    }

    #[test]
    fn test_reload_of_same_source_is_recaptured() {
        let mut c = loaded(1280.0, &[1]);
        let reloaded = FakeModel::new("cake.glb", &[1, 1]);
        assert_eq!(c.on_model_loaded(Some(reloaded)), FrameRequest::Schedule);
        c.on_animation_frame();
        let session = c.session().unwrap();
        assert_eq!(session.identity(), "cake.glb");
        assert_eq!(session.meshes().len(), 2);
        assert!(model(&c).overlay(1).is_some());
    }

    #[test]
    fn test_new_model_replaces_session() {
        let mut c = loaded(1280.0, &[1]);
        assert_eq!(c.on_model_loaded(Some(FakeModel::new("tart.glb", &[1, 1, 1]))), FrameRequest::Schedule);
        let session = c.session().unwrap();
        assert_eq!(session.identity(), "tart.glb");
        assert_eq!(session.meshes().len(), 3);
        assert_eq!(c.phase(), RevealPhase::Unloaded);
        c.on_animation_frame();
        assert_eq!(c.phase(), RevealPhase::Blending);
    }

    #[test]
    fn test_unload_restores_original_look() {
        let mut c = loaded(1280.0, &[1, 2]);
        let m = c.unload().unwrap();
        for mesh in 0..2 {
            for material in m.assigned(mesh) {
                assert!(!material.wireframe);
                assert_eq!(material.blend, BlendState::OPAQUE);
            }
            assert!(m.overlay(mesh).is_none());
        }
        assert_eq!(c.phase(), RevealPhase::Unloaded);
        assert!(c.unload().is_none());
    }

    #[test]
    fn test_full_reveal_forces_opaque() {
        let see_through = BlendState { opacity: 0.6, transparent: true, depth_write: false };
        let mut c = controller(1800.0);
        let glass = FakeModel::new("glass.glb", &[1, 2]).with_blend(see_through);
        assert_eq!(c.on_model_loaded(Some(glass)), FrameRequest::Schedule);
        c.on_animation_frame();
        assert_eq!(c.phase(), RevealPhase::Full);
        for mesh in 0..2 {
            for material in model(&c).assigned(mesh) {
                assert_eq!(material.blend, BlendState::OPAQUE);
            }
        }

        // unloading puts the authored transparency back
        let m = c.unload().unwrap();
        for mesh in 0..2 {
            for material in m.assigned(mesh) {
                assert_eq!(material.blend, see_through);
            }
        }
    }

    #[test]
    fn test_unwritable_mesh_does_not_block_others() {
        let mut c = controller(1280.0);
        let mut cake = FakeModel::new("cake.glb", &[1, 1, 2]);
        cake.rejects_assign.insert(0);
        assert_eq!(c.on_model_loaded(Some(cake)), FrameRequest::Schedule);
        c.on_animation_frame();
        assert_eq!(c.phase(), RevealPhase::Blending);

        let m = model(&c);
        assert_eq!(m.assigned(0)[0].blend, BlendState::OPAQUE);
        assert!(m.overlay(0).is_none());
        for mesh in 1..3 {
            for material in m.assigned(mesh) {
                assert_eq!(material.blend, BlendState::fading(0.5));
            }
            assert_eq!(m.overlay(mesh).unwrap().blend.opacity, 0.25);
        }
    }

    #[test]
    fn test_hidden_section_measured_again_once_laid_out() {
        let mut c = loaded(1280.0, &[1]);
        c.layout_mut().section = Some(SectionBounds::new(1000.0, 0.0));
        let _ = c.on_scroll_or_resize(ViewportEvent::Resize);
        c.on_animation_frame();
        assert_eq!(c.phase(), RevealPhase::Skeleton);

        c.layout_mut().section = Some(SectionBounds::new(1000.0, 800.0));
        assert_eq!(c.on_scroll_or_resize(ViewportEvent::Scroll), FrameRequest::Schedule);
        c.on_animation_frame();
        assert_eq!(c.phase(), RevealPhase::Blending);
    }

    #[test]
    fn test_unload_disposes_skeleton_materials() {
        let mut c = loaded(1000.0, &[1, 2]);
        assert_eq!(c.phase(), RevealPhase::Skeleton);
        let m = c.unload().unwrap();
        assert_eq!(m.disposed, 2);
    }
}

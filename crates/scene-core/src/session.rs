//! The scene session: one context object owning every piece of mutable
//! interaction state. Input handlers write into it between frames; the frame
//! loop drives it once per display refresh.

use crate::animate::{IdleAnimators, Indicator};
use crate::camera::{Camera, OrbitControls};
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::gate::LoadReport;
use crate::overlay::{OverlayController, OverlayUpdates};
use crate::picking::{Cursor, Hit, Picker};
use crate::registry::InteractionRegistry;
use crate::reveal::{LoadingGate, LoadingPhase, RevealFrame};
use crate::scene::SceneGraph;
use crate::tap::{Activation, TapFilter};

/// What the host has to apply after a frame.
#[derive(Clone, Debug, Default)]
pub struct FrameOutput {
    pub cursor: Cursor,
    pub overlays: OverlayUpdates,
    pub reveal: Option<RevealFrame>,
    /// 0 when the indicator is hidden.
    pub indicator_opacity: f32,
}

pub struct SceneSession {
    config: SceneConfig,
    scene: SceneGraph,
    registry: Option<InteractionRegistry>,
    idle: IdleAnimators,
    camera: Camera,
    controls: OrbitControls,
    picker: Picker,
    cursor: Cursor,
    overlays: OverlayController,
    gate: LoadingGate,
    taps: TapFilter,
    indicator: Indicator,
}

impl SceneSession {
    pub fn new(config: SceneConfig, aspect: f32) -> Self {
        let camera = config.camera(aspect);
        let controls = config.orbit_controls();
        let overlays = OverlayController::with_duration(config.fade_duration_sec);
        let indicator = Indicator::new(
            config.indicator_position,
            config.indicator_size,
            config.pulse,
        );
        Self {
            config,
            scene: SceneGraph::new(),
            registry: None,
            idle: IdleAnimators::default(),
            camera,
            controls,
            picker: Picker::new(),
            cursor: Cursor::Default,
            overlays,
            gate: LoadingGate::new(),
            taps: TapFilter::new(),
            indicator,
        }
    }

    pub fn register_modal(&mut self, name: impl Into<String>) {
        self.overlays.register(name);
    }

    /// Install the loaded scene and classify its nodes. Allowed once.
    pub fn install_scene(&mut self, scene: SceneGraph) -> Result<(), SceneError> {
        if self.registry.is_some() {
            return Err(SceneError::AlreadyInstalled);
        }
        let registry = InteractionRegistry::classify(&scene, &self.config.tags);
        self.idle = IdleAnimators::new(&scene, registry.idle_nodes());
        self.scene = scene;
        self.registry = Some(registry);
        Ok(())
    }

    /// Asset gate resolved. Returns true when the entry affordance should unlock.
    pub fn mark_ready(&mut self, report: &LoadReport) -> bool {
        for (label, err) in report.failures() {
            log::warn!("[session] continuing without {}: {}", label, err);
        }
        self.gate.mark_ready()
    }

    // ---------------- input (between frames) ----------------

    pub fn update_pointer(&mut self, x: f32, y: f32) {
        self.picker.update_pointer(x, y);
    }

    /// A real mouse moved; re-arms clicks after a touch.
    pub fn mouse_moved(&mut self) {
        self.taps.pointer_moved();
    }

    pub fn rotate_view(&mut self, dx_px: f32, dy_px: f32, viewport_height_px: f32) {
        self.controls.rotate(dx_px, dy_px, viewport_height_px);
    }

    pub fn dolly_view(&mut self, wheel_delta_y: f32) {
        self.controls.dolly(wheel_delta_y);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    /// Click or tap on the scene. Opens the modal routed from the nearest hit
    /// of the last frame and returns its name.
    pub fn activate_scene(&mut self, activation: Activation, now_sec: f64) -> Option<String> {
        if !self.taps.accept(activation) {
            return None;
        }
        let hit = *self.picker.nearest()?;
        let name = &self.scene.node(hit.node)?.name;
        let modal = self.config.route_for(name)?.to_string();
        if let Err(e) = self.overlays.show(&modal, now_sec) {
            log::warn!("[session] {}", e);
            return None;
        }
        self.indicator.hide();
        Some(modal)
    }

    /// Exit button of a modal. Returns whether `hide` was issued.
    pub fn dismiss(&mut self, modal: &str, activation: Activation, now_sec: f64) -> bool {
        if !self.taps.accept(activation) {
            return false;
        }
        match self.overlays.hide(modal, now_sec) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("[session] {}", e);
                false
            }
        }
    }

    /// Entry button on the loading screen. Returns whether the reveal started.
    pub fn enter(&mut self, activation: Activation, now_sec: f64) -> bool {
        if !self.taps.accept(activation) {
            return false;
        }
        self.gate.activate(now_sec)
    }

    // ---------------- frame ----------------

    /// One frame, in fixed order: controls, idle spin, indicator pulse,
    /// picking + cursor, fades. Presenting is left to the caller.
    pub fn frame(&mut self, now_sec: f64) -> FrameOutput {
        self.controls.update(&mut self.camera);
        self.idle.advance(&mut self.scene, self.config.idle_spin_per_frame);
        self.indicator.advance(now_sec);

        let targets = self
            .registry
            .as_ref()
            .map(InteractionRegistry::pickable_nodes)
            .unwrap_or(&[]);
        let hits = self.picker.pick_frame(&self.camera, &self.scene, targets);
        self.cursor = Cursor::from_hits(hits);

        FrameOutput {
            cursor: self.cursor,
            overlays: self.overlays.tick(now_sec),
            reveal: self.gate.tick(now_sec),
            indicator_opacity: self.indicator.opacity(),
        }
    }

    // ---------------- accessors ----------------

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn registry(&self) -> Option<&InteractionRegistry> {
        self.registry.as_ref()
    }

    pub fn idle(&self) -> &IdleAnimators {
        &self.idle
    }

    pub fn hits(&self) -> &[Hit] {
        self.picker.hits()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn overlays(&self) -> &OverlayController {
        &self.overlays
    }

    pub fn phase(&self) -> LoadingPhase {
        self.gate.phase()
    }

    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }
}

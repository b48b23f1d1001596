use crate::animate::BreathingPulse;
use crate::camera::{Camera, OrbitControls, OrbitLimits};
use crate::constants::*;
use crate::registry::TagRules;
use glam::Vec3;

/// Node-name substring that opens a modal when the node is clicked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayRoute {
    pub pattern: String,
    pub modal: String,
}

impl OverlayRoute {
    pub fn new(pattern: impl Into<String>, modal: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            modal: modal.into(),
        }
    }
}

/// Everything a session needs to know up front. `Default` is the room as
/// shipped; tests override individual fields.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub tags: TagRules,
    pub routes: Vec<OverlayRoute>,
    pub camera_start: Vec3,
    pub orbit_target: Vec3,
    pub fov_deg: f32,
    pub znear: f32,
    pub zfar: f32,
    pub orbit_limits: OrbitLimits,
    pub orbit_damping: f32,
    pub zoom_step: f32,
    pub idle_spin_per_frame: f32,
    pub fade_duration_sec: f32,
    pub pulse: BreathingPulse,
    pub indicator_position: Vec3,
    pub indicator_size: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tags: TagRules::default(),
            routes: vec![OverlayRoute::new(ROUTE_ABOUT_PATTERN, MODAL_ABOUT)],
            camera_start: CAMERA_START,
            orbit_target: ORBIT_TARGET,
            fov_deg: CAMERA_FOV_DEG,
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
            orbit_limits: OrbitLimits {
                min_distance: ORBIT_MIN_DISTANCE,
                max_distance: ORBIT_MAX_DISTANCE,
                min_polar: ORBIT_MIN_POLAR,
                max_polar: ORBIT_MAX_POLAR,
                min_azimuth: ORBIT_MIN_AZIMUTH,
                max_azimuth: ORBIT_MAX_AZIMUTH,
            },
            orbit_damping: ORBIT_DAMPING,
            zoom_step: ORBIT_ZOOM_STEP,
            idle_spin_per_frame: IDLE_SPIN_PER_FRAME,
            fade_duration_sec: FADE_DURATION_SEC,
            pulse: BreathingPulse {
                period_sec: PULSE_PERIOD_SEC,
                min_opacity: PULSE_MIN_OPACITY,
                max_opacity: PULSE_MAX_OPACITY,
            },
            indicator_position: INDICATOR_POSITION,
            indicator_size: INDICATOR_SIZE,
        }
    }
}

impl SceneConfig {
    pub fn camera(&self, aspect: f32) -> Camera {
        Camera {
            eye: self.camera_start,
            target: self.orbit_target,
            up: Vec3::Y,
            aspect,
            fovy_radians: self.fov_deg.to_radians(),
            znear: self.znear,
            zfar: self.zfar,
        }
    }

    pub fn orbit_controls(&self) -> OrbitControls {
        OrbitControls::new(
            self.camera_start,
            self.orbit_target,
            self.orbit_limits,
            self.orbit_damping,
            self.zoom_step,
        )
    }

    /// First route whose pattern occurs in `node_name`.
    pub fn route_for(&self, node_name: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|r| node_name.contains(r.pattern.as_str()))
            .map(|r| r.modal.as_str())
    }
}

use glam::Vec3;
use std::f32::consts::PI;

// Shared scene tuning constants; `SceneConfig::default()` is built from these.

// Camera
pub const CAMERA_FOV_DEG: f32 = 35.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 200.0;
pub const CAMERA_START: Vec3 = Vec3::new(30.0, 9.0, 30.0);
pub const ORBIT_TARGET: Vec3 = Vec3::new(0.0, 2.0, 0.0);

// Orbit controls
pub const ORBIT_DAMPING: f32 = 0.05;
pub const ORBIT_MIN_DISTANCE: f32 = 5.0;
pub const ORBIT_MAX_DISTANCE: f32 = 45.0;
pub const ORBIT_MIN_POLAR: f32 = 0.0;
pub const ORBIT_MAX_POLAR: f32 = PI / 2.5;
pub const ORBIT_MIN_AZIMUTH: f32 = 0.0;
pub const ORBIT_MAX_AZIMUTH: f32 = PI / 2.0;
pub const ORBIT_ZOOM_STEP: f32 = 0.95; // radius scale per wheel notch

// Idle animation (radians about Y, per rendered frame)
pub const IDLE_SPIN_PER_FRAME: f32 = 0.01;

// Indicator sprite
pub const PULSE_PERIOD_SEC: f32 = 2.0;
pub const PULSE_MIN_OPACITY: f32 = 0.35;
pub const PULSE_MAX_OPACITY: f32 = 1.0;
pub const INDICATOR_POSITION: Vec3 = Vec3::new(-1.2, 5.6, -3.4);
pub const INDICATOR_SIZE: f32 = 0.8;

// Overlay fades
pub const FADE_DURATION_SEC: f32 = 0.5;

// Loading screen reveal
pub const REVEAL_SCALE_SEC: f32 = 0.3;
pub const REVEAL_SCALE_TO: f32 = 0.5;
pub const REVEAL_EXIT_SEC: f32 = 1.2;
pub const REVEAL_EXIT_TRANSLATE_VH: f32 = -200.0;
pub const REVEAL_EXIT_TILT_X_DEG: f32 = 45.0;
pub const REVEAL_EXIT_TILT_Y_DEG: f32 = -35.0;

// Node name conventions from the room model
pub const TAG_IDLE_SPIN: &str = "Minecraft_Block";
pub const TAG_PICKABLE: &str = "_Target";
pub const ROUTE_ABOUT_PATTERN: &str = "Poster";
pub const MODAL_ABOUT: &str = "about";

// Model format; the room must be exported without these
pub const UNSUPPORTED_GLTF_EXTENSIONS: &[&str] = &["KHR_draco_mesh_compression"];

// Lighting (sRGB bytes as authored)
pub const BACKGROUND_SRGB: [u8; 3] = [0xB2, 0xBB, 0xD9];
pub const AMBIENT_SRGB: [u8; 3] = [0xFF, 0xF5, 0xB6];
pub const AMBIENT_INTENSITY: f32 = 5.0;

/// Convert an sRGB byte triple to linear RGB.
#[inline]
pub fn srgb8_to_linear(rgb: [u8; 3]) -> [f32; 3] {
    rgb.map(|c| {
        let c = c as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    })
}

/// Linear ambient contribution used by the mesh shader (Lambert, irradiance / PI).
#[inline]
pub fn ambient_linear() -> [f32; 3] {
    srgb8_to_linear(AMBIENT_SRGB).map(|c| c * AMBIENT_INTENSITY / PI)
}

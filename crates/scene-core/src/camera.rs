//! Perspective camera and damped orbit controls.
//!
//! These types avoid platform APIs; the web front-end feeds pointer drags and
//! wheel notches in and reads the camera back every frame.

use crate::scene::Ray;
use glam::{Mat4, Vec2, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// World-space ray from the eye through a point in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        // glam's perspective_rh maps depth to [0, 1]; 1 is the far plane
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.eye, (far - self.eye).normalize())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitLimits {
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    pub min_azimuth: f32,
    pub max_azimuth: f32,
}

const POLAR_EPS: f32 = 1e-6;

/// Spherical orbit around `target`. Polar angle is measured from +Y, azimuth
/// from +Z towards +X. Input accumulates into deltas that `update` bleeds off
/// by the damping factor every frame.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    radius: f32,
    polar: f32,
    azimuth: f32,
    delta_polar: f32,
    delta_azimuth: f32,
    scale: f32,
    damping: f32,
    zoom_step: f32,
    limits: OrbitLimits,
}

impl OrbitControls {
    pub fn new(eye: Vec3, target: Vec3, limits: OrbitLimits, damping: f32, zoom_step: f32) -> Self {
        let offset = eye - target;
        let radius = offset.length();
        let (polar, azimuth) = if radius > 0.0 {
            (
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
                offset.x.atan2(offset.z),
            )
        } else {
            (0.0, 0.0)
        };
        Self {
            target,
            radius,
            polar,
            azimuth,
            delta_polar: 0.0,
            delta_azimuth: 0.0,
            scale: 1.0,
            damping: damping.clamp(0.0, 1.0),
            zoom_step,
            limits,
        }
    }

    /// Queue a rotation from a pointer drag; a drag of one viewport height is a full turn.
    pub fn rotate(&mut self, dx_px: f32, dy_px: f32, viewport_height_px: f32) {
        let h = viewport_height_px.max(1.0);
        self.delta_azimuth -= std::f32::consts::TAU * dx_px / h;
        self.delta_polar -= std::f32::consts::TAU * dy_px / h;
    }

    /// Negative wheel delta moves closer, positive moves away.
    pub fn dolly(&mut self, wheel_delta_y: f32) {
        if wheel_delta_y < 0.0 {
            self.scale *= self.zoom_step;
        } else if wheel_delta_y > 0.0 {
            self.scale /= self.zoom_step;
        }
    }

    /// Apply damped deltas and clamps, then move the camera.
    pub fn update(&mut self, camera: &mut Camera) {
        let l = &self.limits;
        self.azimuth += self.delta_azimuth * self.damping;
        self.polar += self.delta_polar * self.damping;
        self.azimuth = self.azimuth.clamp(l.min_azimuth, l.max_azimuth);
        self.polar = self
            .polar
            .clamp(l.min_polar, l.max_polar)
            .clamp(POLAR_EPS, std::f32::consts::PI - POLAR_EPS);
        self.radius = (self.radius * self.scale).clamp(l.min_distance, l.max_distance);
        self.scale = 1.0;
        self.delta_azimuth *= 1.0 - self.damping;
        self.delta_polar *= 1.0 - self.damping;

        camera.eye = self.target + self.offset();
        camera.target = self.target;
    }

    fn offset(&self) -> Vec3 {
        let s = self.polar.sin();
        Vec3::new(
            self.radius * s * self.azimuth.sin(),
            self.radius * self.polar.cos(),
            self.radius * s * self.azimuth.cos(),
        )
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }
}

use crate::constants::{MAX_PIXEL_RATIO, MODAL_CLASS};
use glam::Vec2;
use scene_core::picking::viewport_to_ndc;

/// Canvas bounds in CSS pixels, as reported by `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Client coordinates of a pointer or touch to normalized device coordinates.
#[inline]
pub fn client_to_ndc(client_x: f32, client_y: f32, rect: CanvasRect) -> Vec2 {
    viewport_to_ndc(client_x - rect.left, client_y - rect.top, rect.width, rect.height)
}

/// The modal name is the class that follows `modal`, e.g. `"modal about"`.
pub fn modal_name_from_classes(class_name: &str) -> Option<&str> {
    class_name.split_whitespace().find(|c| *c != MODAL_CLASS)
}

/// Only a real mouse re-arms clicks after a touch; pens and touches don't.
#[inline]
pub fn is_mouse_pointer(pointer_type: &str) -> bool {
    pointer_type == "mouse"
}

#[inline]
pub fn effective_pixel_ratio(device_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

/// Backing-store size for a canvas of the given CSS size.
#[inline]
pub fn backing_size(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> (u32, u32) {
    let r = effective_pixel_ratio(device_pixel_ratio);
    let w = (css_width * r).round() as u32;
    let h = (css_height * r).round() as u32;
    (w.max(1), h.max(1))
}


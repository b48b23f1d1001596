// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

fn rect() -> CanvasRect {
    CanvasRect {
        left: 100.0,
        top: 50.0,
        width: 800.0,
        height: 600.0,
    }
}

#[test]
fn client_coords_map_through_canvas_offset() {
    assert_eq!(client_to_ndc(100.0, 50.0, rect()), Vec2::new(-1.0, 1.0));
    assert_eq!(client_to_ndc(900.0, 650.0, rect()), Vec2::new(1.0, -1.0));
    assert_eq!(client_to_ndc(500.0, 350.0, rect()), Vec2::ZERO);
}

#[test]
fn points_inside_canvas_stay_in_ndc_range() {
    let r = rect();
    let mut x = r.left;
    while x <= r.left + r.width {
        let mut y = r.top;
        while y <= r.top + r.height {
            let n = client_to_ndc(x, y, r);
            assert!((-1.0..=1.0).contains(&n.x), "x={} -> {}", x, n.x);
            assert!((-1.0..=1.0).contains(&n.y), "y={} -> {}", y, n.y);
            y += 23.0;
        }
        x += 31.0;
    }
}

#[test]
fn collapsed_canvas_does_not_produce_nan() {
    let r = CanvasRect {
        left: 0.0,
        top: 0.0,
        width: 0.0,
        height: 0.0,
    };
    let n = client_to_ndc(0.0, 0.0, r);
    assert!(n.x.is_finite() && n.y.is_finite());
}

#[test]
fn modal_name_is_the_non_modal_class() {
    assert_eq!(modal_name_from_classes("modal about"), Some("about"));
    assert_eq!(modal_name_from_classes("about  modal"), Some("about"));
    assert_eq!(modal_name_from_classes("modal"), None);
    assert_eq!(modal_name_from_classes(""), None);
}

#[test]
fn only_mouse_rearms_clicks() {
    assert!(is_mouse_pointer("mouse"));
    assert!(!is_mouse_pointer("touch"));
    assert!(!is_mouse_pointer("pen"));
}

#[test]
fn pixel_ratio_is_capped_at_two() {
    assert_eq!(effective_pixel_ratio(1.0), 1.0);
    assert_eq!(effective_pixel_ratio(1.5), 1.5);
    assert_eq!(effective_pixel_ratio(3.0), 2.0);
    assert_eq!(effective_pixel_ratio(0.0), 1.0);
    assert_eq!(effective_pixel_ratio(f64::NAN), 1.0);
}

#[test]
fn backing_size_follows_css_size() {
    assert_eq!(backing_size(800.0, 600.0, 1.0), (800, 600));
    assert_eq!(backing_size(800.0, 600.0, 3.0), (1600, 1200));
    assert_eq!(backing_size(0.0, 0.0, 2.0), (1, 1));
}

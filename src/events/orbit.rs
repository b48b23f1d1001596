use super::InputWiring;
use crate::dom;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

#[derive(Default, Clone, Copy)]
struct DragState {
    active: bool,
    pointer_id: i32,
    last_x: f32,
    last_y: f32,
}

/// Drag to orbit, wheel to dolly. Deltas are queued on the controls and
/// applied with damping on the next frames.
pub fn wire_orbit_controls(w: &InputWiring) {
    let drag = Rc::new(RefCell::new(DragState::default()));

    let down = w.clone();
    let down_drag = drag.clone();
    dom::listen(&w.canvas, "pointerdown", move |ev: web::PointerEvent| {
        if !ev.is_primary() {
            return;
        }
        *down_drag.borrow_mut() = DragState {
            active: true,
            pointer_id: ev.pointer_id(),
            last_x: ev.client_x() as f32,
            last_y: ev.client_y() as f32,
        };
        _ = down.canvas.set_pointer_capture(ev.pointer_id());
    });

    let mv = w.clone();
    let mv_drag = drag.clone();
    dom::listen(&w.canvas, "pointermove", move |ev: web::PointerEvent| {
        let mut d = mv_drag.borrow_mut();
        if !d.active || d.pointer_id != ev.pointer_id() {
            return;
        }
        let (x, y) = (ev.client_x() as f32, ev.client_y() as f32);
        let (dx, dy) = (x - d.last_x, y - d.last_y);
        d.last_x = x;
        d.last_y = y;
        let height = mv.canvas.client_height() as f32;
        mv.session.borrow_mut().rotate_view(dx, dy, height);
    });

    for event in ["pointerup", "pointercancel"] {
        let up = w.clone();
        let up_drag = drag.clone();
        dom::listen(&w.canvas, event, move |ev: web::PointerEvent| {
            let mut d = up_drag.borrow_mut();
            if d.active && d.pointer_id == ev.pointer_id() {
                d.active = false;
                _ = up.canvas.release_pointer_capture(ev.pointer_id());
            }
        });
    }

    let wheel = w.clone();
    dom::listen_active(&w.canvas, "wheel", move |ev: web::WheelEvent| {
        ev.prevent_default();
        wheel.session.borrow_mut().dolly_view(ev.delta_y() as f32);
    });
}

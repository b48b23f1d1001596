use super::InputWiring;
use crate::dom;
use crate::input;
use scene_core::tap::Activation;
use web_sys as web;

/// Pointer position feeds picking; a real mouse move also re-arms clicks.
pub fn wire_pointer_tracking(w: &InputWiring) {
    let Some(window) = web::window() else {
        return;
    };

    let mv = w.clone();
    dom::listen(&window, "pointermove", move |ev: web::PointerEvent| {
        let ndc = input::client_to_ndc(
            ev.client_x() as f32,
            ev.client_y() as f32,
            dom::canvas_rect(&mv.canvas),
        );
        let mut session = mv.session.borrow_mut();
        session.update_pointer(ndc.x, ndc.y);
        if input::is_mouse_pointer(&ev.pointer_type()) {
            session.mouse_moved();
        }
    });

    let ts = w.clone();
    dom::listen(&window, "touchstart", move |ev: web::TouchEvent| {
        let Some(touch) = ev.touches().get(0) else {
            return;
        };
        let ndc = input::client_to_ndc(
            touch.client_x() as f32,
            touch.client_y() as f32,
            dom::canvas_rect(&ts.canvas),
        );
        ts.session.borrow_mut().update_pointer(ndc.x, ndc.y);
    });
}

/// Clicks and taps on the canvas open whatever the last frame's nearest hit routes to.
pub fn wire_scene_activation(w: &InputWiring) {
    let click = w.clone();
    dom::listen(&w.canvas, "click", move |_ev: web::MouseEvent| {
        activate(&click, Activation::Click);
    });

    let tap = w.clone();
    dom::listen(&w.canvas, "touchend", move |_ev: web::TouchEvent| {
        activate(&tap, Activation::TouchEnd);
    });
}

fn activate(w: &InputWiring, activation: Activation) {
    let now = w.clock.now_sec();
    if let Some(modal) = w.session.borrow_mut().activate_scene(activation, now) {
        log::info!("[pointer] {:?} opened {}", activation, modal);
    }
}

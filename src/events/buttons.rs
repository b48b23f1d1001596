use super::InputWiring;
use crate::constants::MODAL_EXIT_SELECTOR;
use crate::dom;
use scene_core::tap::Activation;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Each `.modal-exit-button` hides the modal it sits in.
pub fn wire_modal_exit_buttons(w: &InputWiring) {
    for (name, modal) in w.modals.iter() {
        let Ok(buttons) = modal.query_selector_all(MODAL_EXIT_SELECTOR) else {
            continue;
        };
        if buttons.length() == 0 {
            log::warn!("[buttons] modal {} has no exit button", name);
        }
        for i in 0..buttons.length() {
            let Some(target) = buttons
                .item(i)
                .and_then(|n| n.dyn_into::<web::EventTarget>().ok())
            else {
                continue;
            };
            wire_activation(&target, w, name.to_string(), dismiss);
        }
    }
}

pub fn wire_entry_button(w: &InputWiring) {
    let Some(button) = w.entry_button.clone() else {
        return;
    };
    wire_activation(&button, w, String::new(), enter);
}

fn dismiss(w: &InputWiring, modal: &str, activation: Activation) {
    let now = w.clock.now_sec();
    if w.session.borrow_mut().dismiss(modal, activation, now) {
        log::info!("[buttons] {:?} closed {}", activation, modal);
    }
}

fn enter(w: &InputWiring, _: &str, activation: Activation) {
    let now = w.clock.now_sec();
    if w.session.borrow_mut().enter(activation, now) {
        log::info!("[buttons] {:?} entered the room", activation);
    }
}

/// The same action for click and touch-end; the session's tap filter drops
/// the click a browser synthesizes after a touch.
fn wire_activation(
    target: &web::EventTarget,
    w: &InputWiring,
    key: String,
    action: fn(&InputWiring, &str, Activation),
) {
    let click = w.clone();
    let click_key = key.clone();
    dom::listen(target, "click", move |_ev: web::MouseEvent| {
        action(&click, &click_key, Activation::Click);
    });

    let tap = w.clone();
    dom::listen_active(target, "touchend", move |ev: web::TouchEvent| {
        ev.prevent_default();
        action(&tap, &key, Activation::TouchEnd);
    });
}

//! DOM listeners. Handlers only write into the session (pointer, control
//! deltas, overlay and gate requests); the frame loop does everything else.

use crate::frame::Clock;
use crate::overlay::ModalElements;
use scene_core::session::SceneSession;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

mod buttons;
mod orbit;
mod pointer;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub session: Rc<RefCell<SceneSession>>,
    pub clock: Clock,
    pub modals: ModalElements,
    pub entry_button: Option<web::HtmlElement>,
}

pub fn wire_input_handlers(w: InputWiring) {
    pointer::wire_pointer_tracking(&w);
    pointer::wire_scene_activation(&w);
    orbit::wire_orbit_controls(&w);
    buttons::wire_modal_exit_buttons(&w);
    buttons::wire_entry_button(&w);
}

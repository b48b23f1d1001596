use crate::constants::*;
use crate::dom;
use crate::input;
use scene_core::overlay::OverlayUpdate;
use scene_core::reveal::RevealFrame;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Modal containers found in the page, keyed by their modal name.
#[derive(Clone, Default)]
pub struct ModalElements {
    modals: Vec<(String, web::HtmlElement)>,
}

impl ModalElements {
    pub fn get(&self, name: &str) -> Option<&web::HtmlElement> {
        self.modals.iter().find(|(n, _)| n == name).map(|(_, el)| el)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &web::HtmlElement)> {
        self.modals.iter().map(|(n, el)| (n.as_str(), el))
    }
}

/// Collect every `.modal.<name>` container and start them hidden.
pub fn discover_modals(document: &web::Document) -> ModalElements {
    let mut modals = Vec::new();
    for el in dom::query_all(document, MODAL_SELECTOR) {
        let class_name = el.class_name();
        let Some(name) = input::modal_name_from_classes(&class_name) else {
            log::warn!("[overlay] modal without a name: class=\"{}\"", class_name);
            continue;
        };
        let Ok(html) = el.dyn_into::<web::HtmlElement>() else {
            continue;
        };
        let style = html.style();
        _ = style.set_property("display", "none");
        _ = style.set_property("opacity", "0");
        modals.push((name.to_string(), html));
    }
    log::info!("[overlay] {} modal(s) found", modals.len());
    ModalElements { modals }
}

pub fn apply(modals: &ModalElements, update: &OverlayUpdate) {
    let Some(el) = modals.get(&update.modal) else {
        return;
    };
    let style = el.style();
    _ = style.set_property("display", if update.displayed { "block" } else { "none" });
    _ = style.set_property("opacity", &format!("{:.3}", update.opacity));
}

/// Switch the entry button from its disabled "Loading..." look to active.
pub fn enable_entry_button(button: &web::HtmlElement) {
    button.set_text_content(Some(ENTRY_READY_TEXT));
    _ = button.class_list().add_1(ENTRY_READY_CLASS);
    let style = button.style();
    _ = style.set_property("cursor", "pointer");
    _ = style.set_property("background", ENTRY_READY_BACKGROUND);
    _ = style.set_property("color", ENTRY_READY_COLOR);
    _ = style.set_property("box-shadow", ENTRY_READY_SHADOW);
    _ = style.set_property("border", "none");
}

pub fn show_entry_loading(button: &web::HtmlElement) {
    button.set_text_content(Some(ENTRY_LOADING_TEXT));
}

pub fn apply_reveal(
    screen: &web::HtmlElement,
    button: Option<&web::HtmlElement>,
    frame: &RevealFrame,
) {
    if let Some(b) = button {
        _ = b
            .style()
            .set_property("transform", &format!("scale({:.3})", frame.button_scale));
    }
    if frame.finished {
        screen.remove();
        log::info!("[overlay] loading screen removed");
        return;
    }
    _ = screen.style().set_property(
        "transform",
        &format!(
            "perspective(1000px) translateY({:.2}vh) rotateX({:.2}deg) rotateY({:.2}deg)",
            frame.translate_y_vh, frame.tilt_x_deg, frame.tilt_y_deg
        ),
    );
}

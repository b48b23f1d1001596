#![cfg(target_arch = "wasm32")]
use crate::constants::*;
use scene_core::config::SceneConfig;
use scene_core::gate::AssetGate;
use scene_core::session::SceneSession;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod loader;
mod overlay;
mod render;
mod surface;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

/// Unlock the entry button once every asset load has settled.
fn watch_ready(
    gate: &AssetGate,
    session: Rc<RefCell<SceneSession>>,
    entry_button: Option<web::HtmlElement>,
) {
    let ready = gate.ready();
    spawn_local(async move {
        let report = ready.await;
        if report.failure_count() > 0 {
            log::warn!(
                "[assets] {} of {} loads failed; entering anyway",
                report.failure_count(),
                report.outcomes.len()
            );
        }
        if session.borrow_mut().mark_ready(&report) {
            if let Some(b) = &entry_button {
                overlay::enable_entry_button(b);
            }
            log::info!("[assets] entry unlocked");
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("roomfolio-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * min(dpr, 2)
    wire_canvas_resize(&canvas);

    let aspect = canvas.width() as f32 / canvas.height().max(1) as f32;
    let session = Rc::new(RefCell::new(SceneSession::new(SceneConfig::default(), aspect)));

    let modals = overlay::discover_modals(&document);
    for (name, _) in modals.iter() {
        session.borrow_mut().register_modal(name);
    }
    let loading_screen = dom::query_one(&document, LOADING_SCREEN_SELECTOR);
    let entry_button = dom::query_one(&document, LOADING_BUTTON_SELECTOR);
    if let Some(b) = &entry_button {
        overlay::show_entry_loading(b);
    }

    let clock = frame::Clock::start();
    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        session: session.clone(),
        clock,
        modals: modals.clone(),
        entry_button: entry_button.clone(),
    });

    // Asset loads run alongside GPU setup; the gate fires once both settle
    let gate = AssetGate::new();
    let pending = loader::PendingAssets::default();
    loader::spawn_asset_loads(&gate, session.clone(), pending.clone());
    watch_ready(&gate, session.clone(), entry_button.clone());

    let gpu: Option<render::GpuState> = frame::init_gpu(&canvas).await;

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        session,
        canvas,
        document,
        modals,
        loading_screen,
        entry_button,
        gpu,
        pending,
        clock,
        last_cursor: None,
        viewport: (0, 0),
    }));
    frame::start_loop(frame_ctx);

    Ok(())
}

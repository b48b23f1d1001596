use crate::dom;
use crate::loader::PendingAssets;
use crate::overlay::{self, ModalElements};
use crate::render;
use crate::surface::{self, SurfaceRecovery};
use instant::Instant;
use scene_core::picking::Cursor;
use scene_core::session::SceneSession;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Session time source shared by the frame loop and input handlers.
#[derive(Clone, Copy)]
pub struct Clock {
    started: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn now_sec(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

pub struct FrameContext<'a> {
    pub session: Rc<RefCell<SceneSession>>,
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub modals: ModalElements,
    pub loading_screen: Option<web::HtmlElement>,
    pub entry_button: Option<web::HtmlElement>,

    pub gpu: Option<render::GpuState<'a>>,
    pub pending: PendingAssets,

    pub clock: Clock,
    pub last_cursor: Option<Cursor>,
    pub viewport: (u32, u32),
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = self.clock.now_sec();
        self.upload_pending();

        let size = (self.canvas.width(), self.canvas.height());
        let out = {
            let mut session = self.session.borrow_mut();
            if size != self.viewport {
                self.viewport = size;
                session.set_viewport(size.0, size.1);
            }
            session.frame(now)
        };

        if self.last_cursor != Some(out.cursor) {
            dom::set_cursor(&self.document, out.cursor.css());
            self.last_cursor = Some(out.cursor);
        }
        for update in &out.overlays {
            overlay::apply(&self.modals, update);
        }
        if let Some(reveal) = out.reveal {
            if let Some(screen) = &self.loading_screen {
                overlay::apply_reveal(screen, self.entry_button.as_ref(), &reveal);
            }
            if reveal.finished {
                self.loading_screen = None;
            }
        }

        let mut abandon = false;
        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(size.0, size.1);
            let session = self.session.borrow();
            let indicator = session.indicator();
            let sprite = render::SpriteParams {
                position: indicator.position,
                size: indicator.size,
                opacity: out.indicator_opacity,
            };
            if let Err(e) = g.render(session.camera(), session.scene(), sprite) {
                match surface::recovery_for(&e) {
                    SurfaceRecovery::Reconfigure => {
                        log::warn!("[gpu] surface {:?}; reconfiguring", e);
                        g.reconfigure();
                    }
                    SurfaceRecovery::Skip => log::warn!("[gpu] frame skipped: {:?}", e),
                    SurfaceRecovery::Abandon => {
                        log::error!("[gpu] {:?}; rendering stopped", e);
                        abandon = true;
                    }
                }
            }
        }
        if abandon {
            self.gpu = None;
        }
    }

    /// Decoded assets arrive between frames; move them onto the GPU.
    fn upload_pending(&mut self) {
        let Some(g) = &mut self.gpu else {
            return;
        };
        let meshes: Vec<_> = self.pending.meshes.borrow_mut().drain(..).collect();
        if !meshes.is_empty() {
            for m in &meshes {
                g.upload_mesh(m);
            }
            log::info!("[gpu] {} meshes uploaded", g.mesh_count());
        }
        if let Some(sprite) = self.pending.sprite.borrow_mut().take() {
            g.upload_sprite(&sprite);
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

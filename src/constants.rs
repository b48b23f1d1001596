/// Page contract and asset locations for the web front-end.
///
/// Scene tuning (camera, fades, tags) lives in `scene_core::constants`; this
/// module only knows about the document and the files served next to it.

// DOM
pub const CANVAS_ID: &str = "experience-canvas";
pub const MODAL_SELECTOR: &str = ".modal";
pub const MODAL_CLASS: &str = "modal";
pub const MODAL_EXIT_SELECTOR: &str = ".modal-exit-button";
pub const LOADING_SCREEN_SELECTOR: &str = ".loading-screen";
pub const LOADING_BUTTON_SELECTOR: &str = ".loading-screen-button";

// Entry affordance
pub const ENTRY_LOADING_TEXT: &str = "Loading...";
pub const ENTRY_READY_TEXT: &str = "Enter!";
pub const ENTRY_READY_CLASS: &str = "ready";
pub const ENTRY_READY_BACKGROUND: &str = "#E6DEDD";
pub const ENTRY_READY_COLOR: &str = "#4A3D3B";
pub const ENTRY_READY_SHADOW: &str = "rgba(0, 0, 0, 0.24) 0px 3px 8px";

// Assets, relative to the page
pub const MODEL_URL: &str = "models/roomfolio.glb";
pub const INDICATOR_URL: &str = "images/indicator.png";

// Canvas backing store never exceeds this many device pixels per CSS pixel
pub const MAX_PIXEL_RATIO: f64 = 2.0;


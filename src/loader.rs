//! Fetches and decodes the room model and the indicator sprite.
//!
//! Both loads run as independent tasks registered with the [`AssetGate`];
//! decoded data is handed to the session (scene graph) and queued for the
//! GPU, which picks it up on the next frame.

use crate::constants::{INDICATOR_URL, MODEL_URL};
use crate::render::MeshVertex;
use glam::{Quat, Vec3};
use js_sys::{Reflect, Uint8Array};
use scene_core::gate::{AssetGate, DownloadProgress};
use scene_core::scene::{MeshGeometry, NodeId, SceneGraph, Transform};
use scene_core::session::SceneSession;
use scene_core::LoadError;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Vertex and index data of one mesh-bearing node, ready for upload.
pub struct MeshUpload {
    pub node: NodeId,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

pub struct LoadedModel {
    pub scene: SceneGraph,
    pub meshes: Vec<MeshUpload>,
}

/// Decoded RGBA8 sprite.
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decoded data waiting for the GPU. Drained by the frame loop.
#[derive(Clone, Default)]
pub struct PendingAssets {
    pub meshes: Rc<RefCell<Vec<MeshUpload>>>,
    pub sprite: Rc<RefCell<Option<SpriteImage>>>,
}

fn fetch_error(url: &str, reason: impl Into<String>) -> LoadError {
    LoadError::Fetch {
        url: url.to_string(),
        reason: reason.into(),
    }
}

fn js_error(url: &str, e: JsValue) -> LoadError {
    fetch_error(url, format!("{:?}", e))
}

/// Download `url`, logging progress as the body streams in.
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
    let window = web::window().ok_or_else(|| fetch_error(url, "no window"))?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| js_error(url, e))?;
    let resp: web::Response = resp
        .dyn_into()
        .map_err(|e| fetch_error(url, format!("not a Response: {:?}", e)))?;
    if !resp.ok() {
        return Err(fetch_error(url, format!("HTTP {}", resp.status())));
    }
    let total = resp
        .headers()
        .get("content-length")
        .ok()
        .flatten()
        .and_then(|len| len.parse::<u64>().ok());

    let bytes = match resp.body() {
        Some(body) => read_stream(url, &body, total).await?,
        None => {
            let buf = JsFuture::from(resp.array_buffer().map_err(|e| js_error(url, e))?)
                .await
                .map_err(|e| js_error(url, e))?;
            Uint8Array::new(&buf).to_vec()
        }
    };
    match total {
        Some(len) => log::info!("[assets] {} loaded: {} of {} bytes", url, bytes.len(), len),
        None => log::info!("[assets] {} loaded: {} bytes", url, bytes.len()),
    }
    Ok(bytes)
}

async fn read_stream(
    url: &str,
    body: &web::ReadableStream,
    total: Option<u64>,
) -> Result<Vec<u8>, LoadError> {
    let reader: web::ReadableStreamDefaultReader = body
        .get_reader()
        .dyn_into()
        .map_err(|e| fetch_error(url, format!("no stream reader: {:?}", e)))?;
    let mut progress = DownloadProgress::new(total);
    let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
    loop {
        let chunk = JsFuture::from(reader.read())
            .await
            .map_err(|e| js_error(url, e))?;
        let done = Reflect::get(&chunk, &JsValue::from_str("done"))
            .map_err(|e| js_error(url, e))?
            .as_bool()
            .unwrap_or(true);
        if done {
            break;
        }
        let value = Reflect::get(&chunk, &JsValue::from_str("value"))
            .map_err(|e| js_error(url, e))?;
        let part = Uint8Array::new(&value);
        bytes.extend_from_slice(&part.to_vec());
        if let Some(percent) = progress.advance(part.length() as u64) {
            log::info!("[assets] {} {}%", url, percent);
        }
    }
    Ok(bytes)
}

fn decode_error(label: &str, reason: impl ToString) -> LoadError {
    LoadError::Decode {
        label: label.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a GLB into the scene graph plus per-node GPU meshes.
pub fn decode_model(label: &str, bytes: &[u8]) -> Result<LoadedModel, LoadError> {
    let gltf::Gltf { document, blob } =
        gltf::Gltf::from_slice_without_validation(bytes).map_err(|e| decode_error(label, e))?;
    LoadError::check_required_extensions(document.extensions_required())?;
    let buffers =
        gltf::import_buffers(&document, None, blob).map_err(|e| decode_error(label, e))?;
    let gltf_scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(LoadError::EmptyModel)?;

    let mut model = LoadedModel {
        scene: SceneGraph::new(),
        meshes: Vec::new(),
    };
    for node in gltf_scene.nodes() {
        add_node(&mut model, &buffers, &node, None);
    }
    if model.meshes.is_empty() {
        return Err(LoadError::EmptyModel);
    }
    log::info!(
        "[assets] {}: {} nodes, {} meshes",
        label,
        model.scene.len(),
        model.meshes.len()
    );
    Ok(model)
}

fn add_node(
    model: &mut LoadedModel,
    buffers: &[gltf::buffer::Data],
    node: &gltf::Node,
    parent: Option<NodeId>,
) {
    let (t, r, s) = node.transform().decomposed();
    let local = Transform {
        translation: Vec3::from_array(t),
        rotation: Quat::from_array(r),
        scale: Vec3::from_array(s),
    };
    let name = node
        .name()
        .or_else(|| node.mesh().and_then(|m| m.name()))
        .unwrap_or_default();

    let mesh = node.mesh().and_then(|m| read_mesh(buffers, &m));
    let geometry = mesh.as_ref().map(|(verts, indices)| {
        let positions = verts.iter().map(|v| Vec3::from_array(v.position)).collect();
        MeshGeometry::new(positions, indices.clone())
    });
    let id = model.scene.add_node(name, parent, local, geometry);
    if let Some((vertices, indices)) = mesh {
        model.meshes.push(MeshUpload {
            node: id,
            vertices,
            indices,
        });
    }
    for child in node.children() {
        add_node(model, buffers, &child, Some(id));
    }
}

/// All triangle primitives of a mesh merged into one vertex/index list.
fn read_mesh(
    buffers: &[gltf::buffer::Data],
    mesh: &gltf::Mesh,
) -> Option<(Vec<MeshVertex>, Vec<u32>)> {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for prim in mesh.primitives() {
        if prim.mode() != gltf::mesh::Mode::Triangles {
            log::warn!("[assets] skipping non-triangle primitive in {:?}", mesh.name());
            continue;
        }
        let reader = prim.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let factor = prim.material().pbr_metallic_roughness().base_color_factor();
        let colors: Option<Vec<[f32; 4]>> =
            reader.read_colors(0).map(|c| c.into_rgba_f32().collect());
        let base = vertices.len() as u32;
        for (i, p) in positions.enumerate() {
            let c = colors
                .as_ref()
                .and_then(|cs| cs.get(i).copied())
                .unwrap_or([1.0; 4]);
            vertices.push(MeshVertex {
                position: p,
                color: [
                    factor[0] * c[0],
                    factor[1] * c[1],
                    factor[2] * c[2],
                    factor[3] * c[3],
                ],
            });
        }
        let count = vertices.len() as u32 - base;
        match reader.read_indices() {
            Some(idx) => indices.extend(idx.into_u32().map(|i| i + base)),
            None => indices.extend(base..base + count),
        }
    }
    (!indices.is_empty()).then_some((vertices, indices))
}

pub fn decode_sprite(label: &str, bytes: &[u8]) -> Result<SpriteImage, LoadError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| decode_error(label, e))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(SpriteImage {
        width,
        height,
        rgba: img.into_raw(),
    })
}

async fn load_model(
    session: &Rc<RefCell<SceneSession>>,
    pending: &PendingAssets,
) -> Result<(), LoadError> {
    let bytes = fetch_bytes(MODEL_URL).await?;
    let LoadedModel { scene, meshes } = decode_model(MODEL_URL, &bytes)?;
    session.borrow_mut().install_scene(scene)?;
    pending.meshes.borrow_mut().extend(meshes);
    Ok(())
}

async fn load_sprite(pending: &PendingAssets) -> Result<(), LoadError> {
    let bytes = fetch_bytes(INDICATOR_URL).await?;
    let sprite = decode_sprite(INDICATOR_URL, &bytes)?;
    *pending.sprite.borrow_mut() = Some(sprite);
    Ok(())
}

/// Start both loads and seal the gate; each task settles its own ticket.
pub fn spawn_asset_loads(
    gate: &AssetGate,
    session: Rc<RefCell<SceneSession>>,
    pending: PendingAssets,
) {
    let model_ticket = gate.begin(MODEL_URL);
    let sprite_ticket = gate.begin(INDICATOR_URL);
    gate.seal();

    let model_gate = gate.clone();
    let model_pending = pending.clone();
    spawn_local(async move {
        let outcome = load_model(&session, &model_pending).await;
        model_gate.settle(model_ticket, outcome);
    });

    let sprite_gate = gate.clone();
    spawn_local(async move {
        let outcome = load_sprite(&pending).await;
        sprite_gate.settle(sprite_ticket, outcome);
    });
}

//! Export serialization: binary glTF, JSON glTF, and PNG snapshot.
//!
//! All three operations read a [`SceneSnapshot`] captured from the current
//! garment graph; they never mutate customization state. The binary and JSON
//! encodings are built from the same document, so for a given snapshot they
//! describe the identical visual result.

use std::io::Cursor;

use base64::Engine;
use glam::{EulerRot, Mat4, Quat};
use shared::Rgb;

use crate::asset::{GarmentAsset, GarmentMaterial};
use crate::error::ExportError;
use crate::state::design::{DecodedImage, DesignCollection, ElementKind};
use crate::viewport::host::SnapshotPixels;
use crate::viewport::mesh::{MeshData, VERTEX_STRIDE};

/// GLB magic number: "glTF"
const GLB_MAGIC: u32 = 0x46546C67;
/// GLB version 2
const GLB_VERSION: u32 = 2;
/// JSON chunk type
const CHUNK_TYPE_JSON: u32 = 0x4E4F534A;
/// BIN chunk type
const CHUNK_TYPE_BIN: u32 = 0x004E4942;

/// glTF component types
const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;

/// glTF buffer view targets
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// glTF sampler constants: LINEAR filtering, CLAMP_TO_EDGE wrapping
const LINEAR: u32 = 9729;
const CLAMP_TO_EDGE: u32 = 33071;

/// Read-only capture of the scene rooted at the garment node. Geometry is
/// cloned so export can run off the UI thread while editing continues.
pub struct SceneSnapshot {
    pub pieces: Vec<PieceSnapshot>,
    pub target_piece_index: usize,
    pub color: Rgb,
    pub elements: Vec<ElementSnapshot>,
}

pub struct PieceSnapshot {
    pub name: String,
    pub mesh: MeshData,
    pub transform: Mat4,
}

pub struct ElementSnapshot {
    pub id: String,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub draw: ElementDrawState,
}

/// Kind-specific draw state carried into the exported graph
pub enum ElementDrawState {
    Decal {
        pixels: DecodedImage,
        file_name: String,
        scale: f32,
    },
    Label {
        text: String,
        color: Rgb,
        font_size: f32,
    },
}

impl SceneSnapshot {
    /// Capture the current garment graph. Read-only over all inputs.
    pub fn capture(
        asset: &GarmentAsset,
        material: &GarmentMaterial,
        design: &DesignCollection,
    ) -> SceneSnapshot {
        let pieces = asset
            .pieces
            .iter()
            .map(|p| PieceSnapshot {
                name: p.name.clone(),
                mesh: p.mesh.clone(),
                transform: p.transform,
            })
            .collect();

        let elements = design
            .elements()
            .iter()
            .map(|e| ElementSnapshot {
                id: e.id.clone(),
                position: e.position,
                rotation: e.rotation,
                draw: match &e.kind {
                    ElementKind::Image {
                        pixels,
                        file_name,
                        scale,
                        ..
                    } => ElementDrawState::Decal {
                        pixels: pixels.clone(),
                        file_name: file_name.clone(),
                        scale: *scale,
                    },
                    ElementKind::Text {
                        text,
                        color,
                        font_size,
                    } => ElementDrawState::Label {
                        text: text.clone(),
                        color: *color,
                        font_size: *font_size,
                    },
                },
            })
            .collect();

        SceneSnapshot {
            pieces,
            target_piece_index: asset.target_piece_index,
            color: material.color,
            elements,
        }
    }

    pub fn decal_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e.draw, ElementDrawState::Decal { .. }))
            .count()
    }
}

/// How buffer and image payloads are carried
enum Embed {
    /// BIN chunk of a GLB container
    Binary,
    /// Base64 data URIs inside the JSON document
    DataUri,
}

/// Build a complete GLB (binary glTF) payload: garment pieces, the shared
/// material at its current color, decal quads with embedded PNG images, and
/// text draw state in node extras.
pub fn build_glb(snapshot: &SceneSnapshot) -> Result<Vec<u8>, ExportError> {
    let (document, mut bin_data) = build_document(snapshot, Embed::Binary)?;

    let json_str = serde_json::to_string(&document)?;
    let mut json_bytes = json_str.into_bytes();

    // Pad JSON with spaces, BIN with zeros (GLB container rule)
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }
    while bin_data.len() % 4 != 0 {
        bin_data.push(0);
    }

    let json_chunk_length = json_bytes.len() as u32;
    let bin_chunk_length = bin_data.len() as u32;
    let total_length: u32 = 12 + 8 + json_chunk_length + 8 + bin_chunk_length;

    let mut glb = Vec::with_capacity(total_length as usize);
    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&total_length.to_le_bytes());

    glb.extend_from_slice(&json_chunk_length.to_le_bytes());
    glb.extend_from_slice(&CHUNK_TYPE_JSON.to_le_bytes());
    glb.extend_from_slice(&json_bytes);

    glb.extend_from_slice(&bin_chunk_length.to_le_bytes());
    glb.extend_from_slice(&CHUNK_TYPE_BIN.to_le_bytes());
    glb.extend_from_slice(&bin_data);

    Ok(glb)
}

/// Build the same graph as [`build_glb`] as a pretty-printed `.gltf` text
/// document with buffers and images embedded as data URIs.
pub fn build_gltf_json(snapshot: &SceneSnapshot) -> Result<String, ExportError> {
    let (document, _) = build_document(snapshot, Embed::DataUri)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Encode a framebuffer read-back as PNG. Rows arrive bottom-up from GL and
/// are flipped to image order here.
pub fn encode_snapshot_png(pixels: &SnapshotPixels) -> Result<Vec<u8>, ExportError> {
    let (w, h) = (pixels.width, pixels.height);
    let row_len = w as usize * 4;
    if w == 0 || h == 0 || pixels.rgba.len() != row_len * h as usize {
        return Err(ExportError::Png(format!(
            "bad read-back: {}x{} with {} bytes",
            w,
            h,
            pixels.rgba.len()
        )));
    }

    let mut flipped = Vec::with_capacity(pixels.rgba.len());
    for row in pixels.rgba.chunks(row_len).rev() {
        flipped.extend_from_slice(row);
    }

    let img = image::RgbaImage::from_raw(w, h, flipped)
        .ok_or_else(|| ExportError::Png("framebuffer dimensions mismatch".into()))?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| ExportError::Png(e.to_string()))?;
    Ok(out.into_inner())
}

/// Wrap PNG bytes as a `data:image/png;base64,` URI
pub fn snapshot_data_uri(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

// ── Document assembly ────────────────────────────────────────

struct BinWriter {
    data: Vec<u8>,
    views: Vec<serde_json::Value>,
}

impl BinWriter {
    fn new() -> Self {
        Self {
            data: Vec::new(),
            views: Vec::new(),
        }
    }

    /// Append a section, 4-byte aligned, and record its buffer view.
    /// Returns the view index.
    fn push_view(&mut self, bytes: &[u8], target: Option<u32>) -> usize {
        while self.data.len() % 4 != 0 {
            self.data.push(0);
        }
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);

        let mut view = serde_json::json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": bytes.len(),
        });
        if let Some(target) = target {
            view["target"] = serde_json::json!(target);
        }
        self.views.push(view);
        self.views.len() - 1
    }
}

fn build_document(
    snapshot: &SceneSnapshot,
    embed: Embed,
) -> Result<(serde_json::Value, Vec<u8>), ExportError> {
    if snapshot.pieces.is_empty() {
        return Err(ExportError::EmptyScene);
    }

    let mut bin = BinWriter::new();
    let mut accessors: Vec<serde_json::Value> = Vec::new();
    let mut meshes: Vec<serde_json::Value> = Vec::new();
    let mut nodes: Vec<serde_json::Value> = Vec::new();
    let mut materials: Vec<serde_json::Value> = Vec::new();
    let mut images: Vec<serde_json::Value> = Vec::new();
    let mut textures: Vec<serde_json::Value> = Vec::new();
    let mut scene_nodes: Vec<usize> = Vec::new();

    // Material 0: the shared garment material at its current color
    let [lr, lg, lb] = snapshot.color.to_linear();
    materials.push(serde_json::json!({
        "name": "garment",
        "doubleSided": true,
        "pbrMetallicRoughness": {
            "baseColorFactor": [lr, lg, lb, 1.0],
            "metallicFactor": 0.0,
            "roughnessFactor": 0.9
        }
    }));

    for piece in &snapshot.pieces {
        let mesh_index = push_mesh(&mut bin, &mut accessors, &mut meshes, &piece.mesh, &piece.name, 0)?;
        let mut node = serde_json::json!({
            "name": piece.name,
            "mesh": mesh_index,
        });
        if piece.transform != Mat4::IDENTITY {
            node["matrix"] = serde_json::json!(piece.transform.to_cols_array());
        }
        nodes.push(node);
        scene_nodes.push(nodes.len() - 1);
    }

    for element in &snapshot.elements {
        let quat = Quat::from_euler(
            EulerRot::XYZ,
            element.rotation[0],
            element.rotation[1],
            element.rotation[2],
        );
        let mut node = serde_json::json!({
            "name": element.id,
            "translation": element.position,
            "rotation": [quat.x, quat.y, quat.z, quat.w],
        });

        match &element.draw {
            ElementDrawState::Decal {
                pixels,
                file_name,
                scale,
            } => {
                let png = encode_decal_png(pixels)?;
                let image_index = images.len();
                match embed {
                    Embed::Binary => {
                        let view = bin.push_view(&png, None);
                        images.push(serde_json::json!({
                            "bufferView": view,
                            "mimeType": "image/png",
                            "name": file_name,
                        }));
                    }
                    Embed::DataUri => {
                        let uri = format!(
                            "data:image/png;base64,{}",
                            base64::engine::general_purpose::STANDARD.encode(&png)
                        );
                        images.push(serde_json::json!({
                            "uri": uri,
                            "name": file_name,
                        }));
                    }
                }
                textures.push(serde_json::json!({
                    "sampler": 0,
                    "source": image_index,
                }));

                let material_index = materials.len();
                materials.push(serde_json::json!({
                    "name": format!("decal:{file_name}"),
                    "doubleSided": true,
                    "alphaMode": "BLEND",
                    "pbrMetallicRoughness": {
                        "baseColorTexture": { "index": image_index },
                        "metallicFactor": 0.0,
                        "roughnessFactor": 0.9
                    }
                }));

                let quad = decal_quad();
                let mesh_index = push_mesh(
                    &mut bin,
                    &mut accessors,
                    &mut meshes,
                    &quad,
                    &format!("decal:{}", element.id),
                    material_index,
                )?;
                node["mesh"] = serde_json::json!(mesh_index);
                node["scale"] = serde_json::json!([scale, scale, scale]);
                node["extras"] = serde_json::json!({
                    "kind": "image",
                    "file_name": file_name,
                    "scale": scale,
                });
            }
            ElementDrawState::Label {
                text,
                color,
                font_size,
            } => {
                node["extras"] = serde_json::json!({
                    "kind": "text",
                    "text": text,
                    "color": color.to_hex(),
                    "font_size": font_size,
                });
            }
        }

        nodes.push(node);
        scene_nodes.push(nodes.len() - 1);
    }

    // Final alignment so the BIN chunk length is exact
    while bin.data.len() % 4 != 0 {
        bin.data.push(0);
    }

    let buffer = match embed {
        Embed::Binary => serde_json::json!({ "byteLength": bin.data.len() }),
        Embed::DataUri => serde_json::json!({
            "byteLength": bin.data.len(),
            "uri": format!(
                "data:application/octet-stream;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(&bin.data)
            ),
        }),
    };

    let mut document = serde_json::json!({
        "asset": {
            "version": "2.0",
            "generator": "teelab v0.1"
        },
        "scene": 0,
        "scenes": [{
            "name": "garment",
            "nodes": scene_nodes
        }],
        "nodes": nodes,
        "meshes": meshes,
        "accessors": accessors,
        "bufferViews": bin.views,
        "buffers": [buffer],
        "materials": materials,
    });

    // Empty arrays are not valid glTF; only emit these when decals exist
    if !images.is_empty() {
        document["images"] = serde_json::json!(images);
        document["textures"] = serde_json::json!(textures);
        document["samplers"] = serde_json::json!([{
            "magFilter": LINEAR,
            "minFilter": LINEAR,
            "wrapS": CLAMP_TO_EDGE,
            "wrapT": CLAMP_TO_EDGE,
        }]);
    }

    let bin_data = match embed {
        Embed::Binary => bin.data,
        Embed::DataUri => Vec::new(),
    };
    Ok((document, bin_data))
}

/// De-interleave a mesh into glTF buffer views + accessors and record the
/// mesh entry. Returns the mesh index.
fn push_mesh(
    bin: &mut BinWriter,
    accessors: &mut Vec<serde_json::Value>,
    meshes: &mut Vec<serde_json::Value>,
    mesh: &MeshData,
    name: &str,
    material_index: usize,
) -> Result<usize, ExportError> {
    let vertex_count = mesh.vertex_count();
    if vertex_count == 0 || mesh.indices.is_empty() {
        return Err(ExportError::EmptyScene);
    }

    let mut positions: Vec<f32> = Vec::with_capacity(vertex_count * 3);
    let mut normals: Vec<f32> = Vec::with_capacity(vertex_count * 3);
    let mut tex_coords: Vec<f32> = Vec::with_capacity(vertex_count * 2);
    let mut pos_min = [f32::MAX; 3];
    let mut pos_max = [f32::MIN; 3];

    for v in 0..vertex_count {
        let base = v * VERTEX_STRIDE;
        let p = &mesh.vertices[base..base + 3];
        positions.extend_from_slice(p);
        normals.extend_from_slice(&mesh.vertices[base + 3..base + 6]);
        tex_coords.extend_from_slice(&mesh.vertices[base + 6..base + 8]);
        for i in 0..3 {
            pos_min[i] = pos_min[i].min(p[i]);
            pos_max[i] = pos_max[i].max(p[i]);
        }
    }

    let pos_view = bin.push_view(&floats_to_bytes(&positions), Some(ARRAY_BUFFER));
    let pos_accessor = accessors.len();
    accessors.push(serde_json::json!({
        "bufferView": pos_view,
        "componentType": FLOAT,
        "count": vertex_count,
        "type": "VEC3",
        "min": pos_min,
        "max": pos_max,
    }));

    let norm_view = bin.push_view(&floats_to_bytes(&normals), Some(ARRAY_BUFFER));
    let norm_accessor = accessors.len();
    accessors.push(serde_json::json!({
        "bufferView": norm_view,
        "componentType": FLOAT,
        "count": vertex_count,
        "type": "VEC3",
    }));

    let uv_view = bin.push_view(&floats_to_bytes(&tex_coords), Some(ARRAY_BUFFER));
    let uv_accessor = accessors.len();
    accessors.push(serde_json::json!({
        "bufferView": uv_view,
        "componentType": FLOAT,
        "count": vertex_count,
        "type": "VEC2",
    }));

    let idx_view = bin.push_view(&u32s_to_bytes(&mesh.indices), Some(ELEMENT_ARRAY_BUFFER));
    let idx_accessor = accessors.len();
    accessors.push(serde_json::json!({
        "bufferView": idx_view,
        "componentType": UNSIGNED_INT,
        "count": mesh.indices.len(),
        "type": "SCALAR",
    }));

    meshes.push(serde_json::json!({
        "name": name,
        "primitives": [{
            "attributes": {
                "POSITION": pos_accessor,
                "NORMAL": norm_accessor,
                "TEXCOORD_0": uv_accessor,
            },
            "indices": idx_accessor,
            "material": material_index,
        }]
    }));
    Ok(meshes.len() - 1)
}

/// Unit quad in the XY plane facing +Z; decal transform scales and places it
fn decal_quad() -> MeshData {
    MeshData::interleave(
        &[
            [-0.5, -0.5, 0.0],
            [0.5, -0.5, 0.0],
            [0.5, 0.5, 0.0],
            [-0.5, 0.5, 0.0],
        ],
        &[[0.0, 0.0, 1.0]; 4],
        // Top-left origin texture coordinates
        &[[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
        vec![0, 1, 2, 0, 2, 3],
    )
}

fn encode_decal_png(pixels: &DecodedImage) -> Result<Vec<u8>, ExportError> {
    let img = image::RgbaImage::from_raw(pixels.width, pixels.height, pixels.rgba.to_vec())
        .ok_or_else(|| ExportError::Png("decal pixel buffer size mismatch".into()))?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| ExportError::Png(e.to_string()))?;
    Ok(out.into_inner())
}

fn floats_to_bytes(data: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(data.len() * 4);
    for &f in data {
        bytes.extend_from_slice(&f.to_le_bytes());
    }
    bytes
}

fn u32s_to_bytes(data: &[u32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(data.len() * 4);
    for &v in data {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::sync::Arc;

    fn tri(offset: f32, size: f32) -> MeshData {
        MeshData::interleave(
            &[
                [offset, 0.0, 0.0],
                [offset + size, 0.0, 0.0],
                [offset, size, 0.0],
            ],
            &[[0.0, 0.0, 1.0]; 3],
            &[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            vec![0, 1, 2],
        )
    }

    fn red_pixels() -> DecodedImage {
        let mut rgba = Vec::new();
        for _ in 0..4 {
            rgba.extend_from_slice(&[255, 0, 0, 255]);
        }
        DecodedImage {
            width: 2,
            height: 2,
            rgba: Arc::from(rgba.into_boxed_slice()),
        }
    }

    fn test_snapshot() -> SceneSnapshot {
        SceneSnapshot {
            pieces: vec![
                PieceSnapshot {
                    name: "body".into(),
                    mesh: tri(0.0, 2.0),
                    transform: Mat4::IDENTITY,
                },
                PieceSnapshot {
                    name: "sleeve".into(),
                    mesh: tri(2.0, 0.5),
                    transform: Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)),
                },
            ],
            target_piece_index: 0,
            color: Rgb { r: 200, g: 30, b: 30 },
            elements: vec![
                ElementSnapshot {
                    id: "decal-1".into(),
                    position: [0.0, 0.5, 0.4],
                    rotation: [0.0; 3],
                    draw: ElementDrawState::Decal {
                        pixels: red_pixels(),
                        file_name: "logo.png".into(),
                        scale: 0.8,
                    },
                },
                ElementSnapshot {
                    id: "label-1".into(),
                    position: [0.0, 0.2, 0.45],
                    rotation: [0.0, 0.3, 0.0],
                    draw: ElementDrawState::Label {
                        text: "hello".into(),
                        color: Rgb::BLACK,
                        font_size: 0.2,
                    },
                },
            ],
        }
    }

    fn glb_json_chunk(glb: &[u8]) -> serde_json::Value {
        assert!(glb.len() > 20);
        let json_len = u32::from_le_bytes(glb[12..16].try_into().unwrap()) as usize;
        serde_json::from_slice(&glb[20..20 + json_len]).unwrap()
    }

    #[test]
    fn glb_container_is_well_formed() {
        let glb = build_glb(&test_snapshot()).unwrap();

        assert_eq!(&glb[0..4], b"glTF");
        let version = u32::from_le_bytes(glb[4..8].try_into().unwrap());
        assert_eq!(version, 2);
        let total = u32::from_le_bytes(glb[8..12].try_into().unwrap());
        assert_eq!(total as usize, glb.len());

        let doc = glb_json_chunk(&glb);
        // 2 pieces + 1 decal quad
        assert_eq!(doc["meshes"].as_array().unwrap().len(), 3);
        // 2 pieces + 2 elements
        assert_eq!(doc["nodes"].as_array().unwrap().len(), 4);
        assert_eq!(doc["images"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn glb_parses_with_gltf_crate() {
        let glb = build_glb(&test_snapshot()).unwrap();
        let (document, buffers, images) = gltf::import_slice(&glb).unwrap();
        assert_eq!(document.meshes().len(), 3);
        assert_eq!(buffers.len(), 1);
        // The embedded decal PNG decodes back to a 2x2 image
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].width, 2);
        assert_eq!(images[0].height, 2);
    }

    #[test]
    fn cross_format_equivalence() {
        let snapshot = test_snapshot();
        let glb_doc = glb_json_chunk(&build_glb(&snapshot).unwrap());
        let json_doc: serde_json::Value =
            serde_json::from_str(&build_gltf_json(&snapshot).unwrap()).unwrap();

        for key in ["meshes", "nodes", "materials", "accessors"] {
            assert_eq!(
                glb_doc[key].as_array().unwrap().len(),
                json_doc[key].as_array().unwrap().len(),
                "{key} count differs between encodings"
            );
        }
        assert_eq!(
            glb_doc["materials"][0]["pbrMetallicRoughness"]["baseColorFactor"],
            json_doc["materials"][0]["pbrMetallicRoughness"]["baseColorFactor"],
        );
        // Element placements are identical
        assert_eq!(glb_doc["nodes"][2]["translation"], json_doc["nodes"][2]["translation"]);
        assert_eq!(glb_doc["nodes"][3]["extras"], json_doc["nodes"][3]["extras"]);
    }

    #[test]
    fn material_color_is_linearized() {
        let snapshot = test_snapshot();
        let doc = glb_json_chunk(&build_glb(&snapshot).unwrap());
        let factor = doc["materials"][0]["pbrMetallicRoughness"]["baseColorFactor"]
            .as_array()
            .unwrap();
        let expected = snapshot.color.to_linear();
        for (got, want) in factor.iter().zip(expected.iter()) {
            assert!((got.as_f64().unwrap() as f32 - want).abs() < 1e-5);
        }
        assert_eq!(factor[3].as_f64().unwrap(), 1.0);
    }

    #[test]
    fn text_draw_state_in_extras() {
        let doc = glb_json_chunk(&build_glb(&test_snapshot()).unwrap());
        let label = &doc["nodes"][3];
        assert_eq!(label["extras"]["kind"], "text");
        assert_eq!(label["extras"]["text"], "hello");
        assert_eq!(label["extras"]["color"], "#000000");
        assert!(label.get("mesh").is_none());
    }

    #[test]
    fn empty_scene_is_an_error() {
        let snapshot = SceneSnapshot {
            pieces: vec![],
            target_piece_index: 0,
            color: Rgb::WHITE,
            elements: vec![],
        };
        assert!(matches!(build_glb(&snapshot), Err(ExportError::EmptyScene)));
        assert!(matches!(
            build_gltf_json(&snapshot),
            Err(ExportError::EmptyScene)
        ));
    }

    #[test]
    fn snapshot_png_flips_rows() {
        // Two rows, bottom-up: bottom red, top blue
        let pixels = SnapshotPixels {
            width: 1,
            height: 2,
            rgba: vec![255, 0, 0, 255, 0, 0, 255, 255],
        };
        let png = encode_snapshot_png(&pixels).unwrap();
        let img = image::load_from_memory(&png).unwrap().into_rgba8();
        assert_eq!(img.get_pixel(0, 0), &image::Rgba([0, 0, 255, 255]));
        assert_eq!(img.get_pixel(0, 1), &image::Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn snapshot_png_rejects_bad_dimensions() {
        let pixels = SnapshotPixels {
            width: 4,
            height: 4,
            rgba: vec![0; 8],
        };
        assert!(matches!(
            encode_snapshot_png(&pixels),
            Err(ExportError::Png(_))
        ));
    }

    #[test]
    fn data_uri_has_png_prefix() {
        let uri = snapshot_data_uri(&[1, 2, 3]);
        assert!(uri.starts_with("data:image/png;base64,"));
    }
}

//! Base garment asset loading and decomposition.
//!
//! The base model is loaded once per process and decomposed into individually
//! renderable surface pieces. Every piece references the single shared
//! `GarmentMaterial`, so a color edit is O(1) regardless of piece count.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use glam::Mat4;
use shared::Rgb;
use tracing::{debug, info};

use crate::error::AssetLoadError;
use crate::viewport::mesh::{Aabb, BoundingSphere, MeshData};

/// Garment color before the user picks anything
pub const DEFAULT_GARMENT_COLOR: Rgb = Rgb::WHITE;

/// One drawable surface piece of the decomposed garment. Geometry is a deep
/// copy of the loaded primitive and immutable for the session.
#[derive(Debug)]
pub struct MeshPiece {
    pub name: String,
    pub mesh: MeshData,
    /// Piece-local to garment-root transform
    pub transform: Mat4,
    /// Bounds of the transformed geometry
    pub aabb: Aabb,
    pub bounding_sphere: BoundingSphere,
}

/// The single shared appearance descriptor. Mutated in place on color edits,
/// never replaced or duplicated.
pub struct GarmentMaterial {
    pub color: Rgb,
}

impl Default for GarmentMaterial {
    fn default() -> Self {
        Self {
            color: DEFAULT_GARMENT_COLOR,
        }
    }
}

/// The decomposed base model: immutable for the session once loaded
#[derive(Debug)]
pub struct GarmentAsset {
    pub pieces: Vec<MeshPiece>,
    /// Piece that decals and text anchor to, per [`select_target`]
    pub target_piece_index: usize,
}

static CACHE: OnceLock<GarmentAsset> = OnceLock::new();

impl GarmentAsset {
    /// Load and decompose the base garment model. The result is cached for
    /// the process lifetime; repeated calls never re-fetch.
    pub fn prepare(path: &Path) -> Result<&'static GarmentAsset, AssetLoadError> {
        if let Some(asset) = CACHE.get() {
            return Ok(asset);
        }
        let asset = load(path)?;
        Ok(CACHE.get_or_init(|| asset))
    }

    pub fn target_piece(&self) -> &MeshPiece {
        &self.pieces[self.target_piece_index]
    }
}

fn load(path: &Path) -> Result<GarmentAsset, AssetLoadError> {
    let (document, buffers, _images) =
        gltf::import(path).map_err(|e| AssetLoadError::Import {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut pieces = Vec::new();
    for scene in document.scenes() {
        for node in scene.nodes() {
            collect_pieces(&node, Mat4::IDENTITY, &buffers, &mut pieces);
        }
    }

    if pieces.is_empty() {
        return Err(AssetLoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let target = select_target(&pieces);
    info!(
        pieces = pieces.len(),
        target = %pieces[target].name,
        "garment model ready"
    );

    Ok(GarmentAsset {
        pieces,
        target_piece_index: target,
    })
}

fn collect_pieces(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<MeshPiece>,
) {
    let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let node_name = node
            .name()
            .or_else(|| mesh.name())
            .unwrap_or("piece")
            .to_string();

        for (i, primitive) in mesh.primitives().enumerate() {
            let reader = primitive.reader(|b| Some(&buffers[b.index()]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .map(|iter| iter.collect())
                .unwrap_or_default();
            if positions.is_empty() {
                continue;
            }

            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|iter| iter.collect())
                .unwrap_or_default();
            let tex_coords: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|tc| tc.into_f32().collect())
                .unwrap_or_default();
            let indices: Vec<u32> = reader
                .read_indices()
                .map(|idx| idx.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());

            // Deep copy into our interleaved layout so later edits can never
            // touch the cached original buffers.
            let mesh_data = MeshData::interleave(&positions, &normals, &tex_coords, indices);
            let aabb = Aabb::from_mesh(&mesh_data, transform);
            let bounding_sphere = BoundingSphere::from_mesh(&mesh_data, transform, &aabb);

            let name = if mesh.primitives().len() > 1 {
                format!("{node_name}.{i}")
            } else {
                node_name.clone()
            };
            debug!(
                piece = %name,
                vertices = mesh_data.vertex_count(),
                triangles = mesh_data.triangle_count(),
                "decomposed piece"
            );

            out.push(MeshPiece {
                name,
                mesh: mesh_data,
                transform,
                aabb,
                bounding_sphere,
            });
        }
    }

    for child in node.children() {
        collect_pieces(&child, transform, buffers, out);
    }
}

/// Pick the surface decals and text anchor to: the piece with the strictly
/// greatest bounding-box volume. Ties resolve to the first occurrence in
/// traversal order, so the choice is stable across runs for the same asset.
/// The garment's main body is assumed to be the single largest region;
/// sleeves and collars make poor decal targets.
pub fn select_target(pieces: &[MeshPiece]) -> usize {
    let mut best = 0;
    let mut best_volume = f32::MIN;
    for (i, piece) in pieces.iter().enumerate() {
        let volume = piece.aabb.volume();
        if volume > best_volume {
            best = i;
            best_volume = volume;
        }
    }
    best
}

/// Default path of the bundled garment model, relative to the working
/// directory; overridable with `--model`.
pub fn default_model_path() -> PathBuf {
    PathBuf::from("assets/tshirt.glb")
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn box_piece(name: &str, size: Vec3) -> MeshPiece {
        let half = size * 0.5;
        let mesh = MeshData::interleave(
            &[
                [-half.x, -half.y, -half.z],
                [half.x, -half.y, -half.z],
                [half.x, half.y, -half.z],
                [-half.x, half.y, half.z],
            ],
            &[],
            &[],
            vec![0, 1, 2, 0, 2, 3],
        );
        let aabb = Aabb::from_mesh(&mesh, Mat4::IDENTITY);
        let bounding_sphere = BoundingSphere::from_mesh(&mesh, Mat4::IDENTITY, &aabb);
        MeshPiece {
            name: name.into(),
            mesh,
            transform: Mat4::IDENTITY,
            aabb,
            bounding_sphere,
        }
    }

    #[test]
    fn target_is_largest_volume() {
        let pieces = vec![
            box_piece("sleeve", Vec3::new(0.3, 0.3, 0.2)),
            box_piece("body", Vec3::new(1.0, 1.4, 0.5)),
            box_piece("collar", Vec3::new(0.4, 0.1, 0.4)),
        ];
        assert_eq!(select_target(&pieces), 1);

        let target_volume = pieces[1].aabb.volume();
        for piece in &pieces {
            assert!(target_volume >= piece.aabb.volume());
        }
    }

    #[test]
    fn target_selection_is_deterministic() {
        let pieces = vec![
            box_piece("a", Vec3::new(0.5, 0.5, 0.5)),
            box_piece("b", Vec3::new(1.0, 1.0, 1.0)),
        ];
        let first = select_target(&pieces);
        for _ in 0..10 {
            assert_eq!(select_target(&pieces), first);
        }
    }

    #[test]
    fn volume_tie_resolves_to_first() {
        let pieces = vec![
            box_piece("first", Vec3::ONE),
            box_piece("second", Vec3::ONE),
            box_piece("third", Vec3::ONE),
        ];
        assert_eq!(select_target(&pieces), 0);
    }

    #[test]
    fn single_piece_is_target() {
        let pieces = vec![box_piece("only", Vec3::ONE)];
        assert_eq!(select_target(&pieces), 0);
    }

    #[test]
    fn missing_model_is_load_error() {
        let err = load(Path::new("/nonexistent/garment.glb")).unwrap_err();
        assert!(matches!(err, AssetLoadError::Import { .. }));
    }
}

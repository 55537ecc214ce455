use glam::Vec3;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, u, v]
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// 8 floats per vertex: position(3) + normal(3) + texcoord(2)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

/// Floats per vertex in the interleaved buffer
pub const VERTEX_STRIDE: usize = 8;

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Position of vertex `i`
    pub fn position(&self, i: usize) -> Vec3 {
        let base = i * VERTEX_STRIDE;
        Vec3::new(
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        )
    }

    /// Build interleaved data from separate attribute streams. Normals and
    /// texcoords shorter than `positions` are padded with defaults.
    pub fn interleave(
        positions: &[[f32; 3]],
        normals: &[[f32; 3]],
        tex_coords: &[[f32; 2]],
        indices: Vec<u32>,
    ) -> MeshData {
        let mut vertices = Vec::with_capacity(positions.len() * VERTEX_STRIDE);
        for (i, p) in positions.iter().enumerate() {
            let n = normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]);
            let uv = tex_coords.get(i).copied().unwrap_or([0.0, 0.0]);
            vertices.extend_from_slice(&[p[0], p[1], p[2], n[0], n[1], n[2], uv[0], uv[1]]);
        }
        MeshData { vertices, indices }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Compute the AABB of mesh positions transformed by `transform`
    pub fn from_mesh(mesh: &MeshData, transform: glam::Mat4) -> Aabb {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for i in 0..mesh.vertex_count() {
            let p = transform.transform_point3(mesh.position(i));
            min = min.min(p);
            max = max.max(p);
        }
        if min.x > max.x {
            // Empty mesh: degenerate box at the origin
            return Aabb {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            };
        }
        Aabb { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Box volume `(maxX-minX)(maxY-minY)(maxZ-minZ)`
    pub fn volume(&self) -> f32 {
        let s = self.size();
        s.x * s.y * s.z
    }
}

/// Bounding sphere, used for surface-projection bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    /// Sphere centered on the AABB center, tight over the transformed vertices
    pub fn from_mesh(mesh: &MeshData, transform: glam::Mat4, aabb: &Aabb) -> BoundingSphere {
        let center = aabb.center();
        let mut radius_sq = 0.0_f32;
        for i in 0..mesh.vertex_count() {
            let p = transform.transform_point3(mesh.position(i));
            radius_sq = radius_sq.max(p.distance_squared(center));
        }
        BoundingSphere {
            center,
            radius: radius_sq.sqrt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    fn unit_quad() -> MeshData {
        MeshData::interleave(
            &[
                [-0.5, -0.5, 0.0],
                [0.5, -0.5, 0.0],
                [0.5, 0.5, 0.0],
                [-0.5, 0.5, 0.0],
            ],
            &[[0.0, 0.0, 1.0]; 4],
            &[[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn interleave_counts() {
        let quad = unit_quad();
        assert_eq!(quad.vertex_count(), 4);
        assert_eq!(quad.triangle_count(), 2);
        assert_eq!(quad.vertices.len(), 4 * VERTEX_STRIDE);
    }

    #[test]
    fn interleave_pads_missing_attributes() {
        let mesh = MeshData::interleave(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            &[],
            &[],
            vec![],
        );
        assert_eq!(mesh.vertex_count(), 2);
        // Default normal is +Y
        assert_eq!(&mesh.vertices[3..6], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn aabb_respects_transform() {
        let quad = unit_quad();
        let aabb = Aabb::from_mesh(&quad, Mat4::from_scale(Vec3::new(2.0, 4.0, 1.0)));
        assert_eq!(aabb.size(), Vec3::new(2.0, 4.0, 0.0));
        assert_eq!(aabb.center(), Vec3::ZERO);
    }

    #[test]
    fn aabb_volume() {
        let quad = unit_quad();
        let aabb = Aabb::from_mesh(
            &quad,
            Mat4::from_scale(Vec3::new(2.0, 3.0, 1.0)) * Mat4::from_translation(Vec3::Z),
        );
        // Flat in Z after scaling, so volume is zero
        assert_eq!(aabb.volume(), 0.0);
    }

    #[test]
    fn empty_mesh_has_degenerate_aabb() {
        let aabb = Aabb::from_mesh(&MeshData::default(), Mat4::IDENTITY);
        assert_eq!(aabb.min, Vec3::ZERO);
        assert_eq!(aabb.max, Vec3::ZERO);
    }

    #[test]
    fn bounding_sphere_covers_vertices() {
        let quad = unit_quad();
        let aabb = Aabb::from_mesh(&quad, Mat4::IDENTITY);
        let sphere = BoundingSphere::from_mesh(&quad, Mat4::IDENTITY, &aabb);
        assert!((sphere.radius - (0.5_f32 * 0.5 + 0.5 * 0.5).sqrt()).abs() < 1e-6);
        for i in 0..quad.vertex_count() {
            assert!(quad.position(i).distance(sphere.center) <= sphere.radius + 1e-6);
        }
    }
}

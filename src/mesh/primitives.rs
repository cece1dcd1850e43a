//! Closed primitive shapes for the ornaments and the topper, centered on the
//! origin with outward-facing CCW triangles

use std::f32::consts::{PI, TAU};
use crate::math::Vec3;
use super::buffer::{Mesh, Vertex};

/// Axis-aligned cube with flat face normals
pub fn box_mesh(edge: f32) -> Mesh {
    let h = edge * 0.5;
    let mut mesh = Mesh::new();

    // (normal, u, v) with u x v = normal
    let faces = [
        (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
        (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)),
        (Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0)),
        (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
        (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
        (Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
    ];

    for (normal, u, v) in faces {
        let center = normal * h;
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            .map(|(su, sv)| Vertex::new(center + u * (su * h) + v * (sv * h), normal));
        let start = mesh.add_vertices(corners);
        mesh.add_quad(start, start + 1, start + 2, start + 3);
    }

    mesh
}

/// UV sphere with smooth normals
pub fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let mut mesh = Mesh::new();

    for iy in 0..=height_segments {
        let polar = iy as f32 / height_segments as f32 * PI;
        let ring = (0..=width_segments).map(|ix| {
            let azimuth = ix as f32 / width_segments as f32 * TAU;
            let normal = Vec3::new(
                -azimuth.cos() * polar.sin(),
                polar.cos(),
                azimuth.sin() * polar.sin(),
            );
            Vertex::new(normal * radius, normal)
        });
        mesh.add_vertices(ring);
    }

    let row = width_segments + 1;
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            // Pole rows collapse to a single triangle
            if iy != 0 {
                mesh.add_triangle(a, b, d);
            }
            if iy != height_segments - 1 {
                mesh.add_triangle(b, c, d);
            }
        }
    }

    mesh
}

/// Regular octahedron with flat faces, vertices on the axes at `radius`
pub fn octahedron_mesh(radius: f32) -> Mesh {
    let px = Vec3::new(radius, 0.0, 0.0);
    let nx = Vec3::new(-radius, 0.0, 0.0);
    let py = Vec3::new(0.0, radius, 0.0);
    let ny = Vec3::new(0.0, -radius, 0.0);
    let pz = Vec3::new(0.0, 0.0, radius);
    let nz = Vec3::new(0.0, 0.0, -radius);

    let faces = [
        (px, py, pz),
        (pz, py, nx),
        (nx, py, nz),
        (nz, py, px),
        (px, pz, ny),
        (pz, nx, ny),
        (nx, nz, ny),
        (nz, px, ny),
    ];

    let mut mesh = Mesh::new();
    for (a, b, c) in faces {
        let normal = (b - a).cross(&(c - a)).normalize();
        let start = mesh.add_vertices([a, b, c].map(|p| Vertex::new(p, normal)));
        mesh.add_triangle(start, start + 1, start + 2);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every triangle faces away from the origin
    fn assert_outward(mesh: &Mesh) {
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize].position);
            let face_normal = (b - a).cross(&(c - a));
            let centroid = (a + b + c) * (1.0 / 3.0);
            assert!(face_normal.dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn test_box() {
        let mesh = box_mesh(0.25);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert!((mesh.bounding_radius() - 0.125 * 3f32.sqrt()).abs() < 1e-5);
        assert_outward(&mesh);
    }

    #[test]
    fn test_sphere() {
        let mesh = sphere_mesh(0.15, 16, 16);
        assert_eq!(mesh.vertex_count(), 17 * 17);
        // two pole fans plus full quads in between
        assert_eq!(mesh.triangle_count(), 16 * 2 + 16 * 14 * 2);
        for v in &mesh.vertices {
            assert!((v.position.length() - 0.15).abs() < 1e-5);
            assert!((v.normal.length() - 1.0).abs() < 1e-5);
        }
        assert_outward(&mesh);
    }

    #[test]
    fn test_octahedron() {
        let mesh = octahedron_mesh(0.4);
        assert_eq!(mesh.triangle_count(), 8);
        assert!((mesh.bounding_radius() - 0.4).abs() < 1e-6);
        assert_outward(&mesh);
    }
}

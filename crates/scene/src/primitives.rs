use bubbletext_common::MeshData;
use glam::Vec3;
use std::f32::consts::PI;

/// Generate a UV sphere centered on the origin.
///
/// `width_segments` slices around Y, `height_segments` stacks from pole to
/// pole. Vertices on the seam are duplicated so every stack has
/// `width_segments + 1` of them.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut mesh = MeshData::default();

    for y in 0..=hs {
        let v = y as f32 / hs as f32;
        let theta = v * PI;
        for x in 0..=ws {
            let u = x as f32 / ws as f32;
            let phi = u * 2.0 * PI;
            let normal = Vec3::new(
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            );
            mesh.push_vertex(normal * radius, normal);
        }
    }

    let row = ws + 1;
    for y in 0..hs {
        for x in 0..ws {
            let a = y * row + x + 1;
            let b = y * row + x;
            let c = (y + 1) * row + x;
            let d = (y + 1) * row + x + 1;
            // Degenerate triangles at the poles are skipped.
            if y != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if y != hs - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

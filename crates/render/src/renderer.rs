use crate::camera::OrbitCamera;
use bubbletext_materials::{MaterialId, MaterialRef, MaterialRegistry};
use bubbletext_scene::{NodeKind, SceneGraph};
use glam::{Mat4, Vec3};
use std::fmt::Write as _;

/// Camera matrices for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
}

impl RenderView {
    pub fn from_camera(camera: &OrbitCamera) -> Self {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        Self {
            eye: camera.eye(),
            target: camera.target,
            fov_degrees: camera.fov.to_degrees(),
            view,
            projection,
            view_projection: camera.view_projection(),
        }
    }
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_camera(&OrbitCamera::looking_at(Vec3::new(1.0, 1.0, 2.0), Vec3::ZERO))
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene, the material registry and a view, then
/// produces output. It may keep its own caches but never edits the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(
        &mut self,
        scene: &SceneGraph,
        materials: &MaterialRegistry,
        view: &RenderView,
    ) -> Self::Output;
}

/// Headless renderer producing a readable dump of each frame.
///
/// Used by tests and for `--verbose` diagnostics.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

fn describe_material(materials: &MaterialRegistry, id: MaterialId) -> String {
    match materials.get(id) {
        MaterialRef::Physical(m) => format!(
            "{id:?}(ior={:.2}, thickness={:.2}, iridescence={:.2})",
            m.ior, m.thickness, m.iridescence
        ),
        MaterialRef::Normal => "Normal".to_string(),
        MaterialRef::Matcap(m) => match m.texture() {
            Some(t) => format!("Matcap(#{})", t.index),
            None => "Matcap(none)".to_string(),
        },
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(
        &mut self,
        scene: &SceneGraph,
        materials: &MaterialRegistry,
        view: &RenderView,
    ) -> String {
        self.frames += 1;
        let mut out = String::new();
        let _ = writeln!(out, "=== Scene (frame={}) ===", self.frames);
        let _ = writeln!(
            out,
            "Nodes: {} Geometries: {}",
            scene.node_count(),
            scene.geometry_count()
        );
        match scene.environment() {
            Some(env) => {
                let _ = writeln!(out, "Environment: {}x{}", env.width, env.height);
            }
            None => {
                let _ = writeln!(out, "Environment: none");
            }
        }
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z, view.fov_degrees
        );

        for (id, node) in scene.nodes() {
            let p = node.transform.position;
            let (_, ry, _) = node.transform.rotation.to_euler(glam::EulerRot::XYZ);
            let what = match &node.kind {
                NodeKind::Mesh { geometry, material } => {
                    let tris = scene.geometry(*geometry).map_or(0, |g| g.triangle_count());
                    format!("mesh tris={tris} material={}", describe_material(materials, *material))
                }
                NodeKind::Bodies(group) => format!(
                    "bodies count={} material={}",
                    group.len(),
                    describe_material(materials, group.material)
                ),
            };
            let _ = writeln!(
                out,
                "  [{}] {} pos=({:.2}, {:.2}, {:.2}) rot_y={:.3} {}",
                id.short(),
                node.name,
                p.x,
                p.y,
                p.z,
                ry,
                what
            );
        }
        tracing::trace!(frame = self.frames, bytes = out.len(), "debug frame rendered");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubbletext_common::{MeshData, Transform};
    use bubbletext_scene::Node;

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = SceneGraph::new();
        let materials = MaterialRegistry::default();
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&scene, &materials, &RenderView::default());

        assert!(output.contains("frame=1"));
        assert!(output.contains("Nodes: 0"));
        assert!(output.contains("Environment: none"));
        assert_eq!(renderer.frames(), 1);
    }

    #[test]
    fn debug_renderer_lists_nodes_and_materials() {
        let mut scene = SceneGraph::new();
        let geo = scene.insert_geometry(MeshData::default());
        scene.attach(
            Node::mesh("text", geo, MaterialId::Matcap)
                .with_transform(Transform::from_position(Vec3::new(0.0, 1.5, 0.0))),
        );
        let materials = MaterialRegistry::default();
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&scene, &materials, &RenderView::default());

        assert!(output.contains("Nodes: 1 Geometries: 1"));
        assert!(output.contains("text pos=(0.00, 1.50, 0.00)"));
        assert!(output.contains("Matcap(none)"));
    }

    #[test]
    fn render_view_matches_camera() {
        let view = RenderView::default();
        assert!((view.fov_degrees - 75.0).abs() < 1e-3);
        assert_eq!(view.target, Vec3::ZERO);
        assert!((view.eye - Vec3::new(1.0, 1.0, 2.0)).length() < 1e-5);
    }
}

use crate::TextError;
use crate::geometry::{TextShape, build_text_geometry};
use crate::typeface::Typeface;
use bubbletext_common::{NodeId, Transform};
use bubbletext_materials::{MaterialId, MaterialKind, MaterialRegistry};
use bubbletext_scene::{GeometryHandle, Node, SceneGraph};
use glam::Vec3;
use std::sync::Arc;

/// Scene name of the text node.
pub const TEXT_NODE_NAME: &str = "text";

/// Height the text node is attached at. The frame loop takes over its Y
/// from the first tick on.
pub const TEXT_BASE_HEIGHT: f32 = 1.5;

/// Handles of the text mesh currently in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMesh {
    pub node: NodeId,
    pub geometry: GeometryHandle,
    pub material: MaterialId,
}

/// Owns the text content and the single text mesh built from it.
pub struct TextMeshBuilder {
    content: String,
    shape: TextShape,
    typeface: Option<Arc<dyn Typeface>>,
    current: Option<TextMesh>,
    rebuilds: u64,
}

impl TextMeshBuilder {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            shape: TextShape::LABEL,
            typeface: None,
            current: None,
            rebuilds: 0,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn current(&self) -> Option<TextMesh> {
        self.current
    }

    /// Number of meshes built so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    pub fn has_typeface(&self) -> bool {
        self.typeface.is_some()
    }

    /// Replace the content and rebuild.
    pub fn set_content(
        &mut self,
        content: impl Into<String>,
        scene: &mut SceneGraph,
        selection: MaterialKind,
    ) -> Result<bool, TextError> {
        self.content = content.into();
        self.rebuild(scene, selection)
    }

    /// The active preset changed; rebuild with the new material.
    pub fn material_changed(
        &mut self,
        scene: &mut SceneGraph,
        selection: MaterialKind,
    ) -> Result<bool, TextError> {
        self.rebuild(scene, selection)
    }

    /// Install the typeface and build the first mesh.
    pub fn font_ready(
        &mut self,
        typeface: Arc<dyn Typeface>,
        scene: &mut SceneGraph,
        selection: MaterialKind,
    ) -> Result<bool, TextError> {
        self.typeface = Some(typeface);
        self.rebuild(scene, selection)
    }

    /// Tear down the current mesh (if any) and build a new one.
    ///
    /// Returns `Ok(false)` without touching the scene while no typeface is
    /// installed. On error the old mesh is already gone and no new one is
    /// attached.
    pub fn rebuild(
        &mut self,
        scene: &mut SceneGraph,
        selection: MaterialKind,
    ) -> Result<bool, TextError> {
        let Some(typeface) = self.typeface.clone() else {
            tracing::trace!("text rebuild deferred until a typeface is loaded");
            return Ok(false);
        };

        self.clear(scene);

        let mut mesh = build_text_geometry(&self.content, typeface.as_ref(), &self.shape)?;
        mesh.center();
        let triangles = mesh.triangle_count();

        let material = MaterialRegistry::resolve(selection);
        let geometry = scene.insert_geometry(mesh);
        let node = scene.attach(
            Node::mesh(TEXT_NODE_NAME, geometry, material).with_transform(
                Transform::from_position(Vec3::new(0.0, TEXT_BASE_HEIGHT, 0.0)),
            ),
        );
        self.current = Some(TextMesh {
            node,
            geometry,
            material,
        });
        self.rebuilds += 1;
        tracing::debug!(
            rebuild = self.rebuilds,
            material = ?material,
            triangles,
            chars = self.content.chars().count(),
            "text mesh rebuilt"
        );
        Ok(true)
    }

    /// Detach the text node and release its geometry.
    pub fn clear(&mut self, scene: &mut SceneGraph) {
        if let Some(old) = self.current.take() {
            scene.detach(old.node);
            scene.release_geometry(old.geometry);
        }
    }
}

impl std::fmt::Debug for TextMeshBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextMeshBuilder")
            .field("content", &self.content)
            .field("has_typeface", &self.has_typeface())
            .field("current", &self.current)
            .field("rebuilds", &self.rebuilds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeface::PlaceholderTypeface;
    use bubbletext_scene::SceneEvent;

    fn placeholder() -> Arc<dyn Typeface> {
        Arc::new(PlaceholderTypeface)
    }

    fn text_nodes(scene: &SceneGraph) -> usize {
        scene.find_by_name(TEXT_NODE_NAME).count()
    }

    #[test]
    fn rebuild_before_font_is_a_noop() {
        let mut scene = SceneGraph::new();
        let mut builder = TextMeshBuilder::new("Anastasia");
        assert!(!builder.rebuild(&mut scene, MaterialKind::Standard).unwrap());
        assert!(!builder
            .set_content("Other", &mut scene, MaterialKind::Normal)
            .unwrap());
        assert_eq!(builder.content(), "Other");
        assert_eq!(scene.node_count(), 0);
        assert_eq!(builder.rebuild_count(), 0);
    }

    #[test]
    fn font_arrival_builds_exactly_once() {
        let mut scene = SceneGraph::new();
        let mut builder = TextMeshBuilder::new("Anastasia");
        builder.rebuild(&mut scene, MaterialKind::Standard).unwrap();
        builder
            .font_ready(placeholder(), &mut scene, MaterialKind::Standard)
            .unwrap();
        assert_eq!(builder.rebuild_count(), 1);
        assert_eq!(text_nodes(&scene), 1);

        let mesh = builder.current().unwrap();
        assert_eq!(mesh.material, MaterialId::Physical);
        let node = scene.get(mesh.node).unwrap();
        assert_eq!(node.transform.position.y, TEXT_BASE_HEIGHT);
    }

    #[test]
    fn built_geometry_is_centered() {
        let mut scene = SceneGraph::new();
        let mut builder = TextMeshBuilder::new("Anastasia");
        builder
            .font_ready(placeholder(), &mut scene, MaterialKind::Standard)
            .unwrap();
        let geo = scene.geometry(builder.current().unwrap().geometry).unwrap();
        assert!(geo.bounding_box().unwrap().center().length() < 1e-4);
    }

    #[test]
    fn repeated_edits_keep_one_mesh_and_one_geometry() {
        let mut scene = SceneGraph::new();
        let mut builder = TextMeshBuilder::new("a");
        builder
            .font_ready(placeholder(), &mut scene, MaterialKind::Standard)
            .unwrap();
        for s in ["ab", "abc", "", "Hello\nWorld", "x"] {
            builder
                .set_content(s, &mut scene, MaterialKind::Standard)
                .unwrap();
            assert_eq!(text_nodes(&scene), 1);
            assert_eq!(scene.geometry_count(), 1);
        }
        assert_eq!(builder.rebuild_count(), 6);
    }

    #[test]
    fn old_geometry_is_released_before_new_is_added() {
        let mut scene = SceneGraph::new();
        let mut builder = TextMeshBuilder::new("a");
        builder
            .font_ready(placeholder(), &mut scene, MaterialKind::Standard)
            .unwrap();
        let old = builder.current().unwrap();
        scene.drain_events();

        builder
            .material_changed(&mut scene, MaterialKind::Matcap)
            .unwrap();
        let events = scene.drain_events();
        let released = events
            .iter()
            .position(|e| *e == SceneEvent::GeometryReleased { handle: old.geometry })
            .unwrap();
        let added = events
            .iter()
            .position(|e| matches!(e, SceneEvent::GeometryAdded { .. }))
            .unwrap();
        assert!(released < added);
        assert!(scene.get(old.node).is_none());
        assert_eq!(builder.current().unwrap().material, MaterialId::Matcap);
    }

    #[test]
    fn selection_maps_to_material() {
        let mut scene = SceneGraph::new();
        let mut builder = TextMeshBuilder::new("a");
        builder
            .font_ready(placeholder(), &mut scene, MaterialKind::Normal)
            .unwrap();
        assert_eq!(builder.current().unwrap().material, MaterialId::Normal);
        builder
            .material_changed(&mut scene, MaterialKind::Standard)
            .unwrap();
        assert_eq!(builder.current().unwrap().material, MaterialId::Physical);
    }

    #[test]
    fn clear_removes_everything() {
        let mut scene = SceneGraph::new();
        let mut builder = TextMeshBuilder::new("a");
        builder
            .font_ready(placeholder(), &mut scene, MaterialKind::Standard)
            .unwrap();
        builder.clear(&mut scene);
        assert!(builder.current().is_none());
        assert_eq!(scene.node_count(), 0);
        assert_eq!(scene.geometry_count(), 0);
        // Clearing twice is harmless.
        builder.clear(&mut scene);
    }
}

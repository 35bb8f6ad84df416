use crate::decor::BodyGroup;
use bubbletext_common::{HdrImage, MeshData, NodeId, Transform};
use bubbletext_materials::MaterialId;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Handle into the scene's geometry pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle(pub u64);

/// A structural change to the scene.
///
/// The event log lets the renderer and tests observe node and geometry
/// lifetimes without diffing the whole graph.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    Attached { id: NodeId, name: String },
    Detached { id: NodeId, name: String },
    GeometryAdded { handle: GeometryHandle, triangles: usize },
    GeometryReleased { handle: GeometryHandle },
    EnvironmentInstalled { width: u32, height: u32 },
}

/// What a node draws.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A single mesh with one material.
    Mesh {
        geometry: GeometryHandle,
        material: MaterialId,
    },
    /// Many instances of one mesh, transformed by the node's transform.
    Bodies(BodyGroup),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
}

impl Node {
    pub fn mesh(name: impl Into<String>, geometry: GeometryHandle, material: MaterialId) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            kind: NodeKind::Mesh { geometry, material },
        }
    }

    pub fn bodies(name: impl Into<String>, group: BodyGroup) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            kind: NodeKind::Bodies(group),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn geometry(&self) -> GeometryHandle {
        match &self.kind {
            NodeKind::Mesh { geometry, .. } => *geometry,
            NodeKind::Bodies(group) => group.geometry,
        }
    }
}

/// Owns all renderable nodes, their geometry and the environment map.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, Node>,
    geometries: BTreeMap<GeometryHandle, Arc<MeshData>>,
    next_geometry: u64,
    environment: Option<Arc<HdrImage>>,
    environment_revision: u64,
    event_log: Vec<SceneEvent>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Read-only access to all nodes (stable order).
    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Nodes carrying the given name.
    pub fn find_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (NodeId, &'a Node)> {
        self.nodes
            .iter()
            .filter(move |(_, n)| n.name == name)
            .map(|(id, n)| (*id, n))
    }

    /// Attach a node and return its id.
    pub fn attach(&mut self, node: Node) -> NodeId {
        let id = NodeId::new();
        self.event_log.push(SceneEvent::Attached {
            id,
            name: node.name.clone(),
        });
        tracing::trace!(id = %id.short(), name = %node.name, "node attached");
        self.nodes.insert(id, node);
        id
    }

    /// Detach a node. The node's geometry stays in the pool.
    pub fn detach(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.remove(&id)?;
        self.event_log.push(SceneEvent::Detached {
            id,
            name: node.name.clone(),
        });
        tracing::trace!(id = %id.short(), name = %node.name, "node detached");
        Some(node)
    }

    /// Mutable transform access for animation. Not logged.
    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(&id).map(|n| &mut n.transform)
    }

    pub fn insert_geometry(&mut self, mesh: MeshData) -> GeometryHandle {
        let handle = GeometryHandle(self.next_geometry);
        self.next_geometry += 1;
        self.event_log.push(SceneEvent::GeometryAdded {
            handle,
            triangles: mesh.triangle_count(),
        });
        self.geometries.insert(handle, Arc::new(mesh));
        handle
    }

    /// Remove geometry from the pool. Returns `None` if it was already gone.
    pub fn release_geometry(&mut self, handle: GeometryHandle) -> Option<Arc<MeshData>> {
        let mesh = self.geometries.remove(&handle)?;
        self.event_log.push(SceneEvent::GeometryReleased { handle });
        Some(mesh)
    }

    pub fn geometry(&self, handle: GeometryHandle) -> Option<&Arc<MeshData>> {
        self.geometries.get(&handle)
    }

    pub fn geometries(&self) -> &BTreeMap<GeometryHandle, Arc<MeshData>> {
        &self.geometries
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    /// Install an environment map as both background and lighting source.
    pub fn set_environment(&mut self, image: Arc<HdrImage>) {
        self.event_log.push(SceneEvent::EnvironmentInstalled {
            width: image.width,
            height: image.height,
        });
        self.environment = Some(image);
        self.environment_revision += 1;
    }

    pub fn environment(&self) -> Option<&Arc<HdrImage>> {
        self.environment.as_ref()
    }

    /// Bumped on every environment install.
    pub fn environment_revision(&self) -> u64 {
        self.environment_revision
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SceneEvent] {
        &self.event_log
    }
}

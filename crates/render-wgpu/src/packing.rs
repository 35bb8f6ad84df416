//! CPU-side packing of scene data into GPU layouts.

use bubbletext_common::MeshData;
use bubbletext_materials::{MaterialId, MaterialRef, MaterialRegistry};
use bubbletext_scene::{GeometryHandle, NodeKind, SceneGraph};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub inv_view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct InstanceData {
    pub model: [[f32; 4]; 4],
}

impl InstanceData {
    fn from_matrix(m: Mat4) -> Self {
        Self {
            model: m.to_cols_array_2d(),
        }
    }
}

pub(crate) const MODE_PHYSICAL: u32 = 0;
pub(crate) const MODE_NORMAL: u32 = 1;
pub(crate) const MODE_MATCAP: u32 = 2;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct MaterialUniform {
    pub mode: u32,
    pub transparent: u32,
    pub _pad: [u32; 2],
    pub surface: [f32; 4],
    pub optics: [f32; 4],
    pub extra: [f32; 4],
}

impl MaterialUniform {
    pub fn from_material(material: MaterialRef<'_>) -> Self {
        let mut out = Self::zeroed();
        match material {
            MaterialRef::Physical(m) => {
                out.mode = MODE_PHYSICAL;
                out.transparent = m.transparent as u32;
                out.surface = [m.metalness, m.roughness, m.iridescence, m.iridescence_ior];
                out.optics = [
                    m.iridescence_thickness_range[0],
                    m.iridescence_thickness_range[1],
                    m.transmission,
                    m.ior,
                ];
                out.extra = [m.thickness, 0.0, 0.0, 0.0];
            }
            MaterialRef::Normal => out.mode = MODE_NORMAL,
            MaterialRef::Matcap(m) => {
                out.mode = MODE_MATCAP;
                out.extra = [0.0, m.texture().is_some() as u32 as f32, 0.0, 0.0];
            }
        }
        out
    }
}

pub(crate) fn mesh_vertices(mesh: &MeshData) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .map(|(p, n)| Vertex {
            position: *p,
            normal: *n,
        })
        .collect()
}

/// Which pipeline a draw goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    /// Single meshes: depth-written, no culling (text caps face both ways).
    Solid,
    /// Instanced translucent bodies, drawn after solids without depth writes.
    Translucent,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Draw {
    pub geometry: GeometryHandle,
    pub material: MaterialId,
    pub first_instance: u32,
    pub instance_count: u32,
    pub pass: Pass,
}

/// Flatten the scene into instance data and an ordered draw list.
pub(crate) fn build_draws(scene: &SceneGraph) -> (Vec<InstanceData>, Vec<Draw>) {
    let mut instances = Vec::new();
    let mut solids = Vec::new();
    let mut translucent = Vec::new();

    for node in scene.nodes().values() {
        let node_matrix = node.transform.matrix();
        let first_instance = instances.len() as u32;
        match &node.kind {
            NodeKind::Mesh { geometry, material } => {
                instances.push(InstanceData::from_matrix(node_matrix));
                solids.push(Draw {
                    geometry: *geometry,
                    material: *material,
                    first_instance,
                    instance_count: 1,
                    pass: Pass::Solid,
                });
            }
            NodeKind::Bodies(group) => {
                instances.extend(
                    group
                        .bodies
                        .iter()
                        .map(|b| InstanceData::from_matrix(node_matrix * b.transform.matrix())),
                );
                if !group.is_empty() {
                    translucent.push(Draw {
                        geometry: group.geometry,
                        material: group.material,
                        first_instance,
                        instance_count: group.len() as u32,
                        pass: Pass::Translucent,
                    });
                }
            }
        }
    }
    solids.extend(translucent);
    (instances, solids)
}

/// Uniforms for every registry material, in a fixed order.
///
/// `matcap_resident` is false when the matcap texture never reached the GPU;
/// the matcap uniform then reports no texture so the shader uses its flat fallback.
pub(crate) fn material_uniforms(
    materials: &MaterialRegistry,
    matcap_resident: bool,
) -> [(MaterialId, MaterialUniform); 4] {
    [MaterialId::Physical, MaterialId::Bubble, MaterialId::Normal, MaterialId::Matcap].map(|id| {
        let mut uniform = MaterialUniform::from_material(materials.get(id));
        if id == MaterialId::Matcap && !matcap_resident {
            uniform.extra[1] = 0.0;
        }
        (id, uniform)
    })
}

/// Whether a `width` x `height` texture can be created on a device whose
/// `max_texture_dimension_2d` is `max`.
pub(crate) fn fits_texture_limit(width: u32, height: u32, max: u32) -> bool {
    width > 0 && height > 0 && width <= max && height <= max
}

use glam::Vec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// CPU-side triangle mesh: positions, per-vertex normals, u32 indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        index
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        let mut iter = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Aabb { min, max })
    }

    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            *p = (Vec3::from_array(*p) + offset).to_array();
        }
    }

    /// Translate so the bounding box center sits at the origin.
    pub fn center(&mut self) {
        if let Some(bb) = self.bounding_box() {
            self.translate(-bb.center());
        }
    }
}

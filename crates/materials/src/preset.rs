use crate::selector::MaterialKind;
use bubbletext_common::TextureImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identity of a material instance owned by the registry. Scene nodes hold
/// one of these, so in-place edits to the material are visible without
/// touching the nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaterialId {
    /// The physically based text preset.
    Physical,
    /// Physically based material of the decorative spheres.
    Bubble,
    /// View-space normal shading.
    Normal,
    /// Texture lookup by view-space normal.
    Matcap,
}

/// Inclusive slider range for a tunable parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamRange {
    const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, v: f32) -> f32 {
        if v.is_nan() {
            return self.min;
        }
        v.clamp(self.min, self.max)
    }
}

/// Tunable parameters of [`PhysicalMaterial`], in panel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalParam {
    Metalness,
    Roughness,
    Iridescence,
    IridescenceIor,
    IridescenceThicknessMin,
    IridescenceThicknessMax,
    Transmission,
    Ior,
    Thickness,
}

impl PhysicalParam {
    pub const ALL: [PhysicalParam; 9] = [
        Self::Metalness,
        Self::Roughness,
        Self::Iridescence,
        Self::IridescenceIor,
        Self::IridescenceThicknessMin,
        Self::IridescenceThicknessMax,
        Self::Transmission,
        Self::Ior,
        Self::Thickness,
    ];

    pub fn range(&self) -> ParamRange {
        match self {
            Self::Metalness | Self::Roughness | Self::Iridescence | Self::Transmission => {
                ParamRange::new(0.0, 1.0, 0.001)
            }
            Self::IridescenceIor => ParamRange::new(1.0, 2.5, 0.001),
            Self::IridescenceThicknessMin | Self::IridescenceThicknessMax => {
                ParamRange::new(0.0, 1000.0, 1.0)
            }
            Self::Ior => ParamRange::new(1.0, 10.0, 0.001),
            Self::Thickness => ParamRange::new(0.0, 10.0, 0.001),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Metalness => "Metalness",
            Self::Roughness => "Roughness",
            Self::Iridescence => "Intensity",
            Self::IridescenceIor => "Film IOR",
            Self::IridescenceThicknessMin => "Film thickness from",
            Self::IridescenceThicknessMax => "Film thickness to",
            Self::Transmission => "Transmission",
            Self::Ior => "IOR",
            Self::Thickness => "Thickness",
        }
    }

    /// Parameters shown in the nested iridescence group.
    pub fn is_iridescence(&self) -> bool {
        matches!(
            self,
            Self::Iridescence
                | Self::IridescenceIor
                | Self::IridescenceThicknessMin
                | Self::IridescenceThicknessMax
        )
    }
}

/// Physically based preset with thin-film iridescence and transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalMaterial {
    pub metalness: f32,
    pub roughness: f32,
    pub transparent: bool,
    pub iridescence: f32,
    pub iridescence_ior: f32,
    /// Thin-film thickness range in nanometres.
    pub iridescence_thickness_range: [f32; 2],
    pub transmission: f32,
    pub ior: f32,
    pub thickness: f32,
}

impl Default for PhysicalMaterial {
    fn default() -> Self {
        Self {
            metalness: 0.0,
            roughness: 0.0,
            transparent: true,
            iridescence: 1.0,
            iridescence_ior: 1.3,
            iridescence_thickness_range: [100.0, 800.0],
            transmission: 1.0,
            ior: 2.41,
            thickness: 2.0,
        }
    }
}

impl PhysicalMaterial {
    pub fn get(&self, param: PhysicalParam) -> f32 {
        match param {
            PhysicalParam::Metalness => self.metalness,
            PhysicalParam::Roughness => self.roughness,
            PhysicalParam::Iridescence => self.iridescence,
            PhysicalParam::IridescenceIor => self.iridescence_ior,
            PhysicalParam::IridescenceThicknessMin => self.iridescence_thickness_range[0],
            PhysicalParam::IridescenceThicknessMax => self.iridescence_thickness_range[1],
            PhysicalParam::Transmission => self.transmission,
            PhysicalParam::Ior => self.ior,
            PhysicalParam::Thickness => self.thickness,
        }
    }

    /// Set a parameter, clamped to its slider range.
    pub fn set(&mut self, param: PhysicalParam, value: f32) {
        let v = param.range().clamp(value);
        match param {
            PhysicalParam::Metalness => self.metalness = v,
            PhysicalParam::Roughness => self.roughness = v,
            PhysicalParam::Iridescence => self.iridescence = v,
            PhysicalParam::IridescenceIor => self.iridescence_ior = v,
            PhysicalParam::IridescenceThicknessMin => self.iridescence_thickness_range[0] = v,
            PhysicalParam::IridescenceThicknessMax => self.iridescence_thickness_range[1] = v,
            PhysicalParam::Transmission => self.transmission = v,
            PhysicalParam::Ior => self.ior = v,
            PhysicalParam::Thickness => self.thickness = v,
        }
    }

    /// The decorative-sphere variant: same look, much thinner volume.
    pub fn bubble(&self) -> Self {
        Self {
            thickness: 0.1,
            ..self.clone()
        }
    }
}

/// A loaded matcap image and the slot index it came from.
#[derive(Debug, Clone)]
pub struct MatcapTexture {
    pub index: u8,
    pub image: Arc<TextureImage>,
}

/// Matcap preset. The texture is swapped in place; `revision` tells the GPU
/// side when to re-upload.
#[derive(Debug, Clone, Default)]
pub struct MatcapMaterial {
    texture: Option<MatcapTexture>,
    revision: u64,
}

impl MatcapMaterial {
    pub fn texture(&self) -> Option<&MatcapTexture> {
        self.texture.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_texture(&mut self, texture: MatcapTexture) {
        self.texture = Some(texture);
        self.revision += 1;
    }

    pub fn clear_texture(&mut self) {
        if self.texture.take().is_some() {
            self.revision += 1;
        }
    }
}

/// Borrowed view of a registry material.
#[derive(Debug, Clone, Copy)]
pub enum MaterialRef<'a> {
    Physical(&'a PhysicalMaterial),
    Normal,
    Matcap(&'a MatcapMaterial),
}

/// Owns every material instance in the scene.
#[derive(Debug, Clone)]
pub struct MaterialRegistry {
    pub physical: PhysicalMaterial,
    pub bubble: PhysicalMaterial,
    pub matcap: MatcapMaterial,
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        let physical = PhysicalMaterial::default();
        let bubble = physical.bubble();
        Self {
            physical,
            bubble,
            matcap: MatcapMaterial::default(),
        }
    }
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Material instance used for text under the given preset.
    pub fn resolve(kind: MaterialKind) -> MaterialId {
        match kind {
            MaterialKind::Normal => MaterialId::Normal,
            MaterialKind::Matcap => MaterialId::Matcap,
            MaterialKind::Standard => MaterialId::Physical,
        }
    }

    pub fn get(&self, id: MaterialId) -> MaterialRef<'_> {
        match id {
            MaterialId::Physical => MaterialRef::Physical(&self.physical),
            MaterialId::Bubble => MaterialRef::Physical(&self.bubble),
            MaterialId::Normal => MaterialRef::Normal,
            MaterialId::Matcap => MaterialRef::Matcap(&self.matcap),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_defaults() {
        let m = PhysicalMaterial::default();
        assert_eq!(m.metalness, 0.0);
        assert_eq!(m.iridescence_ior, 1.3);
        assert_eq!(m.iridescence_thickness_range, [100.0, 800.0]);
        assert_eq!(m.ior, 2.41);
        assert_eq!(m.thickness, 2.0);
        assert!(m.transparent);
    }

    #[test]
    fn set_clamps_to_range() {
        let mut m = PhysicalMaterial::default();
        m.set(PhysicalParam::Roughness, 3.0);
        assert_eq!(m.roughness, 1.0);
        m.set(PhysicalParam::Ior, 0.2);
        assert_eq!(m.ior, 1.0);
        m.set(PhysicalParam::IridescenceThicknessMax, 250.0);
        assert_eq!(m.get(PhysicalParam::IridescenceThicknessMax), 250.0);
        m.set(PhysicalParam::Thickness, f32::NAN);
        assert_eq!(m.thickness, 0.0);
    }

    #[test]
    fn every_param_default_is_within_range() {
        let m = PhysicalMaterial::default();
        for p in PhysicalParam::ALL {
            let r = p.range();
            let v = m.get(p);
            assert!(v >= r.min && v <= r.max, "{p:?} = {v}");
        }
    }

    #[test]
    fn bubble_is_an_independent_clone() {
        let mut registry = MaterialRegistry::new();
        assert_eq!(registry.bubble.thickness, 0.1);
        registry.physical.set(PhysicalParam::Metalness, 0.5);
        assert_eq!(registry.bubble.metalness, 0.0);
    }

    #[test]
    fn resolve_maps_presets_to_instances() {
        assert_eq!(MaterialRegistry::resolve(MaterialKind::Standard), MaterialId::Physical);
        assert_eq!(MaterialRegistry::resolve(MaterialKind::Normal), MaterialId::Normal);
        assert_eq!(MaterialRegistry::resolve(MaterialKind::Matcap), MaterialId::Matcap);
    }

    #[test]
    fn matcap_revision_tracks_texture_swaps() {
        let mut registry = MaterialRegistry::new();
        registry.matcap.clear_texture();
        assert_eq!(registry.matcap.revision(), 0);
        registry.matcap.set_texture(MatcapTexture {
            index: 3,
            image: Arc::new(TextureImage::solid([1, 2, 3, 255])),
        });
        assert_eq!(registry.matcap.revision(), 1);
        match registry.get(MaterialId::Matcap) {
            MaterialRef::Matcap(m) => assert_eq!(m.texture().map(|t| t.index), Some(3)),
            other => panic!("unexpected {other:?}"),
        }
        registry.matcap.clear_texture();
        assert_eq!(registry.matcap.revision(), 2);
    }
}

//! Material presets and selection state.
//!
//! Three presets can shade the text (`standard`, `normal`, `matcap`); a fourth
//! bubble material shades the decorative spheres. Exactly one text preset is
//! active at any time, held as a single [`MaterialKind`] value.
//!
//! # Invariants
//! - The selection can never be empty or ambiguous: it is one enum value.
//! - Unknown preset ids never change the selection.
//! - The matcap slot never yields an index outside `1..=8`.

mod matcap;
mod preset;
mod selector;

pub use matcap::{MATCAP_INDEX_MAX, MATCAP_INDEX_MIN, MatcapRequest, MatcapTextureSlot};
pub use preset::{
    MatcapMaterial, MatcapTexture, MaterialId, MaterialRef, MaterialRegistry, ParamRange,
    PhysicalMaterial, PhysicalParam,
};
pub use selector::{MaterialKind, MaterialSelector};

use std::path::{Path, PathBuf};

pub const MATCAP_INDEX_MIN: u8 = 1;
pub const MATCAP_INDEX_MAX: u8 = 8;

/// A committed matcap choice: which image to load for the matcap material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcapRequest {
    pub index: u8,
    pub path: PathBuf,
}

/// Matcap texture index with commit semantics.
///
/// The panel slider writes every intermediate value to `pending`; only
/// [`commit`](Self::commit) turns it into a load request. Both values are
/// clamped to `1..=8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcapTextureSlot {
    committed: u8,
    pending: u8,
}

impl Default for MatcapTextureSlot {
    fn default() -> Self {
        Self {
            committed: MATCAP_INDEX_MIN,
            pending: MATCAP_INDEX_MIN,
        }
    }
}

impl MatcapTextureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clamp(index: i64) -> u8 {
        index.clamp(MATCAP_INDEX_MIN as i64, MATCAP_INDEX_MAX as i64) as u8
    }

    /// Index of the last committed texture.
    pub fn index(&self) -> u8 {
        self.committed
    }

    pub fn pending(&self) -> u8 {
        self.pending
    }

    pub fn set_pending(&mut self, index: i64) {
        self.pending = Self::clamp(index);
    }

    /// Commit the pending index and build the load request for it.
    pub fn commit(&mut self, dir: &Path) -> MatcapRequest {
        self.committed = self.pending;
        MatcapRequest {
            index: self.committed,
            path: Self::texture_path(dir, self.committed),
        }
    }

    /// Whether a finished load for `index` still matches the slot.
    pub fn accepts(&self, index: u8) -> bool {
        index == self.committed
    }

    pub fn texture_path(dir: &Path, index: u8) -> PathBuf {
        dir.join(format!("{index}.png"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_texture() {
        let slot = MatcapTextureSlot::new();
        assert_eq!(slot.index(), 1);
        assert_eq!(slot.pending(), 1);
    }

    #[test]
    fn pending_does_not_commit() {
        let mut slot = MatcapTextureSlot::new();
        slot.set_pending(5);
        assert_eq!(slot.index(), 1);
        let req = slot.commit(Path::new("textures/matcaps"));
        assert_eq!(req.index, 5);
        assert_eq!(req.path, Path::new("textures/matcaps").join("5.png"));
        assert_eq!(slot.index(), 5);
    }

    #[test]
    fn out_of_range_is_clamped_before_forwarding() {
        let mut slot = MatcapTextureSlot::new();
        slot.set_pending(0);
        assert_eq!(slot.commit(Path::new("m")).index, 1);
        slot.set_pending(42);
        let req = slot.commit(Path::new("m"));
        assert_eq!(req.index, 8);
        assert_eq!(req.path, Path::new("m").join("8.png"));
        slot.set_pending(-3);
        assert_eq!(slot.commit(Path::new("m")).index, 1);
    }

    #[test]
    fn accepts_only_latest_commit() {
        let mut slot = MatcapTextureSlot::new();
        slot.set_pending(2);
        slot.commit(Path::new("m"));
        slot.set_pending(7);
        slot.commit(Path::new("m"));
        assert!(!slot.accepts(2));
        assert!(slot.accepts(7));
    }
}

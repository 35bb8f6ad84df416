use serde::{Deserialize, Serialize};
use std::fmt;

/// The text material presets. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    #[default]
    Standard,
    Normal,
    Matcap,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 3] = [Self::Standard, Self::Normal, Self::Matcap];

    /// Match a preset id case-insensitively. Returns `None` for anything else.
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(id.trim()))
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Normal => "normal",
            Self::Matcap => "matcap",
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Exclusive-choice selector over the text presets.
///
/// `select` mutates the state first and then reports the change; whoever
/// reacts to the returned value observes the new selection.
#[derive(Debug, Clone, Default)]
pub struct MaterialSelector {
    active: MaterialKind,
    changes: u64,
}

impl MaterialSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> MaterialKind {
        self.active
    }

    /// Number of accepted selections since startup.
    pub fn change_count(&self) -> u64 {
        self.changes
    }

    /// Activate the preset named `id`.
    ///
    /// Returns the newly active preset, or `None` (and leaves the state
    /// untouched) when `id` is not a known preset. Re-selecting the active
    /// preset is accepted and reported like any other change.
    pub fn select(&mut self, id: &str) -> Option<MaterialKind> {
        let Some(kind) = MaterialKind::parse(id) else {
            tracing::debug!(id, "ignoring unknown material preset");
            return None;
        };
        self.set(kind);
        Some(kind)
    }

    pub fn set(&mut self, kind: MaterialKind) {
        self.active = kind;
        self.changes += 1;
        tracing::debug!(preset = %kind, "material preset selected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_standard() {
        let selector = MaterialSelector::new();
        assert_eq!(selector.active(), MaterialKind::Standard);
        assert_eq!(selector.change_count(), 0);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(MaterialKind::parse("Matcap"), Some(MaterialKind::Matcap));
        assert_eq!(MaterialKind::parse("NORMAL"), Some(MaterialKind::Normal));
        assert_eq!(MaterialKind::parse(" standard "), Some(MaterialKind::Standard));
        assert_eq!(MaterialKind::parse("Bogus"), None);
        assert_eq!(MaterialKind::parse(""), None);
    }

    #[test]
    fn unknown_id_keeps_previous_state() {
        let mut selector = MaterialSelector::new();
        assert_eq!(selector.select("Matcap"), Some(MaterialKind::Matcap));
        assert_eq!(selector.select("Bogus"), None);
        assert_eq!(selector.active(), MaterialKind::Matcap);
        assert_eq!(selector.change_count(), 1);
    }

    #[test]
    fn exactly_one_active_after_any_sequence() {
        let ids = ["normal", "x", "matcap", "standard", "", "Normal", "matcap2"];
        let mut selector = MaterialSelector::new();
        let mut expected = MaterialKind::Standard;
        for id in ids.iter().cycle().take(50) {
            if let Some(kind) = MaterialKind::parse(id) {
                expected = kind;
            }
            selector.select(id);
            assert_eq!(selector.active(), expected);
            let active = MaterialKind::ALL
                .iter()
                .filter(|k| **k == selector.active())
                .count();
            assert_eq!(active, 1);
        }
    }

    #[test]
    fn reselecting_active_preset_is_reported() {
        let mut selector = MaterialSelector::new();
        assert_eq!(selector.select("standard"), Some(MaterialKind::Standard));
        assert_eq!(selector.change_count(), 1);
    }
}

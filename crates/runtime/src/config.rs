use bubbletext_scene::ScatterParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or parsing a [`SceneConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "bubbletext".into(),
            width: 1280,
            height: 720,
        }
    }
}

/// Shape of the decorative spheres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            width_segments: 32,
            height_segments: 32,
        }
    }
}

/// Everything configurable about the scene. Missing YAML fields take
/// their defaults.
///
/// Asset paths are relative to `assets_dir` unless absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub assets_dir: PathBuf,
    /// Font file. `None` draws the text with the built-in placeholder.
    pub font: Option<PathBuf>,
    pub matcap_dir: PathBuf,
    pub environment: PathBuf,
    pub text: String,
    pub window: WindowConfig,
    pub bodies: ScatterParams,
    pub sphere: SphereConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            font: Some(PathBuf::from("fonts/gentilis_bold.ttf")),
            matcap_dir: PathBuf::from("textures/matcaps"),
            environment: PathBuf::from("textures/environmentMap/skies.hdr"),
            text: "Anastasia".into(),
            window: WindowConfig::default(),
            bodies: ScatterParams::default(),
            sphere: SphereConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.as_ref().display(), "scene config loaded");
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.assets_dir.join(path)
    }

    pub fn font_path(&self) -> Option<PathBuf> {
        self.font.as_deref().map(|p| self.resolve(p))
    }

    pub fn matcap_dir_path(&self) -> PathBuf {
        self.resolve(&self.matcap_dir)
    }

    pub fn environment_path(&self) -> PathBuf {
        self.resolve(&self.environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_scene() {
        let c = SceneConfig::default();
        assert_eq!(c.text, "Anastasia");
        assert_eq!(c.bodies.count, 500);
        assert_eq!(c.sphere.radius, 0.5);
        assert_eq!(
            c.environment_path(),
            PathBuf::from("assets/textures/environmentMap/skies.hdr")
        );
        assert_eq!(c.matcap_dir_path(), PathBuf::from("assets/textures/matcaps"));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let c = SceneConfig::from_yaml_str("text: Hello\nbodies:\n  count: 12\n").unwrap();
        assert_eq!(c.text, "Hello");
        assert_eq!(c.bodies.count, 12);
        assert_eq!(c.bodies.spread, 15.0);
        assert_eq!(c.window, WindowConfig::default());
    }

    #[test]
    fn null_font_selects_placeholder() {
        let c = SceneConfig::from_yaml_str("font: null\n").unwrap();
        assert!(c.font_path().is_none());
    }

    #[test]
    fn absolute_paths_ignore_assets_dir() {
        let c = SceneConfig {
            font: Some(PathBuf::from("/fonts/x.ttf")),
            ..SceneConfig::default()
        };
        assert_eq!(c.font_path(), Some(PathBuf::from("/fonts/x.ttf")));
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let c = SceneConfig {
            text: "Round\ntrip".into(),
            ..SceneConfig::default()
        };
        c.save(tmp.path()).unwrap();
        assert_eq!(SceneConfig::load(tmp.path()).unwrap(), c);
    }

    #[test]
    fn bad_yaml_is_an_error() {
        assert!(matches!(
            SceneConfig::from_yaml_str("bodies: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            SceneConfig::load("/nonexistent/scene.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}

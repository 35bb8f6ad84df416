use crate::cancel::CancellationToken;
use crate::config::SceneConfig;
use crate::timer::FrameTimer;
use bubbletext_assets::{AssetEvent, AssetRequest};
use bubbletext_common::{HdrImage, NodeId, TextureImage};
use bubbletext_materials::{
    MatcapTexture, MatcapTextureSlot, MaterialId, MaterialKind, MaterialRegistry,
    MaterialSelector,
};
use bubbletext_render::{OrbitCamera, Viewport, ViewportChange};
use bubbletext_scene::decor::scatter;
use bubbletext_scene::{BodyGroup, Node, SceneGraph, primitives};
use bubbletext_text::{Font, PlaceholderTypeface, TextMesh, TextMeshBuilder, Typeface};
use glam::Vec3;
use std::sync::Arc;

/// Scene name of the decorative group node.
pub const BODIES_NODE_NAME: &str = "bodies";

/// Snapshot for the stats readout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    pub fps: f64,
    pub average_ms: f64,
    pub max_ms: f64,
    pub nodes: usize,
    pub geometries: usize,
    pub material: MaterialKind,
    pub text_rebuilds: u64,
}

/// All mutable application state, owned by the event-loop thread.
pub struct AppContext {
    pub config: SceneConfig,
    pub scene: SceneGraph,
    pub materials: MaterialRegistry,
    pub selector: MaterialSelector,
    pub text: TextMeshBuilder,
    pub matcap: MatcapTextureSlot,
    pub camera: OrbitCamera,
    pub viewport: Viewport,
    pub timer: FrameTimer,
    bodies: NodeId,
    cancel: CancellationToken,
    frames: u64,
}

impl AppContext {
    /// Build the scene from `config`. Text appears once a typeface is
    /// installed, either here (no font configured) or from [`Self::on_asset`].
    pub fn new(config: SceneConfig) -> Self {
        let materials = MaterialRegistry::new();

        let mut scene = SceneGraph::new();
        let sphere = primitives::uv_sphere(
            config.sphere.radius,
            config.sphere.width_segments,
            config.sphere.height_segments,
        );
        let group = BodyGroup {
            bodies: scatter(&config.bodies),
            geometry: scene.insert_geometry(sphere),
            material: MaterialId::Bubble,
        };
        tracing::info!(count = group.len(), spread = config.bodies.spread, "decorative bodies placed");
        let bodies = scene.attach(Node::bodies(BODIES_NODE_NAME, group));

        let camera = OrbitCamera::looking_at(Vec3::new(1.0, 1.0, 2.0), Vec3::ZERO);
        let text = TextMeshBuilder::new(config.text.clone());

        let mut ctx = Self {
            config,
            scene,
            materials,
            selector: MaterialSelector::new(),
            text,
            matcap: MatcapTextureSlot::new(),
            camera,
            viewport: Viewport::default(),
            timer: FrameTimer::default(),
            bodies,
            cancel: CancellationToken::new(),
            frames: 0,
        };
        let (w, h) = (ctx.config.window.width as f32, ctx.config.window.height as f32);
        ctx.resize(w, h, 1.0);

        if ctx.config.font.is_none() {
            tracing::info!("no font configured, using placeholder glyphs");
            ctx.install_typeface(Arc::new(PlaceholderTypeface));
        }
        ctx
    }

    /// Loads to start right after construction: font, first matcap and
    /// the environment map.
    pub fn initial_requests(&mut self) -> Vec<AssetRequest> {
        let mut requests = Vec::with_capacity(3);
        if let Some(path) = self.config.font_path() {
            requests.push(AssetRequest::Font(path));
        }
        requests.push(self.commit_matcap());
        requests.push(AssetRequest::Environment(self.config.environment_path()));
        requests
    }

    pub fn bodies_node(&self) -> NodeId {
        self.bodies
    }

    pub fn text_mesh(&self) -> Option<TextMesh> {
        self.text.current()
    }

    pub fn active_material(&self) -> MaterialKind {
        self.selector.active()
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub(crate) fn finish_frame(&mut self) {
        self.frames += 1;
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            frames: self.frames,
            fps: self.timer.fps(),
            average_ms: self.timer.average().as_secs_f64() * 1000.0,
            max_ms: self.timer.max().as_secs_f64() * 1000.0,
            nodes: self.scene.node_count(),
            geometries: self.scene.geometry_count(),
            material: self.selector.active(),
            text_rebuilds: self.text.rebuild_count(),
        }
    }

    fn rebuild_text(&mut self) {
        let selection = self.selector.active();
        if let Err(e) = self.text.rebuild(&mut self.scene, selection) {
            tracing::warn!(error = %e, "text rebuild failed");
        }
    }

    fn install_typeface(&mut self, typeface: Arc<dyn Typeface>) {
        let selection = self.selector.active();
        if let Err(e) = self.text.font_ready(typeface, &mut self.scene, selection) {
            tracing::warn!(error = %e, "text build failed");
        }
    }

    /// Switch the text preset. Unknown ids are ignored and return `false`.
    pub fn select_material(&mut self, id: &str) -> bool {
        match self.selector.select(id) {
            Some(kind) => {
                tracing::info!(material = %kind, "material selected");
                self.rebuild_text();
                true
            }
            None => false,
        }
    }

    pub fn set_text(&mut self, content: &str) {
        let selection = self.selector.active();
        if let Err(e) = self.text.set_content(content, &mut self.scene, selection) {
            tracing::warn!(error = %e, "text rebuild failed");
        }
    }

    /// Record an intermediate matcap slider value.
    pub fn set_matcap_pending(&mut self, index: i64) {
        self.matcap.set_pending(index);
    }

    /// Commit the pending matcap index and return the load to start.
    pub fn commit_matcap(&mut self) -> AssetRequest {
        let request = self.matcap.commit(&self.config.matcap_dir_path());
        tracing::debug!(index = request.index, "matcap committed");
        AssetRequest::MatcapTexture {
            index: request.index,
            path: request.path,
        }
    }

    /// Apply a finished asset load.
    pub fn on_asset(&mut self, event: AssetEvent) {
        match event {
            AssetEvent::FontReady { path, bytes } => match Font::from_bytes(bytes) {
                Ok(font) => {
                    tracing::debug!(path = %path.display(), ?font, "font ready");
                    self.install_typeface(Arc::new(font));
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "font rejected"),
            },
            AssetEvent::MatcapReady { index, image } => self.apply_matcap(index, image),
            AssetEvent::EnvironmentReady(image) => self.apply_environment(image),
            AssetEvent::Failed { request, error } => {
                tracing::warn!(
                    kind = request.kind(),
                    path = %request.path().display(),
                    %error,
                    "asset load failed"
                );
                if let AssetRequest::MatcapTexture { index, .. } = request {
                    if self.matcap.accepts(index) {
                        self.materials.matcap.clear_texture();
                    }
                }
            }
        }
    }

    fn apply_matcap(&mut self, index: u8, image: TextureImage) {
        if !self.matcap.accepts(index) {
            tracing::debug!(index, current = self.matcap.index(), "stale matcap load ignored");
            return;
        }
        tracing::debug!(index, width = image.width, height = image.height, "matcap ready");
        self.materials.matcap.set_texture(MatcapTexture {
            index,
            image: Arc::new(image),
        });
    }

    fn apply_environment(&mut self, image: HdrImage) {
        tracing::debug!(width = image.width, height = image.height, "environment ready");
        self.scene.set_environment(Arc::new(image));
    }

    /// Apply a new logical size and device pixel ratio.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) -> ViewportChange {
        let change = self.viewport.resize(width, height, device_pixel_ratio);
        self.camera.aspect = change.aspect;
        change
    }

    pub fn pointer_drag(&mut self, dx: f32, dy: f32) {
        self.camera.rotate(dx, dy, self.viewport.height);
    }

    pub fn scroll(&mut self, delta: f32) {
        self.camera.dolly(delta);
    }

    /// Stop rendering and remove the text mesh. Safe to call twice.
    pub fn teardown(&mut self) {
        if !self.cancel.is_cancelled() {
            tracing::info!(frames = self.frames, "tearing down scene");
        }
        self.cancel.cancel();
        self.text.clear(&mut self.scene);
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("material", &self.selector.active())
            .field("text", &self.text)
            .field("matcap", &self.matcap)
            .field("nodes", &self.scene.node_count())
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

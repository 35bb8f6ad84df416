use bubbletext_assets::AssetLoader;
use bubbletext_materials::{MaterialKind, PhysicalParam};
use bubbletext_runtime::AppContext;

/// Widget values that only become scene changes on commit.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub text: String,
    pub matcap: i64,
}

impl PanelState {
    pub fn new(app: &AppContext) -> Self {
        Self {
            text: app.text.content().to_string(),
            matcap: app.matcap.index() as i64,
        }
    }
}

fn param_slider(ui: &mut egui::Ui, app: &mut AppContext, param: PhysicalParam) {
    let range = param.range();
    let mut value = app.materials.physical.get(param);
    let slider = egui::Slider::new(&mut value, range.min..=range.max)
        .step_by(range.step as f64)
        .text(param.label());
    if ui.add(slider).changed() {
        app.materials.physical.set(param, value);
    }
}

pub fn draw(ctx: &egui::Context, app: &mut AppContext, panel: &mut PanelState, loader: &AssetLoader) {
    egui::SidePanel::right("controls")
        .default_width(300.0)
        .show(ctx, |ui| {
            ui.heading("bubbletext");
            ui.separator();

            ui.label("Text");
            let response = ui.text_edit_singleline(&mut panel.text);
            if response.lost_focus() && panel.text != app.text.content() {
                app.set_text(&panel.text);
            }

            ui.separator();
            ui.label("Material");
            let active = app.active_material();
            for kind in MaterialKind::ALL {
                if ui
                    .selectable_label(active == kind, format!("Apply {kind}"))
                    .clicked()
                {
                    app.select_material(kind.id());
                }
            }

            ui.separator();
            ui.collapsing("Standard material", |ui| {
                for param in PhysicalParam::ALL.into_iter().filter(|p| !p.is_iridescence()) {
                    param_slider(ui, app, param);
                }
                ui.collapsing("Iridescence", |ui| {
                    for param in PhysicalParam::ALL.into_iter().filter(|p| p.is_iridescence()) {
                        param_slider(ui, app, param);
                    }
                });
            });

            ui.collapsing("Matcap", |ui| {
                let response = ui.add(egui::Slider::new(&mut panel.matcap, 1..=8).text("Texture"));
                if response.changed() {
                    app.set_matcap_pending(panel.matcap);
                }
                if response.drag_stopped() || (response.changed() && !response.dragged()) {
                    loader.request(app.commit_matcap());
                }
                match app.materials.matcap.texture() {
                    Some(t) => ui.label(format!("Loaded: #{}", t.index)),
                    None => ui.label("Loaded: none"),
                };
            });

            ui.separator();
            let stats = app.stats();
            ui.label(format!(
                "FPS: {:.0} ({:.2} ms, worst {:.2} ms)",
                stats.fps, stats.average_ms, stats.max_ms
            ));
            ui.label(format!("Frames: {}", stats.frames));
            ui.label(format!(
                "Nodes: {}  Geometries: {}",
                stats.nodes, stats.geometries
            ));
            ui.label(format!(
                "Material: {}  Rebuilds: {}",
                stats.material, stats.text_rebuilds
            ));
            ui.separator();
            ui.small("LMB drag: orbit | Wheel: zoom");
        });
}

use anyhow::Context;
use mapruler::{
    measure::session::SessionState,
    ui::widget::UiMeasureMapExt,
    MapConfig, MeasureMap,
};

/// Desktop measuring map. Usage: `mapruler-app [config.json]`
fn main() -> Result<(), eframe::Error> {
    mapruler::init_debug_logging();

    let config = match load_config(std::env::args().nth(1)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e:#}");
            std::process::exit(2);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 640.0])
            .with_title("mapruler"),
        ..Default::default()
    };

    eframe::run_native(
        "mapruler-app",
        options,
        Box::new(move |cc| Box::new(MeasureApp::new(cc, config))),
    )
}

fn load_config(path: Option<String>) -> anyhow::Result<MapConfig> {
    match path {
        Some(path) => MapConfig::from_file(&path)
            .map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("loading config from {path}")),
        None => Ok(MapConfig::default()),
    }
}

struct MeasureApp {
    config: MapConfig,
    measure: Option<MeasureMap>,
    error: Option<String>,
}

impl MeasureApp {
    fn new(cc: &eframe::CreationContext<'_>, config: MapConfig) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let mut app = Self {
            config,
            measure: None,
            error: None,
        };
        app.mount();
        app
    }

    fn mount(&mut self) {
        match MeasureMap::mount(&self.config) {
            Ok(measure) => {
                self.measure = Some(measure);
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}

impl eframe::App for MeasureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.measure.is_some() {
                    if ui.button("Unmount").clicked() {
                        // Dropping unmounts
                        self.measure = None;
                    }
                } else if ui.button("Mount").clicked() {
                    self.mount();
                }

                ui.separator();
                match &self.measure {
                    Some(measure) => {
                        let state = match measure.session().state() {
                            SessionState::Drawing(_) => "drawing",
                            SessionState::Idle => "click to start a line",
                            SessionState::Detached => "detached",
                        };
                        ui.label(format!(
                            "{} | {} measured | zoom {:.1}",
                            state,
                            measure.static_tooltips().len(),
                            measure.map().viewport().zoom
                        ));
                    }
                    None => {
                        ui.label("not mounted");
                    }
                }

                if let Some(error) = &self.error {
                    ui.colored_label(egui::Color32::RED, error);
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if let Some(measure) = self.measure.as_mut() {
                    ui.measure_map(measure);
                }
            });
    }
}

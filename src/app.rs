use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{fonts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CsvFilterApp {
    pub state: AppState,
}

impl CsvFilterApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        fonts::install_cjk_fonts(&cc.egui_ctx, config.cjk_font.as_deref());
        Self {
            state: AppState::new(config),
        }
    }

    /// Load the first CSV dropped onto the window, if any.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(path) = dropped.into_iter().find_map(|f| f.path) else {
            return;
        };
        log::info!("File dropped: {}", path.display());
        self.state.use_sample = false;
        self.state.load_path(&path);
    }
}

impl eframe::App for CsvFilterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        // Inputs changed last frame are applied before any panel reads them.
        self.state.refilter();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: export ----
        egui::TopBottomPanel::bottom("export_panel").show(ctx, |ui| {
            panels::export_panel(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: filtered preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::preview(ui, &self.state);
        });
    }
}

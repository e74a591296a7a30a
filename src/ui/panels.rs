use chrono::Local;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::CategorySelection;
use crate::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let major_values = dataset.major_values.clone();
    let minor_values = dataset.minor_values.clone();
    let columns = state.config.columns.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Category checklists ----
            category_checklist(ui, state, &columns.major, &major_values, true);
            category_checklist(ui, state, &columns.minor, &minor_values, false);
            ui.separator();

            // ---- Page ranges ----
            ui.strong(format!("{} ranges (up to 2)", columns.page));
            for (i, slot) in state.input.ranges.iter_mut().enumerate() {
                ui.add_space(4.0);
                ui.checkbox(&mut slot.enabled, format!("Range {}", i + 1));
                ui.add_enabled_ui(slot.enabled, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label("from");
                        ui.add(egui::DragValue::new(&mut slot.start).range(0..=u32::MAX));
                        ui.label("to");
                        ui.add(egui::DragValue::new(&mut slot.end).range(0..=u32::MAX));
                    });
                    if slot.start > slot.end {
                        ui.small(format!("applied as {} – {}", slot.end, slot.start));
                    }
                });
            }
        });

    // Recompute visible rows after any widget change. The export bar was
    // already drawn this frame, so ask for another one.
    if state.refilter() {
        ui.ctx().request_repaint();
    }
}

/// One collapsible checklist for a category column.
fn category_checklist(
    ui: &mut Ui,
    state: &mut AppState,
    column: &str,
    all_values: &[String],
    major: bool,
) {
    let selected = selection(state, major);
    let header_text = format!("{column}  ({}/{})", selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(column)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            // Select all / none buttons
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(major);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(major);
                }
            });

            // Re-borrow after potential mutation from All/None
            let selected = selection_mut(state, major);
            if selected.is_empty() {
                ui.label(RichText::new("Nothing selected: no rows will match").weak());
            }
            for val in all_values {
                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, val.as_str()).changed() {
                    selected.set(val, checked);
                }
            }
        });
}

fn selection(state: &AppState, major: bool) -> &CategorySelection {
    if major {
        &state.input.major
    } else {
        &state.input.minor
    }
}

fn selection_mut(state: &mut AppState, major: bool) -> &mut CategorySelection {
    if major {
        &mut state.input.major
    } else {
        &mut state.input.minor
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source_path.is_some(), egui::Button::new("Close"))
                .clicked()
            {
                state.clear();
                state.use_sample = false;
                ui.close_menu();
            }
        });

        if let Some(sample) = state.config.sample_csv.clone() {
            ui.separator();
            let mut use_sample = state.use_sample;
            if ui
                .checkbox(&mut use_sample, "Use sample CSV")
                .on_hover_text(sample.display().to_string())
                .changed()
            {
                state.set_use_sample(use_sample);
            }
        }

        ui.separator();

        if let Some(path) = &state.source_path {
            ui.label(path.display().to_string());
        }

        if state.dataset.is_some() {
            ui.separator();
            ui.label(format!(
                "{} rows loaded, {} matching",
                state.total_rows(),
                state.visible_indices.len()
            ));
        }

        match &state.status {
            Some(Status::Error(msg)) => {
                ui.separator();
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            Some(Status::Info(msg)) => {
                ui.separator();
                ui.label(RichText::new(msg).color(Color32::GREEN));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// Bottom panel – export
// ---------------------------------------------------------------------------

/// Render the file name field and the two save actions.
pub fn export_panel(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.label("File name");
        ui.add(egui::TextEdit::singleline(&mut state.export_name).desired_width(420.0));
        if ui
            .small_button("Reset")
            .on_hover_text("Regenerate from the current selection")
            .clicked()
        {
            state.regenerate_export_name(Local::now().naive_local());
        }

        ui.separator();

        let enabled = state.can_export();
        if ui
            .add_enabled(enabled, egui::Button::new("⬇ Save as…"))
            .clicked()
        {
            save_file_dialog(state);
        }

        let to_dir = format!("💾 Save to {}", state.config.output_dir.display());
        if ui.add_enabled(enabled, egui::Button::new(to_dir)).clicked() {
            if let Err(e) = state.save_to_output_dir() {
                log::error!("Export failed: {e:#}");
                state.status = Some(Status::Error(format!("Error: {e:#}")));
            }
        }

        if !enabled {
            ui.label(RichText::new("No rows to export").weak());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CSV")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.use_sample = false;
        state.load_path(&path);
    }
}

fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save filtered CSV")
        .set_file_name(state.export_name.trim())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.save_as(&path) {
            log::error!("Export failed: {e:#}");
            state.status = Some(Status::Error(format!("Error: {e:#}")));
        }
    }
}

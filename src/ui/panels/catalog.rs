// LogLens - ui/panels/catalog.rs
//
// Loaded files grouped by application name. Clicking a file selects the
// tab that holds it.

use crate::app::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Applications");
    ui.separator();

    if state.catalog.file_count() == 0 {
        ui.weak("No files loaded.");
        return;
    }

    let mut select = None;
    for (app, entries) in state.catalog.groups() {
        egui::CollapsingHeader::new(format!("{app} ({})", entries.len()))
            .id_salt(("catalog", app))
            .default_open(true)
            .show(ui, |ui| {
                for entry in entries {
                    let name = entry
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| entry.path.display().to_string());
                    let title = state
                        .views
                        .get(entry.view)
                        .map(|v| v.title().to_string())
                        .unwrap_or_default();
                    let selected = state.current_view == Some(entry.view);
                    if ui
                        .selectable_label(selected, name)
                        .on_hover_text(format!("{} \u{2192} {title}", entry.path.display()))
                        .clicked()
                    {
                        select = Some(entry.view);
                    }
                }
            });
    }

    if select.is_some() {
        state.current_view = select;
    }
}

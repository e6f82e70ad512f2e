// LogLens - ui/panels/filters.rs
//
// Filter controls sidebar for the selected view: application, levels,
// search, and per-file visibility.
//
// Widgets edit local copies; changes are pushed through the registry's
// filter API after rendering so the view's row mapping is rebuilt once.

use crate::app::state::AppState;
use crate::core::model::{SearchField, ViewId};
use crate::ui::theme;
use std::collections::BTreeSet;
use std::path::PathBuf;

enum FileAction {
    Toggle(PathBuf),
    ShowOnly(PathBuf),
    Remove(PathBuf),
}

/// Render the filter controls.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(id) = state.current_view else {
        ui.label("No view open.");
        return;
    };

    if ui.button("Clear Filters").clicked() {
        clear(state, id);
    }
    ui.separator();

    render_app_filter(ui, state, id);
    ui.separator();
    render_levels(ui, state, id);
    ui.separator();
    render_search(ui, state, id);
    ui.separator();
    render_files(ui, state, id);
}

fn clear(state: &mut AppState, id: ViewId) {
    let views = &mut state.views;
    views.set_app_filter(id, "");
    views.set_levels(id, Vec::<String>::new());
    views.set_search(id, "", SearchField::All, false);
    views.set_show_only(id, None);
    views.set_hidden(id, BTreeSet::new());
}

fn render_app_filter(ui: &mut egui::Ui, state: &mut AppState, id: ViewId) {
    let apps: BTreeSet<String> = state
        .views
        .get(id)
        .map(|v| v.records().iter().map(|r| r.app_name.clone()).collect())
        .unwrap_or_default();
    let current = state.views.app_filter(id);
    let mut selected = current.clone();

    ui.label("Application:");
    egui::ComboBox::from_id_salt("app_filter")
        .selected_text(if selected.is_empty() {
            "All".to_string()
        } else {
            selected.clone()
        })
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut selected, String::new(), "All");
            for app in &apps {
                ui.selectable_value(&mut selected, app.clone(), app);
            }
        });

    if selected != current {
        state.views.set_app_filter(id, &selected);
    }
}

fn render_levels(ui: &mut egui::Ui, state: &mut AppState, id: ViewId) {
    let counts = state.views.level_counts(id);
    let active: BTreeSet<String> = state
        .views
        .levels(id)
        .iter()
        .map(|l| l.trim().to_uppercase())
        .collect();

    ui.label("Level:");
    if counts.is_empty() {
        ui.weak("(no records)");
        return;
    }

    let mut next = active.clone();
    for (level, count) in &counts {
        let mut checked = active.contains(level);
        let text = egui::RichText::new(format!("{level} ({count})"));
        let text = match theme::level_colour(level) {
            Some(colour) => text.color(colour),
            None => text,
        };
        if ui.checkbox(&mut checked, text).changed() {
            if checked {
                next.insert(level.clone());
            } else {
                next.remove(level);
            }
        }
    }

    if next != active {
        state.views.set_levels(id, next);
    }
}

fn render_search(ui: &mut egui::Ui, state: &mut AppState, id: ViewId) {
    let (current_text, current_field, current_regex) = state.views.search(id);
    let (mut text, mut field, mut is_regex) =
        (current_text.clone(), current_field, current_regex);

    ui.label("Search:");
    ui.text_edit_singleline(&mut text);
    ui.horizontal(|ui| {
        egui::ComboBox::from_id_salt("search_field")
            .selected_text(field.label())
            .show_ui(ui, |ui| {
                for option in SearchField::all() {
                    ui.selectable_value(&mut field, *option, option.label());
                }
            });
        ui.checkbox(&mut is_regex, "Regex");
    });

    if text != current_text || field != current_field || is_regex != current_regex {
        state.views.set_search(id, &text, field, is_regex);
    }

    if let Some(error) = state.views.search_error(id) {
        ui.colored_label(theme::ERROR_TEXT, error);
    }
}

fn render_files(ui: &mut egui::Ui, state: &mut AppState, id: ViewId) {
    let Some(view) = state.views.get(id) else {
        return;
    };
    let files = view.loaded_files().to_vec();
    let show_only = view.filter_state().show_only.clone();
    let hidden = view.filter_state().hidden.clone();

    ui.label("Files:");
    let mut action: Option<FileAction> = None;
    for path in &files {
        let visible = match &show_only {
            Some(only) => only == path,
            None => !hidden.contains(path),
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        ui.horizontal(|ui| {
            let mut checked = visible;
            if ui
                .checkbox(&mut checked, name)
                .on_hover_text(path.display().to_string())
                .changed()
            {
                action = Some(FileAction::Toggle(path.clone()));
            }
            if ui
                .small_button("only")
                .on_hover_text("Show only this file")
                .clicked()
            {
                action = Some(FileAction::ShowOnly(path.clone()));
            }
            if ui
                .small_button("\u{2715}")
                .on_hover_text("Remove file from view")
                .clicked()
            {
                action = Some(FileAction::Remove(path.clone()));
            }
        });
    }

    match action {
        Some(FileAction::Toggle(path)) => state.views.toggle_visibility(id, &path),
        Some(FileAction::ShowOnly(path)) => state.views.set_show_only(id, Some(path)),
        Some(FileAction::Remove(path)) => state.remove_file(id, &path),
        None => {}
    }
}

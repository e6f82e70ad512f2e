// LogLens - ui/panels/tabs.rs
//
// Tab strip: one tab per view, with a close button. The tab receiving the
// active load shows a spinner.

use crate::app::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let loading = state.ingest.active_view();
    let mut select = None;
    let mut close = None;

    ui.horizontal_wrapped(|ui| {
        for &id in &state.tab_order {
            let Some(view) = state.views.get(id) else {
                continue;
            };
            let selected = state.current_view == Some(id);
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    if loading == Some(id) {
                        ui.add(egui::Spinner::new().size(12.0));
                    }
                    if ui.selectable_label(selected, view.title()).clicked() {
                        select = Some(id);
                    }
                    if ui
                        .small_button("\u{2715}")
                        .on_hover_text("Close tab")
                        .clicked()
                    {
                        close = Some(id);
                    }
                });
            });
        }
    });

    if let Some(id) = select {
        state.current_view = Some(id);
    }
    if let Some(id) = close {
        state.close_view(id);
    }
}

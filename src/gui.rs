// LogLens - gui.rs
//
// Top-level eframe::App implementation.
// Wires together the panels and pumps ingest events once per frame.

use crate::app::state::AppState;
use crate::ui;
use crate::util::constants::MAX_INGEST_EVENTS_PER_FRAME;

/// The LogLens application.
pub struct LogLensApp {
    pub state: AppState,
}

impl LogLensApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    fn pick_log_files() -> Option<Vec<std::path::PathBuf>> {
        rfd::FileDialog::new()
            .add_filter("Log files", &["log", "txt", "out"])
            .add_filter("All files", &["*"])
            .pick_files()
    }
}

impl eframe::App for LogLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply a bounded number of events per frame so a burst of batches
        // never stalls rendering.
        let had_events = self.state.pump_ingest(MAX_INGEST_EVENTS_PER_FRAME);
        if had_events || self.state.ingest_active() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open in New Tab\u{2026}").clicked() {
                        if let Some(files) = Self::pick_log_files() {
                            self.state.open_in_new_view(&files);
                        }
                        ui.close_menu();
                    }
                    let current = self.state.current_view;
                    ui.add_enabled_ui(current.is_some(), |ui| {
                        if ui.button("Add to Current Tab\u{2026}").clicked() {
                            if let (Some(id), Some(files)) = (current, Self::pick_log_files()) {
                                self.state.add_files(id, &files);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Close Tab").clicked() {
                            if let Some(id) = current {
                                self.state.close_view(id);
                            }
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    let warnings = self.state.warnings.len();
                    ui.add_enabled_ui(warnings > 0, |ui| {
                        if ui.button(format!("Clear Warnings ({warnings})")).clicked() {
                            self.state.warnings.clear();
                            ui.close_menu();
                        }
                    });
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.state.status_message);

                let progress = self
                    .state
                    .active_progress()
                    .map(|(_, p)| (p.fraction(), p.path.clone()));
                if let Some((fraction, path)) = progress {
                    ui.separator();
                    ui.add(
                        egui::ProgressBar::new(fraction)
                            .desired_width(ui::theme::PROGRESS_BAR_WIDTH)
                            .show_percentage(),
                    )
                    .on_hover_text(path.display().to_string());
                }
                if self.state.ingest.retry_pending() {
                    ui.colored_label(ui::theme::ERROR_TEXT, "retrying\u{2026}");
                }
                let pending = self.state.ingest.pending_count();
                if pending > 0 {
                    ui.label(format!("{pending} queued"));
                }
                if self.state.ingest.active_view().is_some()
                    && self.state.ingest.active_view() == self.state.current_view
                    && ui.small_button("Cancel").clicked()
                {
                    self.state.cancel_current();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.state.debug_mode {
                        ui.weak("DEBUG");
                    }
                    if let Some(last) = self.state.warnings.last() {
                        ui.colored_label(ui::theme::ERROR_TEXT, last)
                            .on_hover_text(format!("{} warning(s)", self.state.warnings.len()));
                    }
                });
            });
        });

        // Left sidebar: catalog on top, filters below, each scrolling
        // independently.
        egui::SidePanel::left("sidebar")
            .default_width(ui::theme::SIDEBAR_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                let available = ui.available_height();
                egui::ScrollArea::vertical()
                    .id_salt("sidebar_catalog")
                    .max_height(available * 0.35)
                    .show(ui, |ui| {
                        ui::panels::catalog::render(ui, &mut self.state);
                    });

                ui.separator();

                egui::ScrollArea::vertical()
                    .id_salt("sidebar_filters")
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        ui::panels::filters::render(ui, &mut self.state);
                    });
            });

        // Central panel: tab strip and the selected view's table.
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::tabs::render(ui, &mut self.state);
            ui.separator();
            ui::panels::table::render(ui, &mut self.state);
        });
    }

    /// Saves the session and stops background work before the window closes.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.save_session();
        self.state.ingest.shutdown();
    }
}

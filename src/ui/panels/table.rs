// LogLens - ui/panels/table.rs
//
// Paged record table for the selected view.
//
// Uses `ScrollArea::show_rows`, which lays out only the rows inside the
// viewport, so rendering cost depends on the page window and not on the
// number of records. Search matches are painted with a LayoutJob per cell.
// Header clicks are collected during rendering and applied afterwards so the
// view is not mutably borrowed while rows reference its records.

use crate::app::state::AppState;
use crate::app::view::ViewContext;
use crate::core::model::{Column, HighlightRange, SortOrder};
use crate::ui::theme;
use crate::util::constants::{MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use egui::text::{LayoutJob, TextFormat};

enum PagerAction {
    Prev,
    Next,
    PageSize(usize),
    Paging(bool),
}

/// Render the table (central area).
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let Some(id) = state.current_view else {
        ui.centered_and_justified(|ui| {
            ui.label("No log files loaded.\nOpen files via File \u{2192} Open.");
        });
        return;
    };
    let Some(view) = state.views.get_mut(id) else {
        return;
    };

    let pager_action = render_pager(ui, view);
    ui.separator();

    let mut sort_click: Option<Column> = None;
    render_header(ui, view, &mut sort_click);
    ui.separator();

    if view.row_count() == 0 {
        ui.centered_and_justified(|ui| {
            if view.records().is_empty() {
                ui.label("No records loaded yet.");
            } else {
                ui.label("No records match the current filters.");
            }
        });
    } else {
        render_rows(ui, view);
    }

    if let Some(column) = sort_click {
        view.toggle_sort(column);
    }
    match pager_action {
        Some(PagerAction::Prev) => view.prev_page(),
        Some(PagerAction::Next) => view.next_page(),
        Some(PagerAction::PageSize(size)) => view.set_page_size(size),
        Some(PagerAction::Paging(enabled)) => view.set_paging_enabled(enabled),
        None => {}
    }
}

fn render_pager(ui: &mut egui::Ui, view: &ViewContext) -> Option<PagerAction> {
    let paging = view.paging();
    let mut action = None;
    ui.horizontal(|ui| {
        let mut enabled = paging.is_enabled();
        if ui.checkbox(&mut enabled, "Paging").changed() {
            action = Some(PagerAction::Paging(enabled));
        }
        ui.add_enabled_ui(enabled, |ui| {
            if ui
                .add_enabled(paging.current_page() > 1, egui::Button::new("\u{25c0}"))
                .clicked()
            {
                action = Some(PagerAction::Prev);
            }
            ui.label(format!(
                "Page {} of {}",
                paging.current_page(),
                paging.total_pages()
            ));
            if ui
                .add_enabled(
                    paging.current_page() < paging.total_pages(),
                    egui::Button::new("\u{25b6}"),
                )
                .clicked()
            {
                action = Some(PagerAction::Next);
            }
            ui.separator();
            let mut size = paging.page_size();
            ui.label("Rows per page:");
            if ui
                .add(egui::DragValue::new(&mut size).range(MIN_PAGE_SIZE..=MAX_PAGE_SIZE))
                .changed()
            {
                action = Some(PagerAction::PageSize(size));
            }
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(format!(
                "{}/{} records",
                view.filtered_count(),
                view.records().len()
            ));
        });
    });
    action
}

fn render_header(ui: &mut egui::Ui, view: &ViewContext, sort_click: &mut Option<Column>) {
    let sort = view.proxy().sort_state();
    ui.horizontal(|ui| {
        for &column in Column::all() {
            let arrow = match sort {
                Some((c, SortOrder::Ascending)) if c == column => " \u{25b2}",
                Some((c, SortOrder::Descending)) if c == column => " \u{25bc}",
                _ => "",
            };
            let label = egui::RichText::new(format!("{}{arrow}", column.label())).strong();
            let button = egui::Button::new(label).frame(false);
            let response = match theme::column_width(column) {
                Some(width) => ui.add_sized([width, theme::ROW_HEIGHT], button),
                None => ui.add(button),
            };
            if response.clicked() {
                *sort_click = Some(column);
            }
        }
    });
}

fn render_rows(ui: &mut egui::Ui, view: &mut ViewContext) {
    let rows = view.row_count();
    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show_rows(ui, theme::ROW_HEIGHT, rows, |ui, row_range| {
            for row in row_range {
                let cells: Vec<(Column, String, Vec<HighlightRange>)> = Column::all()
                    .iter()
                    .map(|&column| {
                        let text = match view.record_at(row) {
                            Some(record) => display_text(column, &record.field(column)),
                            None => String::new(),
                        };
                        let ranges = view.highlight_ranges(row, column).to_vec();
                        (column, text, ranges)
                    })
                    .collect();
                let level = view
                    .record_at(row)
                    .map(|r| r.level.clone())
                    .unwrap_or_default();

                ui.horizontal(|ui| {
                    for (column, text, ranges) in cells {
                        let colour = if column == Column::Level {
                            theme::level_colour(&level)
                        } else {
                            None
                        };
                        let base = TextFormat {
                            font_id: egui::FontId::monospace(12.0),
                            color: colour.unwrap_or_else(|| ui.style().visuals.text_color()),
                            ..Default::default()
                        };
                        let job = highlighted_job(&text, &ranges, base);
                        let label = egui::Label::new(job).truncate();
                        match theme::column_width(column) {
                            Some(width) => {
                                ui.add_sized([width, theme::ROW_HEIGHT], label);
                            }
                            None => {
                                ui.add(label);
                            }
                        }
                    }
                });
            }
        });
}

/// Cell text: first line only; the source column shows the file name.
fn display_text(column: Column, text: &str) -> String {
    if column == Column::Source {
        return std::path::Path::new(text)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| text.to_string());
    }
    text.lines().next().unwrap_or_default().to_string()
}

/// Lay out `text` in `base` format with `ranges` (char-based) painted on a
/// highlight background.
fn highlighted_job(text: &str, ranges: &[HighlightRange], base: TextFormat) -> LayoutJob {
    let highlight = TextFormat {
        background: theme::HIGHLIGHT_BG,
        ..base.clone()
    };

    let mut job = LayoutJob::default();
    let mut cursor = 0usize;
    let byte_offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let byte_at = |char_index: usize| byte_offsets[char_index.min(byte_offsets.len() - 1)];

    for range in ranges {
        let start = byte_at(range.start);
        let end = byte_at(range.start + range.len);
        if start < cursor || start >= end {
            continue;
        }
        if cursor < start {
            job.append(&text[cursor..start], 0.0, base.clone());
        }
        job.append(&text[start..end], 0.0, highlight.clone());
        cursor = end;
    }
    if cursor < text.len() {
        job.append(&text[cursor..], 0.0, base);
    }
    job
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text_shows_file_name_and_first_line() {
        assert_eq!(display_text(Column::Source, "/var/log/app.log"), "app.log");
        assert_eq!(display_text(Column::Message, "first\nsecond"), "first");
        assert_eq!(display_text(Column::Message, ""), "");
    }

    #[test]
    fn test_highlighted_job_splits_on_char_ranges() {
        let ranges = [HighlightRange { start: 1, len: 2 }];
        let job = highlighted_job("\u{e9}t\u{e9}!", &ranges, TextFormat::default());
        let pieces: Vec<&str> = job
            .sections
            .iter()
            .map(|s| &job.text[s.byte_range.clone()])
            .collect();
        assert_eq!(pieces, vec!["\u{e9}", "t\u{e9}", "!"]);
        assert_eq!(job.sections[1].format.background, theme::HIGHLIGHT_BG);
    }
}

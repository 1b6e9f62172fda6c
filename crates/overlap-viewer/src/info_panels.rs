//! egui rendering of the info panels
//!
//! Each panel lists its key buttons. A click is reported back as the button's
//! key so the caller can feed it through the same path as a key press.

use overlap_runtime::{EvaluationOutcome, InfoPanel, PanelId, Panels};

const SELECTED_STROKE: egui::Color32 = egui::Color32::from_rgb(233, 30, 99);
const DISABLED_ALPHA: f32 = 0.4;

/// What the status line shows under the panels
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusLine {
    pub mode: &'static str,
    pub space: &'static str,
    pub snapping: bool,
    pub evaluation: Option<EvaluationOutcome>,
}

/// Draw every panel. Returns the key of a clicked button.
pub fn show(
    ctx: &egui::Context,
    panels: &Panels,
    selected: Option<PanelId>,
    status: &StatusLine,
) -> Option<&'static str> {
    let mut clicked = None;

    egui::Area::new(egui::Id::new("info_panels"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
        .show(ctx, |ui| {
            for panel in panels.iter() {
                if let Some(key) = panel_ui(ui, panel, selected == Some(panel.id)) {
                    clicked = Some(key);
                }
                ui.add_space(6.0);
            }
            status_ui(ui, status);
        });

    clicked
}

fn panel_ui(ui: &mut egui::Ui, panel: &InfoPanel, selected: bool) -> Option<&'static str> {
    let stroke = if selected {
        egui::Stroke::new(2.0, SELECTED_STROKE)
    } else {
        ui.visuals().window_stroke
    };
    let mut clicked = None;

    egui::Frame::window(ui.style())
        .stroke(stroke)
        .multiply_with_opacity(if panel.disabled { DISABLED_ALPHA } else { 1.0 })
        .show(ui, |ui| {
            ui.set_min_width(160.0);
            ui.horizontal(|ui| {
                ui.strong(panel.title);
                if panel.disabled {
                    ui.weak("(disabled)");
                }
            });
            ui.horizontal(|ui| {
                for button in &panel.buttons {
                    if ui.small_button(button.label).clicked() {
                        clicked = Some(button.key);
                    }
                }
            });
        });

    clicked
}

fn status_ui(ui: &mut egui::Ui, status: &StatusLine) {
    egui::Frame::window(ui.style()).show(ui, |ui| {
        ui.label(format!("{} / {}", status.mode, status.space));
        if status.snapping {
            ui.label("Snapping");
        }
        match status.evaluation {
            Some(outcome) if outcome.intersecting => {
                ui.label(format!(
                    "{} triangles, {} edges",
                    outcome.triangle_count, outcome.edge_count
                ));
            }
            Some(_) => {
                ui.weak("No intersection");
            }
            None => {}
        }
    });
}

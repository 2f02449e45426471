// src/ui/catalog.rs
//! Catalog and status panel

use crate::{config::CatalogEntry, placement::PlacementPhase, planner::PlannerStatus};

/// What the user asked for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogAction {
    /// Load the catalog entry at this index
    Load(usize),
}

const KEY_HELP: [&str; 4] = [
    "Click an item to load it",
    "Click: place / pick up",
    "R or Q: rotate 90 degrees",
    "Delete / Backspace: remove",
];

/// Draws the catalog buttons and the placement status.
/// Buttons are disabled while a load or placement is in progress.
pub fn catalog_panel(
    ui: &imgui::Ui,
    catalog: &[CatalogEntry],
    status: &PlannerStatus,
) -> Option<CatalogAction> {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return None;
    }

    let mut action = None;
    let busy = status.state != PlacementPhase::Idle;

    ui.window("Furniture")
        .size([280.0, 0.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .always_auto_resize(true)
        .collapsible(true)
        .build(|| {
            ui.text("Catalog");
            ui.separator();

            let disabled = ui.begin_disabled(busy);
            for (index, entry) in catalog.iter().enumerate() {
                if ui.button_with_size(&entry.name, [-1.0, 0.0]) {
                    action = Some(CatalogAction::Load(index));
                }
                if ui.is_item_hovered() {
                    ui.tooltip_text(entry.path.display().to_string());
                }
            }
            disabled.end();

            ui.spacing();
            ui.separator();
            ui.text(format!("State: {}", phase_label(status.state)));
            if let Some(name) = &status.in_flight {
                ui.text(format!("Moving: {}", name));
            }
            ui.text(format!("Placed objects: {}", status.settled));

            if let Some(error) = &status.last_error {
                ui.text_colored([1.0, 0.4, 0.4, 1.0], error);
            }

            ui.spacing();
            ui.separator();
            for line in KEY_HELP {
                ui.text_disabled(line);
            }
        });

    action
}

fn phase_label(phase: PlacementPhase) -> &'static str {
    match phase {
        PlacementPhase::Idle => "Idle",
        PlacementPhase::Loading => "Loading model...",
        PlacementPhase::Placing => "Placing",
    }
}

//! egui renderers for the section views
//!
//! Pure rendering over view-model data; anything the user triggers is
//! returned to the caller instead of being acted on here.

mod stats_panel;
mod tables;

pub use stats_panel::*;
pub use tables::*;

use egui::{Color32, RichText, Ui};

use crate::view::LoadState;

/// Render a section container: placeholder, error, empty message or the
/// loaded content
pub fn render_load_state<T, R>(
    ui: &mut Ui,
    state: &LoadState<T>,
    empty_message: &str,
    content: impl FnOnce(&mut Ui, &T) -> R,
) -> Option<R> {
    match state {
        LoadState::Idle => None,
        LoadState::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Caricamento...");
            });
            None
        }
        LoadState::Error(message) => {
            ui.label(RichText::new(message).color(Color32::from_rgb(220, 90, 90)));
            None
        }
        LoadState::Empty => {
            ui.label(RichText::new(empty_message).color(Color32::GRAY));
            None
        }
        LoadState::Loaded(value) => Some(content(ui, value)),
    }
}

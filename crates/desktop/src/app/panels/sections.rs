//! Central panel - the visible section and its row actions

use eframe::egui;
use egui_phosphor::regular;
use jbk_core::editor::Editor;
use jbk_core::ui::{
    render_dashboard, render_load_state, render_match_filter, render_matches_table, render_players_table,
    render_statistics, render_trainings_table, RowAction,
};
use jbk_core::Section;

use crate::app::state::today;
use crate::app::JbkApp;

impl JbkApp {
    pub(crate) fn render_sections(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(section) = self.model.active_section() else {
                ui.label("Seleziona una sezione dal menu");
                return;
            };

            let editable = matches!(section, Section::Matches | Section::Players | Section::Trainings);
            let mut add = false;
            ui.horizontal(|ui| {
                ui.heading(section.title());
                if editable && self.model.can_write() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(format!("{} Aggiungi", regular::PLUS)).clicked() {
                            add = true;
                        }
                    });
                }
            });
            ui.separator();

            match section {
                Section::Dashboard => self.render_dashboard_section(ui),
                Section::Matches => self.render_matches_section(ui),
                Section::Players => self.render_players_section(ui),
                Section::Trainings => self.render_trainings_section(ui),
                Section::Statistics => self.render_statistics_section(ui),
            }

            if add {
                self.model.open_create(section);
            }
        });
    }

    fn render_dashboard_section(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            render_load_state(ui, &self.model.dashboard, Section::Dashboard.empty_message(), |ui, summary| {
                render_dashboard(ui, summary)
            });
        });
    }

    fn render_statistics_section(&mut self, ui: &mut egui::Ui) {
        let config = self.stats_config;
        egui::ScrollArea::vertical().show(ui, |ui| {
            render_load_state(ui, &self.model.statistics, Section::Statistics.empty_message(), |ui, stats| {
                render_statistics(ui, stats, &config)
            });
        });
    }

    fn render_matches_section(&mut self, ui: &mut egui::Ui) {
        let mut filter = self.model.match_filter;
        if render_match_filter(ui, &mut filter) {
            let commands = self.model.set_match_filter(filter);
            self.dispatch(commands);
        }
        ui.add_space(4.0);

        let can_write = self.model.can_write();
        let action = render_load_state(ui, &self.model.matches, Section::Matches.empty_message(), |ui, rows| {
            render_matches_table(ui, rows, can_write)
        })
        .flatten();

        let Some(action) = action else { return };
        let Some(m) = self.model.matches.loaded().and_then(|rows| rows.get(action.index())).cloned() else {
            return;
        };
        match action {
            RowAction::Edit(_) => self.model.open_editor(Editor::edit_match(&m)),
            RowAction::Delete(_) => {
                if let Some(id) = m.id {
                    self.model.request_delete(Section::Matches, id, format!("la partita contro {}", m.opponent));
                }
            }
            RowAction::CallUps(_) => {
                let commands = self.model.open_call_ups(&m);
                self.dispatch(commands);
            }
        }
    }

    fn render_players_section(&mut self, ui: &mut egui::Ui) {
        let can_write = self.model.can_write();
        let today = today();
        let action = render_load_state(ui, &self.model.players, Section::Players.empty_message(), |ui, rows| {
            render_players_table(ui, rows, today, can_write)
        })
        .flatten();

        let Some(action) = action else { return };
        let Some(p) = self.model.players.loaded().and_then(|rows| rows.get(action.index())).cloned() else {
            return;
        };
        match action {
            RowAction::Edit(_) => self.model.open_editor(Editor::edit_player(&p)),
            RowAction::Delete(_) => {
                if let Some(id) = p.id {
                    self.model.request_delete(Section::Players, id, p.full_name());
                }
            }
            RowAction::CallUps(_) => {}
        }
    }

    fn render_trainings_section(&mut self, ui: &mut egui::Ui) {
        let can_write = self.model.can_write();
        let action = render_load_state(ui, &self.model.trainings, Section::Trainings.empty_message(), |ui, rows| {
            render_trainings_table(ui, rows, can_write)
        })
        .flatten();

        let Some(action) = action else { return };
        let Some(t) = self.model.trainings.loaded().and_then(|rows| rows.get(action.index())).cloned() else {
            return;
        };
        match action {
            RowAction::Edit(_) => self.model.open_editor(Editor::edit_training(&t)),
            RowAction::Delete(_) => {
                if let Some(id) = t.id {
                    self.model
                        .request_delete(Section::Trainings, id, format!("l'allenamento del {}", t.date));
                }
            }
            RowAction::CallUps(_) => {}
        }
    }
}

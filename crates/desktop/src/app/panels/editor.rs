//! Record editor window, call-up sheet, delete confirmation and error alert

use eframe::egui;
use egui_phosphor::regular;
use jbk_core::callups::{CallUpSheet, MAX_CALL_UPS};
use jbk_core::editor::{EditorForm, MatchForm, PlayerForm, Presence, TrainingForm};
use jbk_core::{MatchCategory, Player, PlayerRole};

use crate::app::JbkApp;

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 90, 90);

fn text_row(ui: &mut egui::Ui, label: &str, value: &mut String, hint: &str) {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).hint_text(hint).desired_width(220.0));
    ui.end_row();
}

fn match_form(ui: &mut egui::Ui, form: &mut MatchForm) {
    egui::Grid::new("match_form").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
        text_row(ui, "Data *", &mut form.date, "AAAA-MM-GG");
        text_row(ui, "Ora *", &mut form.time, "HH:MM");
        text_row(ui, "Avversario *", &mut form.opponent, "");
        text_row(ui, "Luogo", &mut form.venue, "");

        ui.label("Campo");
        ui.checkbox(&mut form.is_home, "In casa");
        ui.end_row();

        ui.label("Categoria");
        egui::ComboBox::from_id_salt("match_form_category")
            .selected_text(form.category.label())
            .show_ui(ui, |ui| {
                for category in MatchCategory::ALL {
                    ui.selectable_value(&mut form.category, category, category.label());
                }
            });
        ui.end_row();

        text_row(ui, "Punti nostri", &mut form.our_score, "");
        text_row(ui, "Punti avversari", &mut form.opponent_score, "");
        text_row(ui, "Risultato", &mut form.result, "es. Vinto 80-70");
        text_row(ui, "Note", &mut form.notes, "");
    });
}

fn player_form(ui: &mut egui::Ui, form: &mut PlayerForm) {
    egui::Grid::new("player_form").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
        text_row(ui, "Nome *", &mut form.first_name, "");
        text_row(ui, "Cognome *", &mut form.last_name, "");

        ui.label("Ruolo");
        let selected = form.role.map(|r| r.label()).unwrap_or("Non specificato");
        egui::ComboBox::from_id_salt("player_form_role")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut form.role, None, "Non specificato");
                for role in PlayerRole::ALL {
                    ui.selectable_value(&mut form.role, Some(role), role.label());
                }
            });
        ui.end_row();

        text_row(ui, "Numero maglia", &mut form.jersey_number, "");
        text_row(ui, "Anno di nascita", &mut form.birth_year, "");

        ui.label("Idoneità");
        ui.checkbox(&mut form.fitness_cleared, "Idoneo");
        ui.end_row();

        if form.fitness_cleared {
            text_row(ui, "Scadenza", &mut form.clearance_expiry, "GG/MM/AAAA");
        }
    });
}

fn training_form(ui: &mut egui::Ui, form: &mut TrainingForm, roster: &[Player]) {
    egui::Grid::new("training_form").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
        text_row(ui, "Data *", &mut form.date, "AAAA-MM-GG");
        text_row(ui, "Ora inizio *", &mut form.time, "HH:MM");
        text_row(ui, "Ora fine", &mut form.end_time, "HH:MM");
        text_row(ui, "Luogo", &mut form.location, "");
        text_row(ui, "Tipo", &mut form.kind, "es. Tecnico");
        text_row(ui, "Note", &mut form.notes, "");
    });

    if roster.is_empty() {
        return;
    }
    ui.add_space(8.0);
    ui.strong(format!("{} Presenze", regular::CHECK_SQUARE));
    egui::ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
        egui::Grid::new("training_attendance").num_columns(4).striped(true).show(ui, |ui| {
            for player in roster {
                let Some(id) = player.id else { continue };
                ui.label(player.full_name());
                let mut presence = form.presence(id);
                let before = presence;
                ui.radio_value(&mut presence, Presence::Present, "Presente");
                ui.radio_value(&mut presence, Presence::Excused, "Giustificato");
                ui.radio_value(&mut presence, Presence::Absent, "Assente");
                if presence != before {
                    form.set_presence(id, presence);
                }
                ui.end_row();
            }
        });
    });
}

fn call_up_grid(ui: &mut egui::Ui, sheet: &mut CallUpSheet) {
    let called = sheet.called_count();
    let counter = format!("Convocati: {}/{} (Rifiutati: {})", called, MAX_CALL_UPS, sheet.refused_count());
    if called > MAX_CALL_UPS {
        ui.colored_label(ERROR_COLOR, counter);
    } else {
        ui.strong(counter);
    }
    ui.add_space(4.0);

    let mut changes = Vec::new();
    egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
        egui::Grid::new("call_up_grid").num_columns(4).striped(true).show(ui, |ui| {
            for entry in &mut sheet.entries {
                let label = match entry.jersey_number {
                    Some(n) => format!("#{} {}", n, entry.name),
                    None => entry.name.clone(),
                };
                ui.label(label);

                let mut called = entry.called;
                if ui.checkbox(&mut called, "Convocato").changed() {
                    changes.push((entry.player_id, Some(called), None));
                }
                ui.add_enabled(entry.called, egui::Checkbox::new(&mut entry.starter, "Titolare"));
                let mut refused = entry.refused;
                if ui.checkbox(&mut refused, "Rifiutata").changed() {
                    changes.push((entry.player_id, None, Some(refused)));
                }
                ui.end_row();
            }
        });
    });

    for (player_id, called, refused) in changes {
        if let Some(called) = called {
            sheet.set_called(player_id, called);
        }
        if let Some(refused) = refused {
            sheet.set_refused(player_id, refused);
        }
    }
}

impl JbkApp {
    pub(crate) fn render_dialogs(&mut self, ctx: &egui::Context) {
        self.render_editor(ctx);
        self.render_call_ups(ctx);
        self.render_delete_confirm(ctx);
        self.render_alert(ctx);
    }

    fn render_editor(&mut self, ctx: &egui::Context) {
        let model = &mut self.model;
        let saving = model.saving;
        let roster = &model.roster;
        let Some(editor) = model.editor.as_mut() else {
            return;
        };

        let mut open = true;
        let mut submit = false;
        let mut cancel = false;

        egui::Window::new(editor.title())
            .id(egui::Id::new("record_editor"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_enabled_ui(!saving, |ui| match &mut editor.form {
                    EditorForm::Match(form) => match_form(ui, form),
                    EditorForm::Player(form) => player_form(ui, form),
                    EditorForm::Training(form) => training_form(ui, form, roster),
                });

                if let Some(error) = &editor.error {
                    ui.add_space(6.0);
                    ui.colored_label(ERROR_COLOR, error);
                }

                ui.separator();
                ui.horizontal(|ui| {
                    let save = egui::Button::new(format!("{} Salva", regular::FLOPPY_DISK));
                    if ui.add_enabled(!saving, save).clicked() {
                        submit = true;
                    }
                    if ui.add_enabled(!saving, egui::Button::new("Annulla")).clicked() {
                        cancel = true;
                    }
                    if saving {
                        ui.spinner();
                    }
                });
            });

        if submit {
            let commands = self.model.submit_editor();
            self.dispatch(commands);
        } else if cancel || !open {
            self.model.close_editor();
        }
    }

    fn render_call_ups(&mut self, ctx: &egui::Context) {
        let saving = self.model.saving;
        let Some(sheet) = self.model.call_ups.as_mut() else {
            return;
        };

        let mut open = true;
        let mut submit = false;
        let mut cancel = false;

        egui::Window::new(format!("{} {}", regular::USERS, sheet.title()))
            .id(egui::Id::new("call_up_sheet"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                if sheet.loading {
                    ui.spinner();
                } else if sheet.entries.is_empty() && sheet.error.is_none() {
                    ui.label("Nessun giocatore in rosa");
                } else {
                    ui.add_enabled_ui(!saving, |ui| call_up_grid(ui, sheet));
                }

                if let Some(error) = &sheet.error {
                    ui.add_space(6.0);
                    ui.colored_label(ERROR_COLOR, error);
                }

                ui.separator();
                ui.horizontal(|ui| {
                    let save = egui::Button::new(format!("{} Salva convocati", regular::FLOPPY_DISK));
                    if ui.add_enabled(!saving && !sheet.loading, save).clicked() {
                        submit = true;
                    }
                    if ui.add_enabled(!saving, egui::Button::new("Annulla")).clicked() {
                        cancel = true;
                    }
                    if saving {
                        ui.spinner();
                    }
                });
            });

        if submit {
            let commands = self.model.submit_call_ups();
            self.dispatch(commands);
        } else if cancel || !open {
            self.model.close_call_ups();
        }
    }

    fn render_delete_confirm(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.model.pending_delete.clone() else {
            return;
        };
        let mut confirm = false;
        let mut cancel = false;

        egui::Window::new(format!("{} Conferma eliminazione", regular::TRASH))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("Eliminare {}?", pending.label));
                ui.label(egui::RichText::new("L'operazione non può essere annullata.").color(egui::Color32::GRAY));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button(egui::RichText::new("Elimina").color(ERROR_COLOR)).clicked() {
                        confirm = true;
                    }
                    if ui.button("Annulla").clicked() {
                        cancel = true;
                    }
                });
            });

        if confirm {
            let commands = self.model.confirm_delete();
            self.dispatch(commands);
        } else if cancel {
            self.model.cancel_delete();
        }
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.model.alert.clone() else {
            return;
        };
        let mut dismiss = false;

        egui::Window::new(format!("{} Errore", regular::WARNING))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 40.0])
            .show(ctx, |ui| {
                ui.colored_label(ERROR_COLOR, &message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismiss = true;
                }
            });

        if dismiss {
            self.model.dismiss_alert();
        }
    }
}

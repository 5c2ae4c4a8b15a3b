//! Login form and the screens shown before it

use eframe::egui;
use egui_phosphor::regular;

use crate::app::JbkApp;

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 90, 90);

impl JbkApp {
    pub(crate) fn render_starting(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.3);
                ui.spinner();
                ui.label("Verifica della sessione...");
            });
        });
    }

    /// Fatal configuration problem; nothing is retried
    pub(crate) fn render_unavailable(&mut self, ctx: &egui::Context, message: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.25);
                ui.heading(format!("{} Servizio non disponibile", regular::WARNING));
                ui.add_space(8.0);
                ui.colored_label(ERROR_COLOR, message);
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new("Controlla config.toml e riavvia l'applicazione.")
                        .color(egui::Color32::GRAY),
                );
            });
        });
    }

    pub(crate) fn render_login(&mut self, ctx: &egui::Context) {
        let mut submit = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.2);
                ui.heading(format!("{} JBK Gestione", regular::BASKETBALL));
                ui.add_space(16.0);

                let login = &mut self.model.login;
                ui.add_enabled_ui(!login.busy, |ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut login.username)
                            .hint_text("Username")
                            .desired_width(240.0),
                    );
                    ui.add_space(4.0);
                    let password = ui.add(
                        egui::TextEdit::singleline(&mut login.password)
                            .password(true)
                            .hint_text("Password")
                            .desired_width(240.0),
                    );
                    if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submit = true;
                    }
                    ui.add_space(8.0);
                    if ui.button(format!("{} Accedi", regular::SIGN_IN)).clicked() {
                        submit = true;
                    }
                });

                if login.busy {
                    ui.add_space(8.0);
                    ui.spinner();
                }
                if let Some(error) = &login.error {
                    ui.add_space(8.0);
                    ui.colored_label(ERROR_COLOR, error);
                }
            });
        });

        if submit {
            let commands = self.model.submit_login();
            self.dispatch(commands);
        }
    }
}

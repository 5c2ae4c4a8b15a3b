//! Top bar - navigation, signed-in user, logout and connection status

use eframe::egui;
use egui_phosphor::regular;
use jbk_core::connectivity::Indicator;
use jbk_core::{Screen, Section};

use crate::app::JbkApp;

fn section_icon(section: Section) -> &'static str {
    match section {
        Section::Dashboard => regular::HOUSE,
        Section::Matches => regular::BASKETBALL,
        Section::Players => regular::USERS,
        Section::Trainings => regular::BARBELL,
        Section::Statistics => regular::CHART_BAR,
    }
}

impl JbkApp {
    pub(crate) fn render_top_panel(&mut self, ctx: &egui::Context) {
        let in_shell = self.model.screen == Screen::Shell;
        let indicator = self.connectivity.indicator(std::time::Instant::now());
        let mut navigate = None;
        let mut logout = false;

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("JBK Gestione");
                if let Some(badge) = self.connectivity.header_badge() {
                    ui.label(egui::RichText::new(badge).small().color(egui::Color32::GRAY));
                }

                if in_shell {
                    ui.separator();
                    for section in Section::ALL {
                        let selected = self.model.active_section() == Some(section);
                        let label = format!("{} {}", section_icon(section), section.title());
                        if ui.selectable_label(selected, label).clicked() {
                            navigate = Some(section);
                        }
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if in_shell {
                        if ui.button(regular::SIGN_OUT).on_hover_text("Esci").clicked() {
                            logout = true;
                        }
                        if let Some(email) = &self.model.user_email {
                            ui.label(format!("{} {} ({})", regular::USER, email, self.model.role.label()));
                        }
                    }

                    match indicator {
                        Some(Indicator::Offline) => {
                            ui.colored_label(
                                egui::Color32::from_rgb(255, 165, 0),
                                format!("{} {}", regular::CLOUD_SLASH, Indicator::Offline.label()),
                            );
                        }
                        Some(Indicator::Online) => {
                            ui.colored_label(
                                egui::Color32::from_rgb(100, 200, 100),
                                format!("{} {}", regular::CLOUD, Indicator::Online.label()),
                            );
                        }
                        None => {}
                    }
                });
            });
        });

        if let Some(section) = navigate {
            let commands = self.model.show(section);
            self.dispatch(commands);
        }
        if logout {
            tracing::info!("Logging out");
            let commands = self.model.logout();
            self.dispatch(commands);
        }
    }
}

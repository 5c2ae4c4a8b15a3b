//! Dashboard and statistics panels
//!
//! Renders: entity counts, win/draw/loss record, weekly agenda, training
//! and role charts, attendance and player evaluation tables

use egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_phosphor::regular;
use egui_plot::{Bar, BarChart, Plot};

use crate::stats::{AgendaKind, DashboardSummary, MatchRecord, ScoringAverages, TeamStatistics};
use super::tables::render_recent_matches;

const HIGHLIGHT: Color32 = Color32::from_rgb(255, 215, 0);
const WIN_COLOR: Color32 = Color32::from_rgb(100, 200, 100);
const LOSS_COLOR: Color32 = Color32::from_rgb(220, 90, 90);

/// How the charts should render
#[derive(Clone, Copy)]
pub struct StatsPanelConfig {
    /// Fixed height for plots (None = use view_aspect)
    pub plot_height: Option<f32>,
    /// Whether to allow plot interaction (drag/zoom/scroll)
    pub allow_plot_interaction: bool,
}

impl Default for StatsPanelConfig {
    fn default() -> Self {
        Self {
            plot_height: None,
            allow_plot_interaction: false,
        }
    }
}

fn stat_line(ui: &mut Ui, label: &str, value: impl ToString) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.label(RichText::new(value.to_string()).color(HIGHLIGHT).strong());
    });
}

// ============================================================================
// Dashboard
// ============================================================================

pub fn render_dashboard(ui: &mut Ui, summary: &DashboardSummary) {
    ui.horizontal(|ui| {
        count_card(ui, regular::USERS, "Giocatori", summary.players);
        count_card(ui, regular::BASKETBALL, "Partite", summary.matches);
        count_card(ui, regular::BARBELL, "Allenamenti", summary.trainings);
    });
    ui.add_space(12.0);

    ui.heading(format!("{} Risultati", regular::TROPHY));
    ui.separator();
    render_record(ui, &summary.record);
    ui.add_space(12.0);

    if summary.expired_clearances > 0 {
        ui.label(
            RichText::new(format!(
                "{} {} giocatori con idoneità scaduta",
                regular::WARNING,
                summary.expired_clearances
            ))
            .color(LOSS_COLOR),
        );
        ui.add_space(8.0);
    }

    ui.heading(format!("{} Agenda settimanale", regular::CALENDAR));
    ui.separator();
    if summary.agenda.is_empty() {
        ui.label("Nessun impegno in programma");
    } else {
        for entry in &summary.agenda {
            let icon = match entry.kind {
                AgendaKind::Match => regular::BASKETBALL,
                AgendaKind::Training => regular::BARBELL,
            };
            ui.horizontal(|ui| {
                ui.label(icon);
                ui.label(
                    RichText::new(entry.date.format("%d/%m").to_string())
                        .color(Color32::from_rgb(130, 130, 130))
                        .small(),
                );
                ui.label(entry.describe());
            });
        }
    }
    ui.add_space(12.0);

    ui.heading(format!("{} Ultime partite", regular::LIST));
    ui.separator();
    if summary.recent_matches.is_empty() {
        ui.label("Nessuna partita registrata");
    } else {
        render_recent_matches(ui, &summary.recent_matches);
    }
}

fn count_card(ui: &mut Ui, icon: &str, label: &str, count: usize) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_width(120.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(icon).size(22.0));
            ui.label(RichText::new(count.to_string()).size(22.0).color(HIGHLIGHT).strong());
            ui.label(label);
        });
    });
}

/// Wins / draws / losses with win percentage
pub fn render_record(ui: &mut Ui, record: &MatchRecord) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(format!("V {}", record.wins)).color(WIN_COLOR).strong());
        ui.label(RichText::new(format!("P {}", record.draws)).color(Color32::LIGHT_GRAY).strong());
        ui.label(RichText::new(format!("S {}", record.losses)).color(LOSS_COLOR).strong());
        ui.label(format!("su {} giocate", record.total));
    });
    if let Some(pct) = record.win_percentage() {
        stat_line(ui, "Percentuale vittorie:", format!("{:.1}%", pct));
    }
}

// ============================================================================
// Statistics
// ============================================================================

pub fn render_statistics(ui: &mut Ui, stats: &TeamStatistics, config: &StatsPanelConfig) {
    ui.heading(format!("{} Bilancio", regular::TROPHY));
    ui.separator();
    render_record(ui, &stats.record);
    render_scoring(ui, &stats.scoring);
    ui.add_space(16.0);

    ui.heading(format!("{} Allenamenti per mese", regular::CHART_BAR));
    ui.separator();
    if stats.months.is_empty() {
        ui.label("Nessun allenamento registrato");
    } else {
        let bars: Vec<(String, usize)> = stats.months.iter().map(|m| (m.label().to_string(), m.count)).collect();
        render_bar_chart(ui, "trainings_by_month", "Allenamenti", &bars, Color32::from_rgb(100, 180, 255), config);
    }
    ui.add_space(16.0);

    ui.heading(format!("{} Giocatori per ruolo", regular::USERS));
    ui.separator();
    if stats.roles.is_empty() {
        ui.label("Nessun giocatore registrato");
    } else {
        let bars: Vec<(String, usize)> = stats.roles.iter().map(|r| (r.label().to_string(), r.count)).collect();
        render_bar_chart(ui, "players_by_role", "Giocatori", &bars, Color32::from_rgb(100, 200, 100), config);
    }
    ui.add_space(16.0);

    ui.heading(format!("{} Presenze", regular::CHECK_SQUARE));
    ui.separator();
    render_attendance(ui, stats);
    ui.add_space(16.0);

    ui.heading(format!("{} Valutazione giocatori", regular::STAR));
    ui.separator();
    render_evaluations(ui, stats);
}

fn render_scoring(ui: &mut Ui, scoring: &ScoringAverages) {
    if scoring.games == 0 {
        return;
    }
    stat_line(ui, "Media punti fatti:", format!("{:.1}", scoring.scored));
    stat_line(ui, "Media punti subiti:", format!("{:.1}", scoring.conceded));
}

/// One bar per entry, labelled underneath
fn render_bar_chart(
    ui: &mut Ui,
    id: &str,
    name: &str,
    entries: &[(String, usize)],
    color: Color32,
    config: &StatsPanelConfig,
) {
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, (label, count))| Bar::new(i as f64, *count as f64).name(label).width(0.6))
        .collect();
    let chart = BarChart::new(name, bars).color(color);

    let mut plot = Plot::new(id)
        .include_y(0.0)
        .show_axes([false, true])
        .allow_drag(config.allow_plot_interaction)
        .allow_zoom(config.allow_plot_interaction)
        .allow_scroll(config.allow_plot_interaction);
    if let Some(height) = config.plot_height {
        plot = plot.height(height).width(ui.available_width());
    } else {
        plot = plot.view_aspect(3.0);
    }
    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(chart);
    });

    ui.horizontal_wrapped(|ui| {
        for (label, count) in entries {
            ui.label(RichText::new(format!("{}: {}", label, count)).small());
        }
    });
}

fn render_attendance(ui: &mut Ui, stats: &TeamStatistics) {
    if stats.attendance.is_empty() {
        ui.label("Nessun dato di presenza");
        return;
    }
    ui.push_id("attendance_table", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::remainder().at_least(160.0).clip(true))
            .column(Column::exact(70.0))
            .column(Column::exact(90.0))
            .column(Column::exact(70.0))
            .column(Column::exact(60.0))
            .header(20.0, |mut header| {
                for title in ["Giocatore", "Presenze", "Giustificate", "Assenze", "%"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(20.0, stats.attendance.len(), |mut row| {
                    let entry = &stats.attendance[row.index()];
                    row.col(|ui| {
                        ui.label(&entry.name);
                    });
                    row.col(|ui| {
                        ui.label(entry.presences.to_string());
                    });
                    row.col(|ui| {
                        ui.label(entry.excused.to_string());
                    });
                    row.col(|ui| {
                        ui.label(entry.absences.to_string());
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(format!("{:.0}%", entry.percentage())).color(HIGHLIGHT));
                    });
                });
            });
    });
}

fn rating_color(rating: f32) -> Color32 {
    if rating >= 7.0 {
        WIN_COLOR
    } else if rating >= 5.0 {
        HIGHLIGHT
    } else {
        LOSS_COLOR
    }
}

fn render_evaluations(ui: &mut Ui, stats: &TeamStatistics) {
    if stats.evaluations.is_empty() {
        ui.label("Nessun giocatore da valutare");
        return;
    }
    ui.push_id("evaluation_table", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::remainder().at_least(160.0).clip(true))
            .column(Column::exact(80.0))
            .column(Column::exact(80.0))
            .column(Column::exact(80.0))
            .column(Column::exact(60.0))
            .header(20.0, |mut header| {
                for title in ["Giocatore", "Presenze", "Convocato", "Rifiuti", "Voto"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(20.0, stats.evaluations.len(), |mut row| {
                    let entry = &stats.evaluations[row.index()];
                    row.col(|ui| {
                        ui.label(&entry.name);
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.0}%", entry.attendance_percentage));
                    });
                    row.col(|ui| {
                        ui.label(format!("{}/{}", entry.call_ups.called_up, entry.call_ups.total_matches));
                    });
                    row.col(|ui| {
                        ui.label(entry.call_ups.refused.to_string());
                    });
                    row.col(|ui| {
                        ui.label(
                            RichText::new(format!("{:.1}", entry.rating))
                                .color(rating_color(entry.rating))
                                .strong(),
                        );
                    });
                });
            });
    });
}

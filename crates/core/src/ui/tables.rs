//! Record tables for matches, players and trainings
//!
//! Each table returns the row action the user clicked, if any; the caller
//! decides what to do with it.

use chrono::NaiveDate;
use egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder, TableRow};
use egui_phosphor::regular;

use crate::models::{Match, MatchFilter, Player, Training};
use crate::stats::{classify, clearance_status, short_time, ClearanceStatus, MatchOutcome};

const ROW_HEIGHT: f32 = 22.0;
const ACTIONS_WIDTH: f32 = 60.0;

/// A click on one of a row's buttons. Carries the row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit(usize),
    Delete(usize),
    /// Matches only
    CallUps(usize),
}

impl RowAction {
    pub fn index(&self) -> usize {
        match self {
            RowAction::Edit(i) | RowAction::Delete(i) | RowAction::CallUps(i) => *i,
        }
    }
}

fn outcome_color(outcome: Option<MatchOutcome>) -> Color32 {
    match outcome {
        Some(MatchOutcome::Win) => Color32::from_rgb(100, 200, 100),
        Some(MatchOutcome::Draw) => Color32::LIGHT_GRAY,
        Some(MatchOutcome::Loss) => Color32::from_rgb(220, 90, 90),
        None => Color32::from_rgb(130, 130, 130),
    }
}

fn clearance_color(status: ClearanceStatus) -> Color32 {
    match status {
        ClearanceStatus::Cleared => Color32::from_rgb(100, 200, 100),
        ClearanceStatus::Expired => Color32::from_rgb(255, 165, 0),
        ClearanceStatus::NotCleared => Color32::from_rgb(220, 90, 90),
    }
}

fn date_label(text: &str) -> String {
    crate::stats::parse_date(text)
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| text.to_string())
}

fn action_buttons(row: &mut TableRow<'_, '_>, index: usize, action: &mut Option<RowAction>) {
    row.col(|ui| {
        if ui.small_button(regular::PENCIL_SIMPLE).on_hover_text("Modifica").clicked() {
            *action = Some(RowAction::Edit(index));
        }
        if ui.small_button(regular::TRASH).on_hover_text("Elimina").clicked() {
            *action = Some(RowAction::Delete(index));
        }
    });
}

/// Category selector above the matches list. Returns true when changed.
pub fn render_match_filter(ui: &mut Ui, filter: &mut MatchFilter) -> bool {
    let before = *filter;
    ui.horizontal(|ui| {
        ui.label("Categoria:");
        egui::ComboBox::from_id_salt("match_category_filter")
            .selected_text(filter.label())
            .show_ui(ui, |ui| {
                for option in MatchFilter::options() {
                    ui.selectable_value(filter, option, option.label());
                }
            });
    });
    *filter != before
}

pub fn render_matches_table(ui: &mut Ui, matches: &[Match], can_write: bool) -> Option<RowAction> {
    let mut action = None;
    let mut builder = TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::exact(90.0))
        .column(Column::exact(50.0))
        .column(Column::remainder().at_least(140.0).clip(true))
        .column(Column::exact(70.0))
        .column(Column::exact(120.0))
        .column(Column::exact(70.0));
    if can_write {
        builder = builder.column(Column::exact(ACTIONS_WIDTH + 30.0));
    }
    builder
        .header(20.0, |mut header| {
            for title in ["Data", "Ora", "Avversario", "Campo", "Categoria", "Punteggio"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
            if can_write {
                header.col(|_| {});
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, matches.len(), |mut row| {
                let index = row.index();
                let m = &matches[index];
                row.col(|ui| {
                    ui.label(date_label(&m.date));
                });
                row.col(|ui| {
                    ui.label(short_time(&m.time));
                });
                row.col(|ui| {
                    let response = ui.label(&m.opponent);
                    if let Some(notes) = m.notes.as_deref().filter(|n| !n.is_empty()) {
                        response.on_hover_text(notes);
                    }
                });
                row.col(|ui| {
                    ui.label(m.home_away_label());
                });
                row.col(|ui| {
                    ui.label(m.category.label());
                });
                row.col(|ui| {
                    ui.label(RichText::new(m.score_display()).color(outcome_color(classify(m))).strong());
                });
                if can_write {
                    row.col(|ui| {
                        if ui.small_button(regular::USERS).on_hover_text("Convocati").clicked() {
                            action = Some(RowAction::CallUps(index));
                        }
                        if ui.small_button(regular::PENCIL_SIMPLE).on_hover_text("Modifica").clicked() {
                            action = Some(RowAction::Edit(index));
                        }
                        if ui.small_button(regular::TRASH).on_hover_text("Elimina").clicked() {
                            action = Some(RowAction::Delete(index));
                        }
                    });
                }
            });
        });
    action
}

/// Read-only summary table used on the dashboard
pub fn render_recent_matches(ui: &mut Ui, matches: &[Match]) {
    ui.push_id("recent_matches", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::exact(90.0))
            .column(Column::remainder().at_least(140.0).clip(true))
            .column(Column::exact(70.0))
            .header(20.0, |mut header| {
                for title in ["Data", "Avversario", "Punteggio"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, matches.len(), |mut row| {
                    let m = &matches[row.index()];
                    row.col(|ui| {
                        ui.label(date_label(&m.date));
                    });
                    row.col(|ui| {
                        ui.label(&m.opponent);
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(m.score_display()).color(outcome_color(classify(m))));
                    });
                });
            });
    });
}

pub fn render_players_table(ui: &mut Ui, players: &[Player], today: NaiveDate, can_write: bool) -> Option<RowAction> {
    let mut action = None;
    let mut builder = TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::exact(40.0))
        .column(Column::remainder().at_least(160.0).clip(true))
        .column(Column::exact(100.0))
        .column(Column::exact(60.0))
        .column(Column::exact(140.0));
    if can_write {
        builder = builder.column(Column::exact(ACTIONS_WIDTH));
    }
    builder
        .header(20.0, |mut header| {
            for title in ["#", "Giocatore", "Ruolo", "Anno", "Idoneità"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
            if can_write {
                header.col(|_| {});
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, players.len(), |mut row| {
                let index = row.index();
                let p = &players[index];
                row.col(|ui| {
                    ui.label(p.jersey_number.map(|n| n.to_string()).unwrap_or_default());
                });
                row.col(|ui| {
                    ui.label(p.full_name());
                });
                row.col(|ui| {
                    ui.label(p.role_label());
                });
                row.col(|ui| {
                    ui.label(p.birth_year.map(|y| y.to_string()).unwrap_or_default());
                });
                row.col(|ui| {
                    let status = clearance_status(p, today);
                    let response = ui.label(RichText::new(status.label()).color(clearance_color(status)));
                    if let Some(expiry) = p.clearance_expiry.as_deref() {
                        response.on_hover_text(format!("Scadenza: {}", date_label(expiry)));
                    }
                });
                if can_write {
                    action_buttons(&mut row, index, &mut action);
                }
            });
        });
    action
}

pub fn render_trainings_table(ui: &mut Ui, trainings: &[Training], can_write: bool) -> Option<RowAction> {
    let mut action = None;
    let mut builder = TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::exact(90.0))
        .column(Column::exact(100.0))
        .column(Column::remainder().at_least(140.0).clip(true))
        .column(Column::exact(110.0))
        .column(Column::exact(80.0));
    if can_write {
        builder = builder.column(Column::exact(ACTIONS_WIDTH));
    }
    builder
        .header(20.0, |mut header| {
            for title in ["Data", "Orario", "Luogo", "Tipo", "Presenti"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
            if can_write {
                header.col(|_| {});
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, trainings.len(), |mut row| {
                let index = row.index();
                let t = &trainings[index];
                row.col(|ui| {
                    ui.label(date_label(&t.date));
                });
                row.col(|ui| {
                    let time = match t.end_time.as_deref() {
                        Some(end) => format!("{}-{}", short_time(&t.time), short_time(end)),
                        None => short_time(&t.time).to_string(),
                    };
                    ui.label(time);
                });
                row.col(|ui| {
                    let response = ui.label(t.location.as_deref().unwrap_or("-"));
                    if let Some(notes) = t.notes.as_deref().filter(|n| !n.is_empty()) {
                        response.on_hover_text(notes);
                    }
                });
                row.col(|ui| {
                    ui.label(t.kind.as_deref().unwrap_or("-"));
                });
                row.col(|ui| {
                    ui.label(format!("{} {}", regular::CHECK, t.attendance.len()));
                });
                if can_write {
                    action_buttons(&mut row, index, &mut action);
                }
            });
        });
    action
}

//! Per-match call-up sheet

use crate::error::{JbkError, Result};
use crate::models::{CallUp, Match, Player};

/// Players that can be called up for one match
pub const MAX_CALL_UPS: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct CallUpEntry {
    pub player_id: i64,
    pub name: String,
    pub jersey_number: Option<i32>,
    pub called: bool,
    pub starter: bool,
    pub refused: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallUpSheet {
    pub match_id: i64,
    pub opponent: String,
    /// Empty until the roster and the stored call-ups arrive
    pub entries: Vec<CallUpEntry>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CallUpSheet {
    /// `None` for a match that was never stored
    pub fn new(m: &Match) -> Option<Self> {
        Some(Self {
            match_id: m.id?,
            opponent: m.opponent.clone(),
            entries: Vec::new(),
            loading: true,
            error: None,
        })
    }

    pub fn title(&self) -> String {
        format!("Convocati per: {}", self.opponent)
    }

    /// One entry per rostered player, ticked from the stored call-ups
    pub fn fill(&mut self, roster: &[Player], stored: &[CallUp]) {
        self.entries = roster
            .iter()
            .filter_map(|p| {
                let id = p.id?;
                let existing = stored.iter().find(|c| c.player_id == id);
                Some(CallUpEntry {
                    player_id: id,
                    name: p.full_name(),
                    jersey_number: p.jersey_number,
                    called: existing.is_some(),
                    starter: existing.is_some_and(|c| c.starter),
                    refused: existing.is_some_and(|c| c.refused),
                })
            })
            .collect();
        self.loading = false;
        self.error = None;
    }

    fn entry_mut(&mut self, player_id: i64) -> Option<&mut CallUpEntry> {
        self.entries.iter_mut().find(|e| e.player_id == player_id)
    }

    /// Dropping a player also clears the refusal
    pub fn set_called(&mut self, player_id: i64, called: bool) {
        if let Some(entry) = self.entry_mut(player_id) {
            entry.called = called;
            if !called {
                entry.refused = false;
                entry.starter = false;
            }
        }
    }

    /// A refusal implies the player was called up
    pub fn set_refused(&mut self, player_id: i64, refused: bool) {
        if let Some(entry) = self.entry_mut(player_id) {
            entry.refused = refused;
            if refused {
                entry.called = true;
            }
        }
    }

    pub fn called_count(&self) -> usize {
        self.entries.iter().filter(|e| e.called).count()
    }

    pub fn refused_count(&self) -> usize {
        self.entries.iter().filter(|e| e.called && e.refused).count()
    }

    /// Rows replacing the stored call-ups of this match
    pub fn to_rows(&self) -> Result<Vec<CallUp>> {
        let called = self.called_count();
        if called > MAX_CALL_UPS {
            return Err(JbkError::Validation(format!(
                "Puoi selezionare massimo {} giocatori ({} selezionati)",
                MAX_CALL_UPS, called
            )));
        }
        Ok(self
            .entries
            .iter()
            .filter(|e| e.called)
            .map(|e| CallUp {
                id: None,
                match_id: self.match_id,
                player_id: e.player_id,
                starter: e.starter,
                refused: e.refused,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchCategory;

    fn sample_match() -> Match {
        Match {
            id: Some(3),
            date: "2025-03-01".into(),
            time: "18:00".into(),
            opponent: "Virtus".into(),
            venue: None,
            is_home: true,
            category: MatchCategory::RegularSeason,
            our_score: None,
            opponent_score: None,
            result: None,
            notes: None,
        }
    }

    fn roster(count: i64) -> Vec<Player> {
        (1..=count)
            .map(|id| Player {
                id: Some(id),
                first_name: "Luca".into(),
                last_name: format!("Rossi{}", id),
                role: None,
                jersey_number: Some(id as i32),
                birth_year: None,
                fitness_cleared: true,
                clearance_expiry: None,
            })
            .collect()
    }

    #[test]
    fn unsaved_match_has_no_sheet() {
        let mut m = sample_match();
        m.id = None;
        assert!(CallUpSheet::new(&m).is_none());
    }

    #[test]
    fn fill_ticks_stored_call_ups() {
        let mut sheet = CallUpSheet::new(&sample_match()).unwrap();
        assert!(sheet.loading);
        let stored = vec![CallUp { id: Some(1), match_id: 3, player_id: 2, starter: true, refused: true }];
        sheet.fill(&roster(3), &stored);
        assert!(!sheet.loading);
        assert_eq!(sheet.called_count(), 1);
        assert_eq!(sheet.refused_count(), 1);
        assert!(sheet.entries[1].starter);
        assert_eq!(sheet.title(), "Convocati per: Virtus");
    }

    #[test]
    fn refusal_and_call_flags_stay_consistent() {
        let mut sheet = CallUpSheet::new(&sample_match()).unwrap();
        sheet.fill(&roster(2), &[]);

        sheet.set_refused(1, true);
        assert!(sheet.entries[0].called);

        sheet.set_called(1, false);
        assert!(!sheet.entries[0].refused);
        assert_eq!(sheet.called_count(), 0);
    }

    #[test]
    fn rows_only_cover_called_players() {
        let mut sheet = CallUpSheet::new(&sample_match()).unwrap();
        sheet.fill(&roster(3), &[]);
        sheet.set_called(1, true);
        sheet.set_refused(3, true);
        let rows = sheet.to_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.match_id == 3 && r.id.is_none()));
        assert!(rows[1].refused);
    }

    #[test]
    fn more_than_twelve_is_rejected() {
        let mut sheet = CallUpSheet::new(&sample_match()).unwrap();
        sheet.fill(&roster(13), &[]);
        for id in 1..=13 {
            sheet.set_called(id, true);
        }
        assert!(matches!(sheet.to_rows(), Err(JbkError::Validation(_))));
        sheet.set_called(13, false);
        assert_eq!(sheet.to_rows().unwrap().len(), MAX_CALL_UPS);
    }
}

//! Record editor forms: text-backed fields, validation and conversion to
//! records. Numeric fields left blank become `None`, never zero.

use crate::error::{JbkError, Result};
use crate::models::{Match, MatchCategory, Player, PlayerRole, Training};
use crate::view::Section;

/// Parse an optional integer field. Blank is `None`; garbage is an error.
pub fn parse_optional_number(label: &str, text: &str) -> Result<Option<i32>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<i32>()
        .map(Some)
        .map_err(|_| JbkError::Validation(format!("Il campo '{}' deve essere un numero", label)))
}

fn required(label: &str, text: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        Err(JbkError::Validation(format!("Il campo '{}' è obbligatorio", label)))
    } else {
        Ok(text.to_string())
    }
}

fn optional_text(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() { None } else { Some(text.to_string()) }
}

fn number_text(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchForm {
    pub date: String,
    pub time: String,
    pub opponent: String,
    pub venue: String,
    pub is_home: bool,
    pub category: MatchCategory,
    pub our_score: String,
    pub opponent_score: String,
    pub result: String,
    pub notes: String,
}

impl MatchForm {
    pub fn new(category: MatchCategory) -> Self {
        Self {
            date: String::new(),
            time: String::new(),
            opponent: String::new(),
            venue: String::new(),
            is_home: true,
            category,
            our_score: String::new(),
            opponent_score: String::new(),
            result: String::new(),
            notes: String::new(),
        }
    }

    pub fn from_record(m: &Match) -> Self {
        Self {
            date: m.date.clone(),
            time: m.time.clone(),
            opponent: m.opponent.clone(),
            venue: m.venue.clone().unwrap_or_default(),
            is_home: m.is_home,
            category: m.category,
            our_score: number_text(m.our_score),
            opponent_score: number_text(m.opponent_score),
            result: m.result.clone().unwrap_or_default(),
            notes: m.notes.clone().unwrap_or_default(),
        }
    }

    pub fn to_record(&self) -> Result<Match> {
        Ok(Match {
            id: None,
            date: required("Data", &self.date)?,
            time: required("Ora", &self.time)?,
            opponent: required("Avversario", &self.opponent)?,
            venue: optional_text(&self.venue),
            is_home: self.is_home,
            category: self.category,
            our_score: parse_optional_number("Punti nostri", &self.our_score)?,
            opponent_score: parse_optional_number("Punti avversari", &self.opponent_score)?,
            result: optional_text(&self.result),
            notes: optional_text(&self.notes),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerForm {
    pub first_name: String,
    pub last_name: String,
    pub role: Option<PlayerRole>,
    pub jersey_number: String,
    pub birth_year: String,
    pub fitness_cleared: bool,
    pub clearance_expiry: String,
}

impl PlayerForm {
    pub fn from_record(p: &Player) -> Self {
        Self {
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            role: p.role,
            jersey_number: number_text(p.jersey_number),
            birth_year: number_text(p.birth_year),
            fitness_cleared: p.fitness_cleared,
            clearance_expiry: p.clearance_expiry.clone().unwrap_or_default(),
        }
    }

    pub fn to_record(&self) -> Result<Player> {
        Ok(Player {
            id: None,
            first_name: required("Nome", &self.first_name)?,
            last_name: required("Cognome", &self.last_name)?,
            role: self.role,
            jersey_number: parse_optional_number("Numero maglia", &self.jersey_number)?,
            birth_year: parse_optional_number("Anno di nascita", &self.birth_year)?,
            fitness_cleared: self.fitness_cleared,
            // expiry is meaningless without a clearance
            clearance_expiry: if self.fitness_cleared {
                optional_text(&self.clearance_expiry)
            } else {
                None
            },
        })
    }
}

/// Attendance mark for one player in one training
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    Excused,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrainingForm {
    pub date: String,
    pub time: String,
    pub end_time: String,
    pub location: String,
    pub kind: String,
    pub notes: String,
    pub attendance: Vec<i64>,
    pub excused: Vec<i64>,
}

impl TrainingForm {
    pub fn from_record(t: &Training) -> Self {
        Self {
            date: t.date.clone(),
            time: t.time.clone(),
            end_time: t.end_time.clone().unwrap_or_default(),
            location: t.location.clone().unwrap_or_default(),
            kind: t.kind.clone().unwrap_or_default(),
            notes: t.notes.clone().unwrap_or_default(),
            attendance: t.attendance.clone(),
            excused: t.excused.clone(),
        }
    }

    pub fn presence(&self, player_id: i64) -> Presence {
        if self.attendance.contains(&player_id) {
            Presence::Present
        } else if self.excused.contains(&player_id) {
            Presence::Excused
        } else {
            Presence::Absent
        }
    }

    pub fn set_presence(&mut self, player_id: i64, presence: Presence) {
        self.attendance.retain(|id| *id != player_id);
        self.excused.retain(|id| *id != player_id);
        match presence {
            Presence::Present => self.attendance.push(player_id),
            Presence::Excused => self.excused.push(player_id),
            Presence::Absent => {}
        }
    }

    pub fn to_record(&self) -> Result<Training> {
        Ok(Training {
            id: None,
            date: required("Data", &self.date)?,
            time: required("Ora", &self.time)?,
            end_time: optional_text(&self.end_time),
            location: optional_text(&self.location),
            kind: optional_text(&self.kind),
            notes: optional_text(&self.notes),
            attendance: self.attendance.clone(),
            excused: self.excused.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorForm {
    Match(MatchForm),
    Player(PlayerForm),
    Training(TrainingForm),
}

/// An open create/edit modal
#[derive(Debug, Clone, PartialEq)]
pub struct Editor {
    /// `None` creates a new record
    pub id: Option<i64>,
    pub form: EditorForm,
    /// Last validation or save error, shown inside the modal
    pub error: Option<String>,
}

impl Editor {
    /// Empty form for the given list; new matches default to the filtered
    /// category so they show up in the list they were added from
    pub fn create(section: Section, category: Option<MatchCategory>) -> Option<Self> {
        let form = match section {
            Section::Matches => EditorForm::Match(MatchForm::new(category.unwrap_or_default())),
            Section::Players => EditorForm::Player(PlayerForm::default()),
            Section::Trainings => EditorForm::Training(TrainingForm::default()),
            Section::Dashboard | Section::Statistics => return None,
        };
        Some(Self { id: None, form, error: None })
    }

    pub fn edit_match(m: &Match) -> Self {
        Self { id: m.id, form: EditorForm::Match(MatchForm::from_record(m)), error: None }
    }

    pub fn edit_player(p: &Player) -> Self {
        Self { id: p.id, form: EditorForm::Player(PlayerForm::from_record(p)), error: None }
    }

    pub fn edit_training(t: &Training) -> Self {
        Self { id: t.id, form: EditorForm::Training(TrainingForm::from_record(t)), error: None }
    }

    pub fn section(&self) -> Section {
        match self.form {
            EditorForm::Match(_) => Section::Matches,
            EditorForm::Player(_) => Section::Players,
            EditorForm::Training(_) => Section::Trainings,
        }
    }

    pub fn title(&self) -> String {
        let what = match self.form {
            EditorForm::Match(_) => "partita",
            EditorForm::Player(_) => "giocatore",
            EditorForm::Training(_) => "allenamento",
        };
        if self.id.is_some() {
            format!("Modifica {}", what)
        } else {
            format!("Nuovo {}", what)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_numbers_become_none() {
        assert_eq!(parse_optional_number("x", ""), Ok(None));
        assert_eq!(parse_optional_number("x", "   "), Ok(None));
        assert_eq!(parse_optional_number("x", "0"), Ok(Some(0)));
        assert_eq!(parse_optional_number("x", " 23 "), Ok(Some(23)));
        assert!(matches!(parse_optional_number("x", "ventitré"), Err(JbkError::Validation(_))));
    }

    #[test]
    fn player_form_persists_blank_numbers_as_null() {
        let form = PlayerForm {
            first_name: "Giulia".into(),
            last_name: "Conti".into(),
            ..Default::default()
        };
        let player = form.to_record().unwrap();
        assert_eq!(player.jersey_number, None);
        assert_eq!(player.birth_year, None);
        let json = serde_json::to_value(&player).unwrap();
        assert!(json["jersey_number"].is_null());
        assert!(json["birth_year"].is_null());
    }

    #[test]
    fn match_form_requires_opponent() {
        let mut form = MatchForm::new(MatchCategory::Tournament);
        form.date = "2025-05-01".into();
        form.time = "20:00".into();
        let err = form.to_record().unwrap_err();
        assert_eq!(err.to_string(), "Il campo 'Avversario' è obbligatorio");

        form.opponent = "Fortitudo".into();
        let m = form.to_record().unwrap();
        assert_eq!(m.category, MatchCategory::Tournament);
        assert_eq!(m.our_score, None);
        assert_eq!(m.venue, None);
    }

    #[test]
    fn edit_form_round_trips_scores() {
        let m = Match {
            id: Some(4),
            date: "2025-05-01".into(),
            time: "20:00".into(),
            opponent: "Fortitudo".into(),
            venue: Some("PalaDozza".into()),
            is_home: false,
            category: MatchCategory::RegularSeason,
            our_score: Some(0),
            opponent_score: Some(12),
            result: None,
            notes: None,
        };
        let editor = Editor::edit_match(&m);
        assert_eq!(editor.id, Some(4));
        assert_eq!(editor.title(), "Modifica partita");
        let EditorForm::Match(form) = &editor.form else { panic!("match form expected") };
        assert_eq!(form.our_score, "0");
        assert_eq!(form.to_record().unwrap().our_score, Some(0));
    }

    #[test]
    fn presence_marks_are_exclusive() {
        let mut form = TrainingForm::default();
        form.set_presence(3, Presence::Present);
        form.set_presence(3, Presence::Excused);
        assert_eq!(form.presence(3), Presence::Excused);
        assert!(form.attendance.is_empty());
        form.set_presence(3, Presence::Absent);
        assert_eq!(form.presence(3), Presence::Absent);
        assert!(form.excused.is_empty());
    }

    #[test]
    fn new_match_defaults_to_filtered_category() {
        let editor = Editor::create(Section::Matches, Some(MatchCategory::PostSeason)).unwrap();
        let EditorForm::Match(form) = editor.form else { panic!("match form expected") };
        assert_eq!(form.category, MatchCategory::PostSeason);
        assert!(Editor::create(Section::Statistics, None).is_none());
    }

    #[test]
    fn clearance_expiry_dropped_when_not_cleared() {
        let form = PlayerForm {
            first_name: "A".into(),
            last_name: "B".into(),
            fitness_cleared: false,
            clearance_expiry: "2025-12-31".into(),
            ..Default::default()
        };
        assert_eq!(form.to_record().unwrap().clearance_expiry, None);
    }
}

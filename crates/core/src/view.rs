//! Section routing and per-section view models

use crate::error::JbkError;

/// Mutually exclusive top-level views of the app shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Dashboard,
    Matches,
    Players,
    Trainings,
    Statistics,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Dashboard,
        Section::Matches,
        Section::Players,
        Section::Trainings,
        Section::Statistics,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Matches => "matches",
            Section::Players => "players",
            Section::Trainings => "trainings",
            Section::Statistics => "statistics",
        }
    }

    pub fn from_id(id: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.id() == id)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Matches => "Partite",
            Section::Players => "Giocatori",
            Section::Trainings => "Allenamenti",
            Section::Statistics => "Statistiche",
        }
    }

    /// Localized message shown when a list comes back empty
    pub fn empty_message(&self) -> &'static str {
        match self {
            Section::Dashboard => "Nessun dato disponibile",
            Section::Matches => "Nessuna partita trovata",
            Section::Players => "Nessun giocatore trovato",
            Section::Trainings => "Nessun allenamento trovato",
            Section::Statistics => "Nessun dato disponibile",
        }
    }
}

/// Identifies one load. Completions carrying an outdated ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub section: Section,
    pub generation: u64,
}

/// Tracks which section is visible. Every switch starts a new generation.
#[derive(Debug, Clone, Default)]
pub struct ViewRouter {
    active: Option<Section>,
    generation: u64,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the section with this id, hiding all others. Unknown ids leave
    /// every section hidden and return `None`.
    pub fn show_section(&mut self, id: &str) -> Option<Ticket> {
        match Section::from_id(id) {
            Some(section) => Some(self.show(section)),
            None => {
                self.hide_all();
                None
            }
        }
    }

    pub fn show(&mut self, section: Section) -> Ticket {
        self.active = Some(section);
        self.next_ticket(section)
    }

    /// New ticket for the visible section without switching (reload after a
    /// mutation or filter change)
    pub fn reload(&mut self) -> Option<Ticket> {
        let section = self.active?;
        Some(self.next_ticket(section))
    }

    pub fn hide_all(&mut self) {
        self.active = None;
        self.generation += 1;
    }

    pub fn active(&self) -> Option<Section> {
        self.active
    }

    pub fn is_visible(&self, section: Section) -> bool {
        self.active == Some(section)
    }

    pub fn visible_sections(&self) -> Vec<Section> {
        Section::ALL.into_iter().filter(|s| self.is_visible(*s)).collect()
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.active == Some(ticket.section) && self.generation == ticket.generation
    }

    fn next_ticket(&mut self, section: Section) -> Ticket {
        self.generation += 1;
        Ticket {
            section,
            generation: self.generation,
        }
    }
}

/// What a section container currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Error(String),
    Empty,
    Loaded(T),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> LoadState<Vec<T>> {
    /// Map a list fetch onto the container states
    pub fn from_rows(result: Result<Vec<T>, JbkError>) -> Self {
        match result {
            Err(e) => LoadState::Error(format!("Errore: {}", e)),
            Ok(rows) if rows.is_empty() => LoadState::Empty,
            Ok(rows) => LoadState::Loaded(rows),
        }
    }
}

impl<T> LoadState<T> {
    /// Aggregate views: any failure replaces the whole container
    pub fn from_result(result: Result<T, JbkError>) -> Self {
        match result {
            Err(e) => LoadState::Error(format!("Errore nel caricamento dei dati: {}", e)),
            Ok(value) => LoadState::Loaded(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn showing_a_section_leaves_exactly_one_visible() {
        let mut router = ViewRouter::new();
        for section in Section::ALL {
            router.show_section(section.id());
            assert_eq!(router.visible_sections(), vec![section]);
        }
    }

    #[test]
    fn unknown_section_hides_everything() {
        let mut router = ViewRouter::new();
        router.show(Section::Players);
        assert_eq!(router.show_section("settings"), None);
        assert!(router.visible_sections().is_empty());
    }

    #[test]
    fn stale_tickets_are_rejected() {
        let mut router = ViewRouter::new();
        let first = router.show(Section::Matches);
        let second = router.show(Section::Players);
        assert!(!router.is_current(&first));
        assert!(router.is_current(&second));

        let reload = router.reload().unwrap();
        assert!(!router.is_current(&second));
        assert!(router.is_current(&reload));
    }

    #[test]
    fn switching_back_to_same_section_still_issues_new_ticket() {
        let mut router = ViewRouter::new();
        let a = router.show(Section::Matches);
        let b = router.show(Section::Matches);
        assert_ne!(a, b);
    }

    #[test]
    fn load_state_from_rows() {
        let ok: LoadState<Vec<i32>> = LoadState::from_rows(Ok(vec![1]));
        assert_eq!(ok.loaded(), Some(&vec![1]));
        let empty: LoadState<Vec<i32>> = LoadState::from_rows(Ok(vec![]));
        assert_eq!(empty, LoadState::Empty);
        let err: LoadState<Vec<i32>> = LoadState::from_rows(Err(JbkError::Backend("permission denied".into())));
        assert_eq!(err, LoadState::Error("Errore: permission denied".into()));
    }
}

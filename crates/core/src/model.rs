//! Application view model.
//!
//! `AppModel` owns everything the UI renders. User actions and backend
//! completions go in; [`Command`]s for the runner come out. Nothing here
//! touches the network, so the whole flow is testable with a fake backend.

use crate::callups::CallUpSheet;
use crate::editor::{Editor, EditorForm};
use crate::error::JbkError;
use crate::messages::{Command, Event, RecordPayload, SectionData, SignedIn};
use crate::models::{Match, MatchFilter, Player, Training, UserRole};
use crate::stats::{DashboardSummary, TeamStatistics};
use crate::view::{LoadState, Section, Ticket, ViewRouter};

/// Top-level screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Screen {
    /// Waiting for the stored-session check
    #[default]
    Starting,
    Login,
    /// App shell with navigation and sections
    Shell,
    /// Backend client could not be created; nothing else happens
    Unavailable(String),
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
    pub busy: bool,
}

/// A delete waiting for the user's confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDelete {
    pub section: Section,
    pub id: i64,
    /// Shown in the confirmation dialog
    pub label: String,
}

#[derive(Debug, Default)]
pub struct AppModel {
    pub screen: Screen,
    pub router: ViewRouter,
    pub login: LoginForm,
    pub role: UserRole,
    pub user_email: Option<String>,

    pub match_filter: MatchFilter,
    pub dashboard: LoadState<DashboardSummary>,
    pub matches: LoadState<Vec<Match>>,
    pub players: LoadState<Vec<Player>>,
    pub trainings: LoadState<Vec<Training>>,
    pub statistics: LoadState<TeamStatistics>,
    /// Players listed in the training editor's attendance grid
    pub roster: Vec<Player>,

    pub editor: Option<Editor>,
    /// Call-up sheet of one match
    pub call_ups: Option<CallUpSheet>,
    pub pending_delete: Option<PendingDelete>,
    /// Blocking message for a failed mutation
    pub alert: Option<String>,
    pub saving: bool,
}

impl AppModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Session gate
    // ========================================================================

    /// Entry point. A missing backend client is fatal for the session.
    pub fn start(&mut self, backend: Result<(), JbkError>) -> Vec<Command> {
        match backend {
            Ok(()) => {
                self.screen = Screen::Starting;
                vec![Command::CheckSession]
            }
            Err(e) => {
                tracing::error!("Backend client unavailable: {}", e);
                self.screen = Screen::Unavailable(e.to_string());
                Vec::new()
            }
        }
    }

    pub fn can_write(&self) -> bool {
        self.role.can_write()
    }

    // ========================================================================
    // Auth
    // ========================================================================

    pub fn submit_login(&mut self) -> Vec<Command> {
        if self.login.busy {
            return Vec::new();
        }
        let username = self.login.username.trim().to_string();
        if username.is_empty() || self.login.password.is_empty() {
            self.login.error = Some("Inserisci username e password".to_string());
            return Vec::new();
        }
        self.login.error = None;
        self.login.busy = true;
        vec![Command::Login {
            username,
            password: self.login.password.clone(),
        }]
    }

    pub fn logout(&mut self) -> Vec<Command> {
        if self.screen != Screen::Shell {
            return Vec::new();
        }
        vec![Command::Logout]
    }

    fn enter_shell(&mut self, signed_in: SignedIn) -> Vec<Command> {
        self.role = signed_in.role;
        self.user_email = signed_in.session.email;
        self.login = LoginForm::default();
        self.screen = Screen::Shell;
        self.show(Section::Dashboard)
    }

    fn show_login(&mut self) {
        let username = std::mem::take(&mut self.login.username);
        *self = Self {
            screen: Screen::Login,
            login: LoginForm { username, ..Default::default() },
            // keep the generation counter moving so in-flight loads stay stale
            router: std::mem::take(&mut self.router),
            ..Default::default()
        };
        self.router.hide_all();
    }

    // ========================================================================
    // Navigation and loading
    // ========================================================================

    /// Navigate by section id; unknown ids hide every section
    pub fn show_section(&mut self, id: &str) -> Vec<Command> {
        if self.screen != Screen::Shell {
            return Vec::new();
        }
        match self.router.show_section(id) {
            Some(ticket) => vec![self.load(ticket)],
            None => {
                tracing::warn!("Unknown section '{}'", id);
                Vec::new()
            }
        }
    }

    pub fn show(&mut self, section: Section) -> Vec<Command> {
        self.show_section(section.id())
    }

    pub fn active_section(&self) -> Option<Section> {
        self.router.active()
    }

    /// Change the matches filter; reloads the list when it is on screen
    pub fn set_match_filter(&mut self, filter: MatchFilter) -> Vec<Command> {
        if self.match_filter == filter {
            return Vec::new();
        }
        self.match_filter = filter;
        if self.router.is_visible(Section::Matches) {
            self.reload_visible(Section::Matches)
        } else {
            Vec::new()
        }
    }

    /// Reload the active section, unless the user navigated away from
    /// `section` in the meantime
    fn reload_visible(&mut self, section: Section) -> Vec<Command> {
        if !self.router.is_visible(section) {
            return Vec::new();
        }
        match self.router.reload() {
            Some(ticket) => vec![self.load(ticket)],
            None => Vec::new(),
        }
    }

    /// Placeholder first, then the command
    fn load(&mut self, ticket: Ticket) -> Command {
        match ticket.section {
            Section::Dashboard => self.dashboard = LoadState::Loading,
            Section::Matches => self.matches = LoadState::Loading,
            Section::Players => self.players = LoadState::Loading,
            Section::Trainings => self.trainings = LoadState::Loading,
            Section::Statistics => self.statistics = LoadState::Loading,
        }
        tracing::debug!("Loading {} (generation {})", ticket.section.id(), ticket.generation);
        Command::LoadSection {
            ticket,
            filter: self.match_filter,
        }
    }

    fn apply_load(&mut self, section: Section, data: Result<SectionData, JbkError>) {
        let data = match data {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("Loading {} failed: {}", section.id(), e);
                match section {
                    Section::Dashboard => self.dashboard = LoadState::from_result(Err(e)),
                    Section::Statistics => self.statistics = LoadState::from_result(Err(e)),
                    Section::Matches => self.matches = LoadState::from_rows(Err(e)),
                    Section::Players => self.players = LoadState::from_rows(Err(e)),
                    Section::Trainings => self.trainings = LoadState::from_rows(Err(e)),
                }
                return;
            }
        };
        match data {
            SectionData::Dashboard(summary) => self.dashboard = LoadState::Loaded(summary),
            SectionData::Statistics(stats) => self.statistics = LoadState::Loaded(stats),
            SectionData::Matches(rows) => self.matches = LoadState::from_rows(Ok(rows)),
            SectionData::Players(rows) => self.players = LoadState::from_rows(Ok(rows)),
            SectionData::Trainings { trainings, roster } => {
                self.trainings = LoadState::from_rows(Ok(trainings));
                self.roster = roster;
            }
        }
    }

    // ========================================================================
    // Record editors
    // ========================================================================

    pub fn open_create(&mut self, section: Section) {
        if !self.can_write() {
            return;
        }
        self.editor = Editor::create(section, self.match_filter.category());
    }

    pub fn open_editor(&mut self, editor: Editor) {
        if self.can_write() {
            self.editor = Some(editor);
        }
    }

    pub fn close_editor(&mut self) {
        if !self.saving {
            self.editor = None;
        }
    }

    /// Validate locally, then issue an insert or an update
    pub fn submit_editor(&mut self) -> Vec<Command> {
        if self.saving {
            return Vec::new();
        }
        let Some(editor) = self.editor.as_mut() else {
            return Vec::new();
        };
        let record = match &editor.form {
            EditorForm::Match(form) => form.to_record().map(RecordPayload::Match),
            EditorForm::Player(form) => form.to_record().map(RecordPayload::Player),
            EditorForm::Training(form) => form.to_record().map(RecordPayload::Training),
        };
        match record {
            Ok(record) => {
                editor.error = None;
                self.saving = true;
                vec![Command::Save { id: editor.id, record }]
            }
            Err(e) => {
                editor.error = Some(e.to_string());
                Vec::new()
            }
        }
    }

    // ========================================================================
    // Call-ups
    // ========================================================================

    pub fn open_call_ups(&mut self, m: &Match) -> Vec<Command> {
        if !self.can_write() || self.saving {
            return Vec::new();
        }
        match CallUpSheet::new(m) {
            Some(sheet) => {
                let match_id = sheet.match_id;
                self.call_ups = Some(sheet);
                vec![Command::LoadCallUps { match_id }]
            }
            None => Vec::new(),
        }
    }

    pub fn close_call_ups(&mut self) {
        if !self.saving {
            self.call_ups = None;
        }
    }

    pub fn submit_call_ups(&mut self) -> Vec<Command> {
        if self.saving {
            return Vec::new();
        }
        let Some(sheet) = self.call_ups.as_mut().filter(|s| !s.loading) else {
            return Vec::new();
        };
        match sheet.to_rows() {
            Ok(rows) => {
                sheet.error = None;
                self.saving = true;
                vec![Command::SaveCallUps {
                    match_id: sheet.match_id,
                    rows,
                }]
            }
            Err(e) => {
                sheet.error = Some(e.to_string());
                Vec::new()
            }
        }
    }

    /// The open sheet, if it belongs to `match_id`
    fn sheet_for(&mut self, match_id: i64) -> Option<&mut CallUpSheet> {
        self.call_ups.as_mut().filter(|s| s.match_id == match_id)
    }

    pub fn request_delete(&mut self, section: Section, id: i64, label: impl Into<String>) {
        if self.can_write() {
            self.pending_delete = Some(PendingDelete {
                section,
                id,
                label: label.into(),
            });
        }
    }

    pub fn confirm_delete(&mut self) -> Vec<Command> {
        match self.pending_delete.take() {
            Some(pending) => vec![Command::Delete {
                section: pending.section,
                id: pending.id,
            }],
            None => Vec::new(),
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    // ========================================================================
    // Completions
    // ========================================================================

    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::SessionChecked(Ok(Some(signed_in))) => {
                tracing::info!("Stored session found");
                self.enter_shell(signed_in)
            }
            Event::SessionChecked(Ok(None)) => {
                self.screen = Screen::Login;
                Vec::new()
            }
            Event::SessionChecked(Err(e)) => {
                tracing::warn!("Session check failed: {}", e);
                self.screen = Screen::Login;
                Vec::new()
            }
            Event::LoggedIn(Ok(signed_in)) => self.enter_shell(signed_in),
            Event::LoggedIn(Err(e)) => {
                tracing::warn!("Login failed: {}", e);
                self.login.busy = false;
                self.login.error = Some(e.to_string());
                Vec::new()
            }
            Event::LoggedOut(_) => {
                self.show_login();
                Vec::new()
            }
            Event::SectionLoaded { ticket, data } => {
                if self.router.is_current(&ticket) {
                    self.apply_load(ticket.section, data);
                } else {
                    tracing::debug!(
                        "Discarding stale {} load (generation {})",
                        ticket.section.id(),
                        ticket.generation
                    );
                }
                Vec::new()
            }
            Event::Saved { section, result } => {
                self.saving = false;
                match result {
                    Ok(()) => {
                        self.editor = None;
                        self.reload_visible(section)
                    }
                    Err(e) => {
                        if let Some(editor) = self.editor.as_mut() {
                            editor.error = Some(e.to_string());
                        }
                        self.alert = Some(e.to_string());
                        Vec::new()
                    }
                }
            }
            Event::Deleted { section, result } => match result {
                Ok(()) => self.reload_visible(section),
                Err(e) => {
                    self.alert = Some(e.to_string());
                    Vec::new()
                }
            },
            Event::CallUpsLoaded { match_id, result } => {
                if let Some(sheet) = self.sheet_for(match_id) {
                    match result {
                        Ok((roster, stored)) => sheet.fill(&roster, &stored),
                        Err(e) => {
                            tracing::error!("Loading call-ups failed: {}", e);
                            sheet.loading = false;
                            sheet.error = Some(format!("Errore nel caricamento dei convocati: {}", e));
                        }
                    }
                }
                Vec::new()
            }
            Event::CallUpsSaved { match_id, result } => {
                self.saving = false;
                match result {
                    Ok(count) => {
                        tracing::info!("Call-up sheet saved ({} players)", count);
                        if self.sheet_for(match_id).is_some() {
                            self.call_ups = None;
                        }
                        self.reload_visible(Section::Statistics)
                    }
                    Err(e) => {
                        if let Some(sheet) = self.sheet_for(match_id) {
                            sheet.error = Some(e.to_string());
                        }
                        self.alert = Some(e.to_string());
                        Vec::new()
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchCategory, Session};

    fn signed_in(role: UserRole) -> SignedIn {
        SignedIn {
            session: Session {
                access_token: "token".into(),
                refresh_token: None,
                user_id: "u1".into(),
                email: Some("coach@jbk.it".into()),
            },
            role,
        }
    }

    fn shell(role: UserRole) -> (AppModel, Ticket) {
        let mut model = AppModel::new();
        model.start(Ok(()));
        let commands = model.handle(Event::SessionChecked(Ok(Some(signed_in(role)))));
        let Some(Command::LoadSection { ticket, .. }) = commands.into_iter().next() else {
            panic!("dashboard load expected");
        };
        (model, ticket)
    }

    #[test]
    fn unavailable_backend_stops_everything() {
        let mut model = AppModel::new();
        let commands = model.start(Err(JbkError::Config("SUPABASE_URL mancante".into())));
        assert!(commands.is_empty());
        assert!(matches!(model.screen, Screen::Unavailable(_)));
        assert!(model.show(Section::Players).is_empty());
    }

    #[test]
    fn stored_session_opens_dashboard() {
        let (model, ticket) = shell(UserRole::Admin);
        assert_eq!(model.screen, Screen::Shell);
        assert_eq!(ticket.section, Section::Dashboard);
        assert!(model.dashboard.is_loading());
    }

    #[test]
    fn empty_credentials_rejected_locally() {
        let mut model = AppModel::new();
        model.handle(Event::SessionChecked(Ok(None)));
        model.login.username = "coach".into();
        assert!(model.submit_login().is_empty());
        assert!(model.login.error.is_some());
        assert!(!model.login.busy);
    }

    #[test]
    fn login_error_shown_verbatim() {
        let mut model = AppModel::new();
        model.handle(Event::SessionChecked(Ok(None)));
        model.login.username = "coach".into();
        model.login.password = "wrong".into();
        assert_eq!(model.submit_login().len(), 1);
        model.handle(Event::LoggedIn(Err(JbkError::Auth("Invalid login credentials".into()))));
        assert_eq!(model.screen, Screen::Login);
        assert_eq!(model.login.error.as_deref(), Some("Invalid login credentials"));
        assert!(!model.login.busy);
    }

    #[test]
    fn stale_load_is_discarded() {
        let (mut model, dashboard_ticket) = shell(UserRole::Admin);
        model.show(Section::Players);
        model.handle(Event::SectionLoaded {
            ticket: dashboard_ticket,
            data: Err(JbkError::Backend("late".into())),
        });
        assert!(model.dashboard.is_loading());
        assert!(model.players.is_loading());
    }

    #[test]
    fn filter_change_reloads_visible_matches() {
        let (mut model, _) = shell(UserRole::Admin);
        model.show(Section::Matches);
        let commands = model.set_match_filter(MatchFilter::Category(MatchCategory::Tournament));
        assert!(matches!(
            commands.as_slice(),
            [Command::LoadSection { filter: MatchFilter::Category(MatchCategory::Tournament), .. }]
        ));
        assert!(model.set_match_filter(MatchFilter::Category(MatchCategory::Tournament)).is_empty());
    }

    #[test]
    fn read_only_users_cannot_open_editors() {
        let (mut model, _) = shell(UserRole::User);
        model.show(Section::Players);
        model.open_create(Section::Players);
        assert!(model.editor.is_none());
        model.request_delete(Section::Players, 1, "Mario Rossi");
        assert!(model.pending_delete.is_none());
    }

    #[test]
    fn validation_error_keeps_editor_open_without_command() {
        let (mut model, _) = shell(UserRole::Admin);
        model.show(Section::Players);
        model.open_create(Section::Players);
        assert!(model.submit_editor().is_empty());
        let editor = model.editor.as_ref().unwrap();
        assert_eq!(editor.error.as_deref(), Some("Il campo 'Nome' è obbligatorio"));
    }

    #[test]
    fn delete_needs_confirmation() {
        let (mut model, _) = shell(UserRole::Admin);
        model.show(Section::Players);
        model.request_delete(Section::Players, 9, "Mario Rossi");
        model.cancel_delete();
        assert!(model.confirm_delete().is_empty());

        model.request_delete(Section::Players, 9, "Mario Rossi");
        assert_eq!(
            model.confirm_delete(),
            vec![Command::Delete { section: Section::Players, id: 9 }]
        );
    }

    fn stored_match(id: i64) -> Match {
        Match {
            id: Some(id),
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

    #[test]
    fn call_up_sheet_loads_then_saves() {
        let (mut model, _) = shell(UserRole::Admin);
        model.show(Section::Matches);
        assert_eq!(model.open_call_ups(&stored_match(4)), vec![Command::LoadCallUps { match_id: 4 }]);
        // nothing to submit until the roster arrives
        assert!(model.submit_call_ups().is_empty());

        let roster = vec![Player {
            id: Some(10),
            first_name: "Mario".into(),
            last_name: "Rossi".into(),
            role: None,
            jersey_number: Some(7),
            birth_year: None,
            fitness_cleared: false,
            clearance_expiry: None,
        }];
        model.handle(Event::CallUpsLoaded { match_id: 4, result: Ok((roster, Vec::new())) });
        model.call_ups.as_mut().unwrap().set_called(10, true);

        let commands = model.submit_call_ups();
        let [Command::SaveCallUps { match_id: 4, rows }] = commands.as_slice() else {
            panic!("save expected, got {:?}", commands);
        };
        assert_eq!(rows.len(), 1);
        assert!(model.saving);

        assert!(model.handle(Event::CallUpsSaved { match_id: 4, result: Ok(1) }).is_empty());
        assert!(model.call_ups.is_none());
        assert!(!model.saving);
    }

    #[test]
    fn failed_call_up_save_keeps_sheet_open() {
        let (mut model, _) = shell(UserRole::Admin);
        model.show(Section::Matches);
        model.open_call_ups(&stored_match(4));
        model.handle(Event::CallUpsLoaded { match_id: 4, result: Ok((Vec::new(), Vec::new())) });
        assert_eq!(model.submit_call_ups().len(), 1);

        let commands = model.handle(Event::CallUpsSaved {
            match_id: 4,
            result: Err(JbkError::Backend("permission denied".into())),
        });
        assert!(commands.is_empty());
        assert_eq!(model.alert.as_deref(), Some("permission denied"));
        assert_eq!(model.call_ups.as_ref().and_then(|s| s.error.as_deref()), Some("permission denied"));
    }

    #[test]
    fn read_only_users_cannot_open_call_ups() {
        let (mut model, _) = shell(UserRole::User);
        assert!(model.open_call_ups(&stored_match(4)).is_empty());
        assert!(model.call_ups.is_none());
    }

    #[test]
    fn logout_resets_to_login_even_on_failure() {
        let (mut model, _) = shell(UserRole::Admin);
        model.show(Section::Matches);
        assert_eq!(model.logout(), vec![Command::Logout]);
        model.handle(Event::LoggedOut(Err(JbkError::Network("offline".into()))));
        assert_eq!(model.screen, Screen::Login);
        assert!(model.router.visible_sections().is_empty());
        assert_eq!(model.matches, LoadState::Idle);
        assert_eq!(model.role, UserRole::User);
    }
}

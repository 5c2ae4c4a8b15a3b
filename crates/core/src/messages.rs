//! Messages exchanged between the view model and the backend runner

use crate::error::Result;
use crate::models::{CallUp, Match, MatchFilter, Player, Session, Training, UserRole};
use crate::stats::{DashboardSummary, TeamStatistics};
use crate::view::{Section, Ticket};

/// Work the view model asks the runner to perform
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Ask the backend for a stored session
    CheckSession,

    /// Resolve the username, then sign in with the resolved email
    Login { username: String, password: String },

    Logout,

    /// Fetch everything one section needs
    LoadSection { ticket: Ticket, filter: MatchFilter },

    /// Insert (`id == None`) or update one record
    Save { id: Option<i64>, record: RecordPayload },

    Delete { section: Section, id: i64 },

    /// Roster plus the stored call-ups of one match
    LoadCallUps { match_id: i64 },

    /// Replace every call-up of the match with `rows`
    SaveCallUps { match_id: i64, rows: Vec<CallUp> },
}

/// A validated record ready to be written
#[derive(Debug, Clone, PartialEq)]
pub enum RecordPayload {
    Match(Match),
    Player(Player),
    Training(Training),
}

impl RecordPayload {
    pub fn section(&self) -> Section {
        match self {
            RecordPayload::Match(_) => Section::Matches,
            RecordPayload::Player(_) => Section::Players,
            RecordPayload::Training(_) => Section::Trainings,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignedIn {
    pub session: Session,
    pub role: UserRole,
}

/// Section payloads; each one is the product of a single load
#[derive(Debug, Clone, PartialEq)]
pub enum SectionData {
    Dashboard(DashboardSummary),
    Matches(Vec<Match>),
    Players(Vec<Player>),
    Trainings {
        trainings: Vec<Training>,
        /// Roster used to mark attendance in the training editor
        roster: Vec<Player>,
    },
    Statistics(TeamStatistics),
}

/// Outcome of a [`Command`], fed back into the view model
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SessionChecked(Result<Option<SignedIn>>),

    LoggedIn(Result<SignedIn>),

    /// Sign-out finished; the login form is shown whatever the outcome
    LoggedOut(Result<()>),

    SectionLoaded {
        ticket: Ticket,
        data: Result<SectionData>,
    },

    Saved {
        section: Section,
        result: Result<()>,
    },

    Deleted {
        section: Section,
        result: Result<()>,
    },

    CallUpsLoaded {
        match_id: i64,
        result: Result<(Vec<Player>, Vec<CallUp>)>,
    },

    /// Number of call-ups written
    CallUpsSaved {
        match_id: i64,
        result: Result<usize>,
    },
}

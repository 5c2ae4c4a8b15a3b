//! Pure aggregation over already-fetched team collections.
//!
//! Nothing here performs I/O; callers pass `today` explicitly so results are
//! reproducible.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::{BTreeMap, HashSet};

use crate::models::{CallUp, Match, Player, PlayerRole, Training};

/// The three collections fetched together for dashboard and statistics views.
/// `call_ups` is only filled for the statistics view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamData {
    pub matches: Vec<Match>,
    pub players: Vec<Player>,
    pub trainings: Vec<Training>,
    pub call_ups: Vec<CallUp>,
}

/// Accepts ISO `YYYY-MM-DD` (optionally followed by a time) and `DD/MM/YYYY`
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let iso = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%d/%m/%Y"))
        .ok()
}

/// Trims seconds from `HH:MM:SS`
pub fn short_time(text: &str) -> &str {
    text.get(..5).filter(|_| text.len() > 5).unwrap_or(text)
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Gennaio",
        2 => "Febbraio",
        3 => "Marzo",
        4 => "Aprile",
        5 => "Maggio",
        6 => "Giugno",
        7 => "Luglio",
        8 => "Agosto",
        9 => "Settembre",
        10 => "Ottobre",
        11 => "Novembre",
        12 => "Dicembre",
        _ => "?",
    }
}

// ============================================================================
// Match results
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

/// Classify a match. Result text wins when present ("vinto" → win,
/// "pareggio" → draw, anything else → loss, case-insensitive); otherwise both
/// scores decide. Matches with neither are unplayed.
pub fn classify(m: &Match) -> Option<MatchOutcome> {
    if let Some(text) = m.result.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let lower = text.to_lowercase();
        return Some(if lower.contains("vinto") {
            MatchOutcome::Win
        } else if lower.contains("pareggio") {
            MatchOutcome::Draw
        } else {
            MatchOutcome::Loss
        });
    }
    match (m.our_score, m.opponent_score) {
        (Some(ours), Some(theirs)) if ours > theirs => Some(MatchOutcome::Win),
        (Some(ours), Some(theirs)) if ours == theirs => Some(MatchOutcome::Draw),
        (Some(_), Some(_)) => Some(MatchOutcome::Loss),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchRecord {
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub total: usize,
}

impl MatchRecord {
    pub fn win_percentage(&self) -> Option<f32> {
        if self.total == 0 {
            None
        } else {
            Some(self.wins as f32 / self.total as f32 * 100.0)
        }
    }
}

pub fn match_record(matches: &[Match]) -> MatchRecord {
    let mut record = MatchRecord::default();
    for outcome in matches.iter().filter_map(classify) {
        match outcome {
            MatchOutcome::Win => record.wins += 1,
            MatchOutcome::Draw => record.draws += 1,
            MatchOutcome::Loss => record.losses += 1,
        }
        record.total += 1;
    }
    record
}

/// Points per game over matches with both scores recorded
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoringAverages {
    pub games: usize,
    pub scored: f32,
    pub conceded: f32,
}

pub fn scoring_averages(matches: &[Match]) -> ScoringAverages {
    let scored: Vec<(i32, i32)> = matches
        .iter()
        .filter_map(|m| Some((m.our_score?, m.opponent_score?)))
        .collect();
    if scored.is_empty() {
        return ScoringAverages::default();
    }
    let games = scored.len();
    let total_for: i32 = scored.iter().map(|(ours, _)| ours).sum();
    let total_against: i32 = scored.iter().map(|(_, theirs)| theirs).sum();
    ScoringAverages {
        games,
        scored: total_for as f32 / games as f32,
        conceded: total_against as f32 / games as f32,
    }
}

// ============================================================================
// Roster
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCount {
    /// `None` is the unspecified bucket
    pub role: Option<PlayerRole>,
    pub count: usize,
}

impl RoleCount {
    pub fn label(&self) -> &'static str {
        self.role.map(|r| r.label()).unwrap_or("Non specificato")
    }
}

/// Non-empty role buckets in court order, unspecified last
pub fn players_by_role(players: &[Player]) -> Vec<RoleCount> {
    let mut counts: BTreeMap<Option<PlayerRole>, usize> = BTreeMap::new();
    for player in players {
        *counts.entry(player.role).or_insert(0) += 1;
    }
    let unspecified = counts.remove(&None);
    counts
        .into_iter()
        .map(|(role, count)| RoleCount { role, count })
        .chain(unspecified.map(|count| RoleCount { role: None, count }))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearanceStatus {
    NotCleared,
    Cleared,
    Expired,
}

impl ClearanceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ClearanceStatus::NotCleared => "Non idoneo",
            ClearanceStatus::Cleared => "Idoneo",
            ClearanceStatus::Expired => "Scaduto",
        }
    }
}

pub fn clearance_status(player: &Player, today: NaiveDate) -> ClearanceStatus {
    if !player.fitness_cleared {
        return ClearanceStatus::NotCleared;
    }
    match player.clearance_expiry.as_deref().and_then(parse_date) {
        Some(expiry) if today > expiry => ClearanceStatus::Expired,
        _ => ClearanceStatus::Cleared,
    }
}

// ============================================================================
// Trainings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCount {
    pub month: u32,
    pub count: usize,
}

impl MonthCount {
    pub fn label(&self) -> &'static str {
        month_name(self.month)
    }
}

/// Training counts per calendar month, ascending by month number
pub fn trainings_by_month(trainings: &[Training]) -> Vec<MonthCount> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for date in trainings.iter().filter_map(|t| parse_date(&t.date)) {
        *counts.entry(date.month()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(month, count)| MonthCount { month, count })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceStats {
    pub player_id: i64,
    pub name: String,
    pub presences: usize,
    pub excused: usize,
    pub absences: usize,
    pub total_trainings: usize,
}

impl AttendanceStats {
    pub fn percentage(&self) -> f32 {
        if self.total_trainings == 0 {
            0.0
        } else {
            self.presences as f32 / self.total_trainings as f32 * 100.0
        }
    }
}

/// Per-player attendance over every training, most present first
pub fn attendance(players: &[Player], trainings: &[Training]) -> Vec<AttendanceStats> {
    let mut stats: Vec<AttendanceStats> = players
        .iter()
        .filter_map(|p| {
            let id = p.id?;
            let mut entry = AttendanceStats {
                player_id: id,
                name: p.full_name(),
                presences: 0,
                excused: 0,
                absences: 0,
                total_trainings: trainings.len(),
            };
            for training in trainings {
                if training.attendance.contains(&id) {
                    entry.presences += 1;
                } else if training.excused.contains(&id) {
                    entry.excused += 1;
                } else {
                    entry.absences += 1;
                }
            }
            Some(entry)
        })
        .collect();
    stats.sort_by(|a, b| b.presences.cmp(&a.presences).then_with(|| a.name.cmp(&b.name)));
    stats
}

// ============================================================================
// Player evaluation
// ============================================================================

/// Call-up counts for one player over the recorded matches
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CallUpStats {
    /// Accepted call-ups; an accepted call-up counts as a game played
    pub called_up: usize,
    pub refused: usize,
    pub total_matches: usize,
}

impl CallUpStats {
    pub fn percentage(&self) -> f32 {
        if self.total_matches == 0 {
            0.0
        } else {
            self.called_up as f32 / self.total_matches as f32 * 100.0
        }
    }
}

pub fn call_up_stats(player_id: i64, matches: &[Match], call_ups: &[CallUp]) -> CallUpStats {
    let match_ids: HashSet<i64> = matches.iter().filter_map(|m| m.id).collect();
    let mut stats = CallUpStats {
        total_matches: matches.len(),
        ..Default::default()
    };
    for call_up in call_ups
        .iter()
        .filter(|c| c.player_id == player_id && match_ids.contains(&c.match_id))
    {
        if call_up.refused {
            stats.refused += 1;
        } else {
            stats.called_up += 1;
        }
    }
    stats
}

const WEIGHT_ATTENDANCE: f32 = 0.25;
const WEIGHT_CALL_UPS: f32 = 0.25;
const WEIGHT_GAMES_PLAYED: f32 = 0.15;
const WEIGHT_GAME_RATING: f32 = 0.25;
const WEIGHT_PLUS_MINUS: f32 = 0.05;
const WEIGHT_EXCUSED: f32 = 0.05;

/// Score used for a factor with no data behind it
const NEUTRAL_SCORE: f32 = 6.0;
/// No box scores are recorded, so rating and +/- stay at their neutral marks
const NEUTRAL_GAME_RATING: f32 = 6.0;
const NEUTRAL_PLUS_MINUS: f32 = 5.0;

const REFUSAL_PENALTY: f32 = 0.5;
const MAX_REFUSAL_PENALTY: f32 = 3.0;

/// First band whose threshold `value` reaches, else `floor`
fn band(value: f32, bands: &[(f32, f32)], floor: f32) -> f32 {
    bands
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(_, score)| *score)
        .unwrap_or(floor)
}

/// Overall 0-10 mark for one player
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerEvaluation {
    pub player_id: i64,
    pub name: String,
    pub attendance_percentage: f32,
    pub excused: usize,
    pub call_ups: CallUpStats,
    pub rating: f32,
}

pub fn evaluate(attendance: &AttendanceStats, call_ups: &CallUpStats) -> f32 {
    let attendance_score = band(
        attendance.percentage(),
        &[(90.0, 10.0), (80.0, 8.5), (70.0, 7.0), (60.0, 5.5), (50.0, 4.0), (30.0, 2.5)],
        1.0,
    );

    let call_up_score = if call_ups.total_matches == 0 {
        NEUTRAL_SCORE
    } else {
        band(
            call_ups.percentage(),
            &[(80.0, 10.0), (70.0, 8.5), (60.0, 7.0), (50.0, 5.5), (40.0, 4.0), (20.0, 2.5)],
            1.0,
        )
    };

    // every accepted call-up counts as played
    let played_score = if call_ups.called_up == 0 { NEUTRAL_SCORE } else { 10.0 };

    let excused_bonus = if attendance.total_trainings == 0 {
        0.0
    } else {
        let pct = attendance.excused as f32 / attendance.total_trainings as f32 * 100.0;
        (pct / 15.0).min(1.0)
    };

    let penalty = (call_ups.refused as f32 * REFUSAL_PENALTY).min(MAX_REFUSAL_PENALTY);

    let rating = attendance_score * WEIGHT_ATTENDANCE
        + call_up_score * WEIGHT_CALL_UPS
        + played_score * WEIGHT_GAMES_PLAYED
        + NEUTRAL_GAME_RATING * WEIGHT_GAME_RATING
        + NEUTRAL_PLUS_MINUS * WEIGHT_PLUS_MINUS
        + excused_bonus * WEIGHT_EXCUSED
        - penalty;
    rating.clamp(0.0, 10.0)
}

/// Evaluation card for every player, best first
pub fn player_evaluations(data: &TeamData) -> Vec<PlayerEvaluation> {
    let mut evaluations: Vec<PlayerEvaluation> = attendance(&data.players, &data.trainings)
        .into_iter()
        .map(|att| {
            let call_ups = call_up_stats(att.player_id, &data.matches, &data.call_ups);
            PlayerEvaluation {
                player_id: att.player_id,
                attendance_percentage: att.percentage(),
                excused: att.excused,
                rating: evaluate(&att, &call_ups),
                call_ups,
                name: att.name,
            }
        })
        .collect();
    evaluations.sort_by(|a, b| b.rating.total_cmp(&a.rating).then_with(|| a.name.cmp(&b.name)));
    evaluations
}

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgendaKind {
    Training,
    Match,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgendaEntry {
    pub kind: AgendaKind,
    pub date: NaiveDate,
    pub time: String,
    pub place: Option<String>,
    pub opponent: Option<String>,
}

impl AgendaEntry {
    pub fn describe(&self) -> String {
        let mut text = match self.kind {
            AgendaKind::Training => "Allenamento".to_string(),
            AgendaKind::Match => "Partita".to_string(),
        };
        text.push_str(&format!(" - {}", self.date.format("%d/%m/%Y")));
        if !self.time.is_empty() {
            text.push_str(&format!(" ore {}", short_time(&self.time)));
        }
        if let Some(place) = self.place.as_deref().filter(|p| !p.is_empty()) {
            text.push_str(&format!(" @ {}", place));
        }
        if let Some(opponent) = &self.opponent {
            text.push_str(&format!(" vs {}", opponent));
        }
        text
    }
}

pub const AGENDA_DAYS: i64 = 7;
pub const AGENDA_MAX_ENTRIES: usize = 5;
const AGENDA_FALLBACK_MATCHES: usize = 2;

fn match_entry(m: &Match, date: NaiveDate) -> AgendaEntry {
    AgendaEntry {
        kind: AgendaKind::Match,
        date,
        time: m.time.clone(),
        place: m.venue.clone(),
        opponent: Some(m.opponent.clone()),
    }
}

/// Commitments in the next week. When no match falls in the window, the next
/// two upcoming matches are listed instead.
pub fn weekly_agenda(matches: &[Match], trainings: &[Training], today: NaiveDate) -> Vec<AgendaEntry> {
    let horizon = today + Duration::days(AGENDA_DAYS);
    let in_window = |d: &NaiveDate| *d >= today && *d <= horizon;

    let mut entries: Vec<AgendaEntry> = trainings
        .iter()
        .filter_map(|t| {
            let date = parse_date(&t.date).filter(in_window)?;
            Some(AgendaEntry {
                kind: AgendaKind::Training,
                date,
                time: t.time.clone(),
                place: t.location.clone(),
                opponent: None,
            })
        })
        .collect();

    let week_matches: Vec<AgendaEntry> = matches
        .iter()
        .filter_map(|m| parse_date(&m.date).filter(in_window).map(|d| match_entry(m, d)))
        .collect();

    if week_matches.is_empty() {
        let mut upcoming: Vec<(NaiveDate, &Match)> = matches
            .iter()
            .filter_map(|m| parse_date(&m.date).filter(|d| *d >= today).map(|d| (d, m)))
            .collect();
        upcoming.sort_by_key(|(d, _)| *d);
        entries.extend(
            upcoming
                .into_iter()
                .take(AGENDA_FALLBACK_MATCHES)
                .map(|(d, m)| match_entry(m, d)),
        );
    } else {
        entries.extend(week_matches);
    }

    entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
    entries.truncate(AGENDA_MAX_ENTRIES);
    entries
}

pub const DASHBOARD_RECENT_MATCHES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub players: usize,
    pub matches: usize,
    pub trainings: usize,
    pub record: MatchRecord,
    /// Most recent first
    pub recent_matches: Vec<Match>,
    pub agenda: Vec<AgendaEntry>,
    pub expired_clearances: usize,
}

pub fn dashboard_summary(data: &TeamData, today: NaiveDate) -> DashboardSummary {
    let mut recent = data.matches.clone();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(DASHBOARD_RECENT_MATCHES);

    DashboardSummary {
        players: data.players.len(),
        matches: data.matches.len(),
        trainings: data.trainings.len(),
        record: match_record(&data.matches),
        recent_matches: recent,
        agenda: weekly_agenda(&data.matches, &data.trainings, today),
        expired_clearances: data
            .players
            .iter()
            .filter(|p| clearance_status(p, today) == ClearanceStatus::Expired)
            .count(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamStatistics {
    pub record: MatchRecord,
    pub scoring: ScoringAverages,
    pub roles: Vec<RoleCount>,
    pub months: Vec<MonthCount>,
    pub attendance: Vec<AttendanceStats>,
    pub evaluations: Vec<PlayerEvaluation>,
}

pub fn team_statistics(data: &TeamData) -> TeamStatistics {
    TeamStatistics {
        record: match_record(&data.matches),
        scoring: scoring_averages(&data.matches),
        roles: players_by_role(&data.players),
        months: trainings_by_month(&data.trainings),
        attendance: attendance(&data.players, &data.trainings),
        evaluations: player_evaluations(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchCategory;

    fn game(date: &str, result: Option<&str>, scores: Option<(i32, i32)>) -> Match {
        Match {
            id: None,
            date: date.to_string(),
            time: "18:00".to_string(),
            opponent: "Avversario".to_string(),
            venue: Some("PalaJBK".to_string()),
            is_home: true,
            category: MatchCategory::RegularSeason,
            our_score: scores.map(|s| s.0),
            opponent_score: scores.map(|s| s.1),
            result: result.map(String::from),
            notes: None,
        }
    }

    fn training(id: i64, date: &str, attendance: Vec<i64>, excused: Vec<i64>) -> Training {
        Training {
            id: Some(id),
            date: date.to_string(),
            time: "19:00:00".to_string(),
            end_time: None,
            location: Some("Palestra".to_string()),
            kind: None,
            notes: None,
            attendance,
            excused,
        }
    }

    fn player(id: i64, last: &str, role: Option<PlayerRole>) -> Player {
        Player {
            id: Some(id),
            first_name: "Luca".to_string(),
            last_name: last.to_string(),
            role,
            jersey_number: None,
            birth_year: None,
            fitness_cleared: true,
            clearance_expiry: None,
        }
    }

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn empty_matches_give_zero_record() {
        assert_eq!(match_record(&[]), MatchRecord { wins: 0, draws: 0, losses: 0, total: 0 });
        assert_eq!(match_record(&[]).win_percentage(), None);
    }

    #[test]
    fn result_text_classification() {
        let matches = vec![
            game("2025-01-01", Some("Vinto 80-70"), None),
            game("2025-01-02", Some("Pareggio"), None),
            game("2025-01-03", Some("Perso"), None),
        ];
        assert_eq!(match_record(&matches), MatchRecord { wins: 1, draws: 1, losses: 1, total: 3 });
    }

    #[test]
    fn classification_is_case_insensitive_and_falls_back_to_scores() {
        assert_eq!(classify(&game("2025-01-01", Some("VINTO ai supplementari"), None)), Some(MatchOutcome::Win));
        assert_eq!(classify(&game("2025-01-01", None, Some((60, 58)))), Some(MatchOutcome::Win));
        assert_eq!(classify(&game("2025-01-01", Some("  "), Some((50, 50)))), Some(MatchOutcome::Draw));
        assert_eq!(classify(&game("2025-01-01", None, Some((40, 58)))), Some(MatchOutcome::Loss));
        assert_eq!(classify(&game("2025-01-01", None, None)), None);
    }

    #[test]
    fn unplayed_matches_are_not_counted() {
        let matches = vec![game("2025-01-01", None, None), game("2025-01-02", None, Some((70, 60)))];
        let record = match_record(&matches);
        assert_eq!(record.total, 1);
        assert_eq!(record.win_percentage(), Some(100.0));
    }

    #[test]
    fn trainings_grouped_by_month_ascending() {
        let trainings = vec![
            training(1, "2025-03-04", vec![], vec![]),
            training(2, "2025-01-15", vec![], vec![]),
            training(3, "2025-03-20", vec![], vec![]),
        ];
        let months = trainings_by_month(&trainings);
        assert_eq!(months, vec![MonthCount { month: 1, count: 1 }, MonthCount { month: 3, count: 2 }]);
        assert_eq!(months[0].label(), "Gennaio");
        assert_eq!(months[1].label(), "Marzo");
    }

    #[test]
    fn roles_have_unspecified_bucket_last() {
        let players = vec![
            player(1, "A", Some(PlayerRole::Center)),
            player(2, "B", None),
            player(3, "C", Some(PlayerRole::PointGuard)),
            player(4, "D", Some(PlayerRole::Center)),
        ];
        let roles = players_by_role(&players);
        assert_eq!(roles.len(), 3);
        assert_eq!(roles[0], RoleCount { role: Some(PlayerRole::PointGuard), count: 1 });
        assert_eq!(roles[1], RoleCount { role: Some(PlayerRole::Center), count: 2 });
        assert_eq!(roles[2].label(), "Non specificato");
        assert_eq!(roles[2].count, 1);
    }

    #[test]
    fn attendance_counts_presences_and_excused() {
        let players = vec![player(1, "Bianchi", None), player(2, "Verdi", None)];
        let trainings = vec![
            training(1, "2025-01-01", vec![1, 2], vec![]),
            training(2, "2025-01-03", vec![2], vec![1]),
            training(3, "2025-01-05", vec![2], vec![]),
        ];
        let stats = attendance(&players, &trainings);
        assert_eq!(stats[0].player_id, 2);
        assert_eq!(stats[0].presences, 3);
        assert_eq!(stats[0].percentage(), 100.0);
        assert_eq!(stats[1].presences, 1);
        assert_eq!(stats[1].excused, 1);
        assert_eq!(stats[1].absences, 1);
    }

    #[test]
    fn clearance_expiry_accepts_both_date_formats() {
        let today = day("2025-06-01");
        let mut p = player(1, "Neri", None);
        p.clearance_expiry = Some("31/05/2025".to_string());
        assert_eq!(clearance_status(&p, today), ClearanceStatus::Expired);
        p.clearance_expiry = Some("2025-06-01".to_string());
        assert_eq!(clearance_status(&p, today), ClearanceStatus::Cleared);
        p.fitness_cleared = false;
        assert_eq!(clearance_status(&p, today), ClearanceStatus::NotCleared);
    }

    #[test]
    fn agenda_falls_back_to_next_matches() {
        let today = day("2025-02-01");
        let matches = vec![
            game("2025-03-01", None, None),
            game("2025-02-20", None, None),
            game("2025-04-01", None, None),
            game("2025-01-01", None, None),
        ];
        let trainings = vec![training(1, "2025-02-03", vec![], vec![]), training(2, "2025-02-15", vec![], vec![])];
        let agenda = weekly_agenda(&matches, &trainings, today);
        let dates: Vec<String> = agenda.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-02-03", "2025-02-20", "2025-03-01"]);
        assert_eq!(agenda[0].kind, AgendaKind::Training);
        assert!(agenda[1].describe().starts_with("Partita - 20/02/2025 ore 18:00"));
    }

    #[test]
    fn agenda_keeps_week_matches_only_when_present() {
        let today = day("2025-02-01");
        let matches = vec![game("2025-02-05", None, None), game("2025-02-25", None, None)];
        let agenda = weekly_agenda(&matches, &[], today);
        assert_eq!(agenda.len(), 1);
        assert_eq!(agenda[0].date, day("2025-02-05"));
    }

    #[test]
    fn dashboard_summary_lists_recent_matches_first() {
        let data = TeamData {
            matches: vec![
                game("2025-01-01", Some("Vinto"), None),
                game("2025-03-01", Some("Perso"), None),
                game("2025-02-01", Some("Pareggio"), None),
            ],
            players: vec![player(1, "A", None)],
            ..Default::default()
        };
        let summary = dashboard_summary(&data, day("2025-06-01"));
        assert_eq!(summary.matches, 3);
        assert_eq!(summary.players, 1);
        assert_eq!(summary.recent_matches[0].date, "2025-03-01");
        assert_eq!(summary.record.total, 3);
    }

    fn call_up(match_id: i64, player_id: i64, refused: bool) -> CallUp {
        CallUp { id: None, match_id, player_id, starter: false, refused }
    }

    #[test]
    fn call_ups_ignore_unknown_matches() {
        let mut first = game("2025-01-01", None, None);
        first.id = Some(1);
        let mut second = game("2025-01-08", None, None);
        second.id = Some(2);
        let call_ups = vec![call_up(1, 5, false), call_up(2, 5, true), call_up(99, 5, false), call_up(1, 6, false)];
        let stats = call_up_stats(5, &[first, second], &call_ups);
        assert_eq!(stats, CallUpStats { called_up: 1, refused: 1, total_matches: 2 });
        assert_eq!(stats.percentage(), 50.0);
    }

    #[test]
    fn evaluation_rewards_attendance_and_penalises_refusals() {
        let mut first = game("2025-01-01", None, None);
        first.id = Some(1);
        let mut second = game("2025-01-08", None, None);
        second.id = Some(2);
        let data = TeamData {
            matches: vec![first, second],
            players: vec![player(1, "Bianchi", None), player(2, "Verdi", None)],
            trainings: vec![
                training(1, "2025-01-02", vec![1], vec![2]),
                training(2, "2025-01-04", vec![1], vec![]),
                training(3, "2025-01-06", vec![1], vec![]),
            ],
            call_ups: vec![call_up(1, 1, false), call_up(2, 1, false), call_up(1, 2, true)],
        };

        let evaluations = player_evaluations(&data);
        assert_eq!(evaluations[0].player_id, 1);
        assert!((evaluations[0].rating - 8.25).abs() < 1e-4);
        assert_eq!(evaluations[1].player_id, 2);
        assert_eq!(evaluations[1].call_ups.refused, 1);
        assert!((evaluations[1].rating - 2.7).abs() < 1e-4);
    }

    #[test]
    fn evaluation_without_matches_uses_neutral_marks() {
        let att = AttendanceStats {
            player_id: 1,
            name: "Luca Rossi".into(),
            presences: 0,
            excused: 0,
            absences: 0,
            total_trainings: 0,
        };
        // 1.0 * 0.25 + 6 * 0.25 + 6 * 0.15 + 6 * 0.25 + 5 * 0.05
        assert!((evaluate(&att, &CallUpStats::default()) - 4.4).abs() < 1e-4);
    }

    #[test]
    fn refusal_penalty_is_capped() {
        let att = AttendanceStats {
            player_id: 1,
            name: "Luca Rossi".into(),
            presences: 0,
            excused: 0,
            absences: 4,
            total_trainings: 4,
        };
        let many = CallUpStats { called_up: 0, refused: 10, total_matches: 10 };
        // 0.25 + 0.25 + 0.9 + 1.5 + 0.25 - 3.0
        assert!((evaluate(&att, &many) - 0.15).abs() < 1e-4);
    }

    #[test]
    fn short_time_drops_seconds() {
        assert_eq!(short_time("19:00:00"), "19:00");
        assert_eq!(short_time("19:00"), "19:00");
        assert_eq!(short_time(""), "");
    }
}

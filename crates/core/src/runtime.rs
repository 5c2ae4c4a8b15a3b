//! Executes [`Command`]s against a [`Backend`] and reports the [`Event`]

use chrono::NaiveDate;
use futures_util::future::{try_join, try_join3};

use crate::backend::{
    call_ups_query, fetch_all, lookup_profile, matches_query, players_query, save_record, trainings_query, Backend,
    Query,
};
use crate::error::{JbkError, Result};
use crate::messages::{Command, Event, RecordPayload, SectionData, SignedIn};
use crate::models::{CallUp, Match, MatchFilter, Player, Profile, Table, Training, UserRole};
use crate::stats::{dashboard_summary, team_statistics, TeamData};
use crate::view::Section;

pub async fn execute(backend: &dyn Backend, command: Command, today: NaiveDate) -> Event {
    match command {
        Command::CheckSession => Event::SessionChecked(check_session(backend).await),
        Command::Login { username, password } => Event::LoggedIn(login(backend, &username, &password).await),
        Command::Logout => {
            let result = backend.sign_out().await;
            if let Err(e) = &result {
                tracing::warn!("Sign-out failed: {}", e);
            }
            Event::LoggedOut(result)
        }
        Command::LoadSection { ticket, filter } => Event::SectionLoaded {
            ticket,
            data: load_section(backend, ticket.section, filter, today).await,
        },
        Command::Save { id, record } => Event::Saved {
            section: record.section(),
            result: save(backend, &record, id).await,
        },
        Command::Delete { section, id } => Event::Deleted {
            section,
            result: delete(backend, section, id).await,
        },
        Command::LoadCallUps { match_id } => Event::CallUpsLoaded {
            match_id,
            result: load_call_ups(backend, match_id).await,
        },
        Command::SaveCallUps { match_id, rows } => Event::CallUpsSaved {
            match_id,
            result: save_call_ups(backend, match_id, rows).await,
        },
    }
}

async fn check_session(backend: &dyn Backend) -> Result<Option<SignedIn>> {
    let Some(session) = backend.current_session().await? else {
        return Ok(None);
    };
    let role = match &session.email {
        Some(email) => role_for_email(backend, email).await,
        None => UserRole::default(),
    };
    Ok(Some(SignedIn { session, role }))
}

async fn role_for_email(backend: &dyn Backend, email: &str) -> UserRole {
    let query = Query::new().columns("username,email,role").eq("email", email).limit(1);
    match backend.select(Table::Profiles, &query).await {
        Ok(rows) => rows
            .into_iter()
            .next()
            .and_then(|row| serde_json::from_value::<Profile>(row).ok())
            .map(|p| p.role)
            .unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Could not read role for {}: {}", email, e);
            UserRole::default()
        }
    }
}

/// Username lookup first; credentials are only sent once it resolves
pub async fn login(backend: &dyn Backend, username: &str, password: &str) -> Result<SignedIn> {
    let profile = lookup_profile(backend, username.trim()).await?;
    let session = backend.sign_in_with_password(&profile.email, password).await?;
    tracing::info!("Signed in as {} ({})", username.trim(), profile.role.label());
    Ok(SignedIn { session, role: profile.role })
}

/// Fan-out fetch of the three collections; fails as a whole
pub async fn fetch_team_data(backend: &dyn Backend) -> Result<TeamData> {
    let matches_q = matches_query(MatchFilter::All);
    let players_q = players_query();
    let trainings_q = trainings_query();
    let (matches, players, trainings) = try_join3(
        fetch_all::<Match>(backend, &matches_q),
        fetch_all::<Player>(backend, &players_q),
        fetch_all::<Training>(backend, &trainings_q),
    )
    .await?;
    Ok(TeamData {
        matches,
        players,
        trainings,
        call_ups: Vec::new(),
    })
}

async fn load_section(
    backend: &dyn Backend,
    section: Section,
    filter: MatchFilter,
    today: NaiveDate,
) -> Result<SectionData> {
    let data = match section {
        Section::Dashboard => {
            let team = fetch_team_data(backend).await?;
            SectionData::Dashboard(dashboard_summary(&team, today))
        }
        Section::Statistics => {
            let call_ups_q = call_ups_query(None);
            let (mut team, call_ups) =
                try_join(fetch_team_data(backend), fetch_all::<CallUp>(backend, &call_ups_q)).await?;
            team.call_ups = call_ups;
            SectionData::Statistics(team_statistics(&team))
        }
        Section::Matches => SectionData::Matches(fetch_all(backend, &matches_query(filter)).await?),
        Section::Players => SectionData::Players(fetch_all(backend, &players_query()).await?),
        Section::Trainings => {
            let trainings_q = trainings_query();
            let players_q = players_query();
            let (trainings, roster) = try_join(
                fetch_all::<Training>(backend, &trainings_q),
                fetch_all::<Player>(backend, &players_q),
            )
            .await?;
            SectionData::Trainings { trainings, roster }
        }
    };
    Ok(data)
}

async fn save(backend: &dyn Backend, record: &RecordPayload, id: Option<i64>) -> Result<()> {
    let result = match record {
        RecordPayload::Match(m) => save_record(backend, m, id).await,
        RecordPayload::Player(p) => save_record(backend, p, id).await,
        RecordPayload::Training(t) => save_record(backend, t, id).await,
    };
    match &result {
        Ok(()) => tracing::info!("Saved {} record (id {:?})", record.section().id(), id),
        Err(e) => tracing::error!("Saving {} record failed: {}", record.section().id(), e),
    }
    result
}

fn table_for(section: Section) -> Result<Table> {
    match section {
        Section::Matches => Ok(Table::Matches),
        Section::Players => Ok(Table::Players),
        Section::Trainings => Ok(Table::Trainings),
        Section::Dashboard | Section::Statistics => Err(JbkError::InvalidData(format!(
            "La sezione {} non contiene record modificabili",
            section.title()
        ))),
    }
}

async fn delete(backend: &dyn Backend, section: Section, id: i64) -> Result<()> {
    let table = table_for(section)?;
    let result = backend.delete(table, id).await;
    if let Err(e) = &result {
        tracing::error!("Deleting {} {} failed: {}", table.name(), id, e);
    }
    result
}

async fn load_call_ups(backend: &dyn Backend, match_id: i64) -> Result<(Vec<Player>, Vec<CallUp>)> {
    let players_q = players_query();
    let call_ups_q = call_ups_query(Some(match_id));
    try_join(
        fetch_all::<Player>(backend, &players_q),
        fetch_all::<CallUp>(backend, &call_ups_q),
    )
    .await
}

/// Clears the match's call-ups, then inserts the new sheet row by row
async fn replace_call_ups(backend: &dyn Backend, match_id: i64, rows: &[CallUp]) -> Result<usize> {
    backend
        .delete_where(Table::CallUps, &call_ups_query(Some(match_id)))
        .await?;
    for row in rows {
        save_record(backend, row, None).await?;
    }
    Ok(rows.len())
}

async fn save_call_ups(backend: &dyn Backend, match_id: i64, rows: Vec<CallUp>) -> Result<usize> {
    let result = replace_call_ups(backend, match_id, &rows).await;
    match &result {
        Ok(count) => tracing::info!("Saved {} call-up(s) for match {}", count, match_id),
        Err(e) => tracing::error!("Saving call-ups for match {} failed: {}", match_id, e),
    }
    result
}

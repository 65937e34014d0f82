//! Typed parsing of Yahoo Fantasy API responses
//!
//! Yahoo's JSON encodes collections as objects with numbered keys plus a
//! `count`, and entities as lists of single-key fragments. These functions walk
//! that layout and return typed values, or `UnexpectedShape` naming the first
//! thing that did not match.

use power_rankings::{Team, TeamId};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{FetcherError, Result};
use crate::models::{LeagueInfo, Matchup, MatchupTeam, WeekScoreboard};

/// Parse the `/league/{key}/teams` response
pub fn parse_teams(root: &Value, season: i32) -> Result<Vec<Team>> {
    let teams = league_section(root, 1)?
        .get("teams")
        .ok_or_else(|| FetcherError::shape("league has no teams section"))?;

    numbered(teams)
        .map(|(i, wrapper)| {
            let fragments = wrapper
                .get("team")
                .and_then(|t| t.get(0))
                .ok_or_else(|| FetcherError::shape(format!("teams.{i} has no team fragments")))?;
            let meta = merge_fragments(fragments);

            let team_id = team_id_of(&meta, &format!("teams.{i}"))?;
            let name = meta
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| FetcherError::shape(format!("teams.{i} has no name")))?;

            Ok(Team::new(team_id, name, season))
        })
        .collect()
}

/// Parse the `/league/{key}` metadata response
pub fn parse_league_info(root: &Value) -> Result<LeagueInfo> {
    let league = league_section(root, 0)?;

    let league_key = league
        .get("league_key")
        .and_then(Value::as_str)
        .ok_or_else(|| FetcherError::shape("league has no league_key"))?
        .to_string();
    let name = league.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
    let season = league.get("season").and_then(as_u64).and_then(|s| i32::try_from(s).ok());
    let current_week = league
        .get("current_week")
        .and_then(as_u64)
        .and_then(|w| u32::try_from(w).ok())
        .ok_or_else(|| FetcherError::shape("league has no current_week"))?;

    let is_finished = league.get("is_finished").and_then(as_u64) == Some(1);

    Ok(LeagueInfo { league_key, name, season, current_week, is_finished })
}

/// Parse the `/league/{key}/scoreboard;week={week}` response
pub fn parse_scoreboard(root: &Value, week: u32) -> Result<WeekScoreboard> {
    let scoreboard = league_section(root, 1)?
        .get("scoreboard")
        .ok_or_else(|| FetcherError::shape("league has no scoreboard section"))?;

    let mut matchups = Vec::new();
    for (_, group) in numbered(scoreboard) {
        let Some(group_matchups) = group.get("matchups") else {
            continue;
        };

        for (m, wrapper) in numbered(group_matchups) {
            let teams = wrapper
                .get("matchup")
                .and_then(|matchup| matchup.get("0"))
                .and_then(|inner| inner.get("teams"))
                .ok_or_else(|| FetcherError::shape(format!("matchup {m} has no teams")))?;

            let sides = numbered(teams)
                .map(|(t, side)| parse_matchup_team(side, &format!("matchup {m} team {t}")))
                .collect::<Result<Vec<_>>>()?;

            if sides.len() != 2 {
                warn!("Week {} matchup {} has {} teams; skipping", week, m, sides.len());
                continue;
            }
            matchups.push(Matchup { teams: sides });
        }
    }

    Ok(WeekScoreboard { week, matchups })
}

fn parse_matchup_team(side: &Value, context: &str) -> Result<MatchupTeam> {
    let parts = side
        .get("team")
        .and_then(Value::as_array)
        .ok_or_else(|| FetcherError::shape(format!("{context} has no team entry")))?;
    let (Some(fragments), Some(stats)) = (parts.first(), parts.get(1)) else {
        return Err(FetcherError::shape(format!("{context} is missing metadata or stats")));
    };

    let meta = merge_fragments(fragments);
    let team_id = team_id_of(&meta, context)?;
    let name = meta.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
    let points = stats
        .get("team_points")
        .and_then(|p| p.get("total"))
        .and_then(as_f64)
        .ok_or_else(|| FetcherError::shape(format!("{context} has no team_points.total")))?;

    Ok(MatchupTeam { team_id, name, points })
}

/// `fantasy_content.league[index]`
fn league_section(root: &Value, index: usize) -> Result<&Value> {
    root.get("fantasy_content")
        .and_then(|c| c.get("league"))
        .and_then(Value::as_array)
        .and_then(|league| league.get(index))
        .ok_or_else(|| FetcherError::shape(format!("fantasy_content.league[{index}] missing")))
}

/// Entries of a numbered collection object, in numeric key order
fn numbered(collection: &Value) -> impl Iterator<Item = (usize, &Value)> {
    let mut entries: Vec<(usize, &Value)> = collection
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter_map(|(key, value)| key.parse::<usize>().ok().map(|i| (i, value)))
                .collect()
        })
        .unwrap_or_default();
    entries.sort_by_key(|(i, _)| *i);
    entries.into_iter()
}

/// Flatten a list of single-key fragments into one object. Non-object
/// fragments (Yahoo pads with empty lists) are skipped.
fn merge_fragments(fragments: &Value) -> Map<String, Value> {
    let mut merged = Map::new();
    for fragment in fragments.as_array().into_iter().flatten() {
        if let Some(obj) = fragment.as_object() {
            for (key, value) in obj {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}

fn team_id_of(meta: &Map<String, Value>, context: &str) -> Result<TeamId> {
    meta.get("team_id")
        .and_then(as_u64)
        .and_then(|id| u32::try_from(id).ok())
        .map(TeamId)
        .ok_or_else(|| FetcherError::shape(format!("{context} has no numeric team_id")))
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

//! Per-week result derivation
//!
//! A week's scoreboard becomes one [`WeeklyRow`] per team:
//! - `wins`: 1 for the strictly higher scorer of its matchup, 0 otherwise
//!   (a tied matchup awards no win)
//! - `points_for`: the team's points that week
//! - `head_to_head_wins`: how many teams in the whole league it outscored that
//!   week, i.e. its record had it played everyone

use power_rankings::WeeklyRow;

use crate::models::WeekScoreboard;

/// Derive the weekly rows of one scoreboard
pub fn derive_weekly_rows(season: i32, scoreboard: &WeekScoreboard) -> Vec<WeeklyRow> {
    let all_points: Vec<f64> = scoreboard.teams().map(|t| t.points).collect();

    let mut rows = Vec::with_capacity(all_points.len());
    for matchup in &scoreboard.matchups {
        for team in &matchup.teams {
            let outscored_opponent = matchup
                .teams
                .iter()
                .filter(|other| other.team_id != team.team_id)
                .all(|other| team.points > other.points);
            let wins = u32::from(matchup.teams.len() > 1 && outscored_opponent);
            let head_to_head_wins = all_points.iter().filter(|&&p| team.points > p).count() as u32;

            rows.push(WeeklyRow::new(
                season,
                team.team_id,
                scoreboard.week,
                wins,
                team.points,
                head_to_head_wins,
            ));
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Matchup, MatchupTeam};
    use power_rankings::TeamId;

    fn matchup(a: (u32, f64), b: (u32, f64)) -> Matchup {
        let side = |(id, points): (u32, f64)| MatchupTeam {
            team_id: TeamId(id),
            name: format!("Team {id}"),
            points,
        };
        Matchup { teams: vec![side(a), side(b)] }
    }

    fn validated(rows: &[WeeklyRow]) -> Vec<power_rankings::WeeklyResult> {
        rows.iter().enumerate().map(|(i, r)| r.validate(i).unwrap()).collect()
    }

    #[test]
    fn test_wins_and_head_to_head() {
        let scoreboard = WeekScoreboard {
            week: 2,
            matchups: vec![matchup((1, 120.0), (2, 100.0)), matchup((3, 100.0), (4, 80.0))],
        };

        let results = validated(&derive_weekly_rows(2025, &scoreboard));

        let summary: Vec<(u32, u32, u32)> =
            results.iter().map(|r| (r.team_id.0, r.wins, r.head_to_head_wins)).collect();
        assert_eq!(summary, vec![(1, 1, 3), (2, 0, 1), (3, 1, 1), (4, 0, 0)]);
        assert!(results.iter().all(|r| r.week == 2 && r.season == 2025));
    }

    #[test]
    fn test_tied_matchup_awards_no_win() {
        let scoreboard = WeekScoreboard { week: 1, matchups: vec![matchup((1, 90.5), (2, 90.5))] };

        let results = validated(&derive_weekly_rows(2025, &scoreboard));

        assert!(results.iter().all(|r| r.wins == 0 && r.head_to_head_wins == 0));
    }

    #[test]
    fn test_empty_week() {
        let scoreboard = WeekScoreboard { week: 1, matchups: vec![] };
        assert!(derive_weekly_rows(2025, &scoreboard).is_empty());
    }
}

//! The roster and the weekly match groups built from it.

use crate::schema::{AttendanceRecord, PlayTime, Player, Team};
use serde_derive::Serialize;
use std::{collections::HashMap, iter::repeat};

/// Players and teams, in display order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Roster {
    /// Players, by first name.
    pub players: Vec<Player>,

    /// Teams, by rank.
    pub teams: Vec<Team>,
}

/// Sorts players by first name and teams by rank. Both sorts are stable, and the inputs are left
/// alone.
pub fn build_roster(players: &[Player], teams: &[Team]) -> Roster {
    let mut players = players.to_vec();
    players.sort_by(|l, r| l.first_name.cmp(&r.first_name));
    Roster {
        players,
        teams: ranked(teams),
    }
}

fn ranked(teams: &[Team]) -> Vec<Team> {
    let mut teams = teams.to_vec();
    teams.sort_by_key(|team| team.rank);
    teams
}

/// A game between two teams of a match group, named by their ranks.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    /// The higher-ranked team.
    pub first_rank: u32,

    /// The lower-ranked team.
    pub second_rank: u32,
}

/// The teams sharing a court for one time slot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchGroup {
    /// The court number, starting at 1.
    pub court: u32,

    /// The time slot.
    pub play_time: PlayTime,

    /// The time slot's label.
    pub time: &'static str,

    /// The teams, by rank.
    pub teams: Vec<Team>,

    /// Every pairing of the teams, once each.
    pub fixtures: Vec<Fixture>,
}

/// This week's match groups.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Schedule {
    /// The match groups, by court.
    pub groups: Vec<MatchGroup>,

    /// Attending teams that couldn't be placed in a group.
    pub byes: Vec<Team>,
}

/// Splits `n` teams into groups of three, using groups of four at the bottom to absorb the
/// remainder. When that can't be done (1, 2, or 5 teams), the leftover teams aren't in a group.
pub fn group_sizes(n: usize) -> Vec<usize> {
    let (threes, fours) = match (n / 3, n % 3) {
        (k, 1) if k >= 1 => (k - 1, 1),
        (k, 2) if k >= 2 => (k - 2, 2),
        (k, _) => (k, 0),
    };
    repeat(3).take(threes).chain(repeat(4).take(fours)).collect()
}

/// Groups the attending teams onto courts, one time slot after another. Teams with no attendance
/// record aren't attending.
pub fn schedule(teams: &[Team], attendance: &[AttendanceRecord]) -> Schedule {
    let play_times = attendance
        .iter()
        .map(|record| (record.team_id.as_str(), record.play_time))
        .collect::<HashMap<_, _>>();
    let teams = ranked(teams);

    let mut schedule = Schedule::default();
    let mut court = 0;
    for &slot in PlayTime::ALL.iter().filter(|pt| pt.is_playable()) {
        let attending = teams
            .iter()
            .filter(|team| play_times.get(team.team_id.as_str()) == Some(&slot))
            .collect::<Vec<_>>();

        let mut rest = &attending[..];
        for size in group_sizes(attending.len()) {
            let (group, tail) = rest.split_at(size);
            rest = tail;
            court += 1;
            schedule.groups.push(MatchGroup {
                court,
                play_time: slot,
                time: slot.label(),
                teams: group.iter().map(|&team| team.clone()).collect(),
                fixtures: round_robin(group),
            });
        }
        schedule.byes.extend(rest.iter().map(|&team| team.clone()));
    }
    schedule
}

fn round_robin(group: &[&Team]) -> Vec<Fixture> {
    let mut fixtures = Vec::new();
    for (i, first) in group.iter().enumerate() {
        for second in &group[i + 1..] {
            fixtures.push(Fixture {
                first_rank: first.rank,
                second_rank: second.rank,
            });
        }
    }
    fixtures
}

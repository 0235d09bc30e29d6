//! Types used throughout.
//!
//! > Schema defines the plain old data types that views operate on. Notably, the schema module has
//! > no knowledge of the store, nor any dependencies on any of the rest of the system.

use serde_derive::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// A player registered with the league.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// The player's user ID.
    pub user_id: String,

    /// The player's first name.
    pub first_name: String,

    /// The player's last name.
    pub last_name: String,

    /// The player's email address.
    pub email: String,

    /// The player's phone number.
    pub phone_number: String,
}

/// A pair of players on the ladder.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// The team's ID.
    pub team_id: String,

    /// The user ID of the player who created the team.
    pub first_player_id: String,

    /// The user ID of the player they paired with. Never equal to `first_player_id`.
    pub second_player_id: String,

    /// The player who created the team.
    pub first_player: Player,

    /// The player they paired with.
    pub second_player: Player,

    /// The team's position on the ladder, starting at 1.
    pub rank: u32,
}

/// The time slot a team has declared for the current week.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayTime {
    /// The early slot.
    TimeSlotA,

    /// The late slot.
    TimeSlotB,

    /// Not attending this week.
    None,
}

impl PlayTime {
    /// Every time slot, in the order they're offered on forms.
    pub const ALL: [PlayTime; 3] = [PlayTime::TimeSlotA, PlayTime::TimeSlotB, PlayTime::None];

    /// The code used on forms and in the store.
    pub fn code(self) -> &'static str {
        match self {
            PlayTime::TimeSlotA => "TIME_SLOT_A",
            PlayTime::TimeSlotB => "TIME_SLOT_B",
            PlayTime::None => "NONE",
        }
    }

    /// The human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            PlayTime::TimeSlotA => "8:00 pm",
            PlayTime::TimeSlotB => "9:30 pm",
            PlayTime::None => "Not Playing",
        }
    }

    /// Whether a team with this time slot is attending.
    pub fn is_playable(self) -> bool {
        self != PlayTime::None
    }
}

impl Default for PlayTime {
    fn default() -> PlayTime {
        PlayTime::None
    }
}

impl fmt::Display for PlayTime {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.code())
    }
}

impl FromStr for PlayTime {
    type Err = UnknownPlayTime;

    fn from_str(s: &str) -> Result<PlayTime, UnknownPlayTime> {
        PlayTime::ALL
            .iter()
            .cloned()
            .find(|pt| pt.code() == s)
            .ok_or_else(|| UnknownPlayTime(s.to_owned()))
    }
}

/// The error from parsing a time slot code that isn't one of `PlayTime::ALL`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownPlayTime(pub String);

impl fmt::Display for UnknownPlayTime {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "unknown time slot code {:?}", self.0)
    }
}

impl std::error::Error for UnknownPlayTime {}

/// A team's attendance for the current week.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// The team's ID.
    pub team_id: String,

    /// The declared time slot.
    pub play_time: PlayTime,
}

/// One of the logged-in player's teams, as reported by the store.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    /// The team itself.
    #[serde(flatten)]
    pub team: Team,

    /// The raw play time code. This is a string rather than a `PlayTime` because the store is
    /// free to report codes this build doesn't know about.
    pub play_time: String,
}

/// A request to create a team.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    /// The requesting player's user ID.
    pub first_player_id: String,

    /// The user ID of the player they want to pair with.
    pub second_player_id: String,
}

/// The credentials of a logged-in player.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// The token handed out at login.
    pub authorization_token: Uuid,
}

//! Form validation.
//!
//! Validators never fail; they return a `FieldErrors` map keyed by form field name, and an empty
//! map means the submission may proceed.

use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The message for a field that must be filled in.
pub const REQUIRED: &str = "Required";

/// The message for a player trying to pair with themselves.
pub const SAME_PERSON: &str = "Cannot be same person";

/// The message for a pairing that already has a team.
pub const TEAM_EXISTS: &str = "team exists";

/// The message for a second player who isn't registered.
pub const UNKNOWN_PLAYER: &str = "Unknown player";

/// The message for a team that doesn't exist or that the player isn't on.
pub const NOT_YOUR_TEAM: &str = "Not one of your teams";

/// The message for a time slot code this build doesn't know.
pub const UNKNOWN_TIME_SLOT: &str = "Unknown time slot";

/// The message for a player who is already attending with a different team.
pub const ALREADY_PLAYING: &str = "Already playing with another team";

/// Error messages, keyed by the name of the form field they belong to.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    /// Creates a map with a single error.
    pub fn single(field: &'static str, message: &'static str) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.insert(field, message);
        errors
    }

    /// Sets the error for a field, replacing any earlier one.
    pub fn insert(&mut self, field: &'static str, message: &'static str) {
        let _ = self.0.insert(field, message);
    }

    /// Returns the error for a field, if any.
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).cloned()
    }

    /// Returns whether there are no errors, i.e. the form is valid.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<&'static str, &'static str>> for FieldErrors {
    fn from(map: BTreeMap<&'static str, &'static str>) -> FieldErrors {
        FieldErrors(map)
    }
}

/// The attendance form.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceForm {
    /// The selected team.
    pub team_id: Option<String>,

    /// The selected time slot code.
    pub play_time: Option<String>,
}

/// The team creation form.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamForm {
    /// The user ID of the player to pair with.
    pub second_player_id: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_ref().map(|s| s.is_empty()).unwrap_or(true)
}

/// Validates an attendance update. Every missing field is reported.
pub fn validate_attendance(form: &AttendanceForm) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if is_blank(&form.play_time) {
        errors.insert("playTime", REQUIRED);
    }
    if is_blank(&form.team_id) {
        errors.insert("teamId", REQUIRED);
    }
    errors
}

/// Validates a team creation request made by the player with the given user ID.
///
/// Pairing with yourself takes precedence over a missing selection. An empty requester ID never
/// compares equal to anything, so a request from a player whose ID is somehow blank only gets the
/// presence check.
pub fn validate_team_creation(form: &CreateTeamForm, requester_id: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if is_blank(&form.second_player_id) {
        errors.insert("secondPlayerId", REQUIRED);
    }
    match form.second_player_id {
        Some(ref second) if !second.is_empty() && !requester_id.is_empty() => {
            if second == requester_id {
                errors.insert("secondPlayerId", SAME_PERSON);
            }
        }
        _ => {}
    }
    errors
}

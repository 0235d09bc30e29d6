//! Displaying time slots.

use crate::schema::PlayTime;
use log::warn;

/// Returns the label for a time slot code, or `"NONE"` for a code this build doesn't know.
///
/// An unknown code reads like "not playing" to users, so it also gets logged.
pub fn display_time(code: &str) -> &'static str {
    match code.parse::<PlayTime>() {
        Ok(play_time) => play_time.label(),
        Err(err) => {
            warn!("Showing {} as NONE", err);
            "NONE"
        }
    }
}

//! Business logic.
//!
//! > **Logic** is the "business (or domain) logic" of the application. The router will pull the
//! > necessary information out of the HTTP request, and call into this module as quickly as
//! > possible to do all the actual work.

pub mod auth;
pub mod roster;
pub mod team;
pub mod time;
pub mod validate;

pub use crate::logic::{
    roster::{build_roster, schedule, Roster, Schedule},
    team::{create_team, update_attendance, Submission},
    time::display_time,
    validate::{
        validate_attendance, validate_team_creation, AttendanceForm, CreateTeamForm, FieldErrors,
    },
};

//! Bindings to the store.
//!
//! > **DAL**, for lack of a better term (borrowing this one from "data access layer" since I don't
//! > want to use "model"), is the only module that does any talking to the store, or any other
//! > IO or interaction with other kinds of externalized state for that matter.
//!
//! Everything above this module talks to a `Store` trait object, so the in-memory store can be
//! swapped for one backed by a database or a remote API without touching the logic.

mod memory;

pub use crate::dal::memory::{MemoryStore, Seed, SeedPlayer, SeedTeam};
#[cfg(test)]
pub(crate) use crate::dal::memory::tests as test_util;
use crate::schema::{AttendanceRecord, Credentials, NewTeam, Player, Team, TeamInfo};
use failure::{Fail, Fallible};
use futures::future::BoxFuture;
use uuid::Uuid;

/// Errors the store raises for requests that break the league's rules, as opposed to the store
/// itself failing.
#[derive(Debug, Fail)]
pub enum StoreError {
    /// The requested player or team doesn't exist.
    #[fail(display = "NotFound")]
    NotFound,

    /// The credentials are unknown, or don't allow the request.
    #[fail(display = "Unauthorized")]
    Unauthorized,

    /// A team already exists for the two players, in either order.
    #[fail(display = "A team already exists for that pair of players")]
    TeamExists,

    /// A player tried to form a team with themselves.
    #[fail(display = "A team needs two different players")]
    DuplicateMember,

    /// A player is already attending this week with another team.
    #[fail(
        display = "Player {} is already playing this week with team {}",
        user_id, team_id
    )]
    MultiplePlayTime {
        /// The player's user ID.
        user_id: String,

        /// The team they're already playing with.
        team_id: String,
    },
}

/// The application's state, and the operations that change it.
///
/// Every operation resolves asynchronously; none are retried.
pub trait Store: Send + Sync {
    /// Gets every player.
    fn players(&self) -> BoxFuture<'static, Fallible<Vec<Player>>>;

    /// Gets every team.
    fn teams(&self) -> BoxFuture<'static, Fallible<Vec<Team>>>;

    /// Gets this week's attendance for every team.
    fn attendance(&self) -> BoxFuture<'static, Fallible<Vec<AttendanceRecord>>>;

    /// Creates a team, placing it at the bottom of the ladder. Fails with
    /// `StoreError::TeamExists` if the pair already has a team.
    fn add_team(
        &self,
        team: NewTeam,
        credentials: Credentials,
    ) -> BoxFuture<'static, Fallible<Team>>;

    /// Sets a team's attendance for this week.
    fn update_team_status(
        &self,
        record: AttendanceRecord,
        credentials: Credentials,
    ) -> BoxFuture<'static, Fallible<()>>;

    /// Gets the logged-in player's teams, by rank.
    fn get_team_info(&self, credentials: Credentials) -> BoxFuture<'static, Fallible<Vec<TeamInfo>>>;

    /// Creates an authentication token for the given player.
    fn create_auth(&self, user_id: String) -> BoxFuture<'static, Fallible<Uuid>>;

    /// Looks up the player an authentication token belongs to.
    fn get_auth_user(&self, token: Uuid) -> BoxFuture<'static, Fallible<Player>>;

    /// Looks up the player with the given email address, checking their passcode. Fails with
    /// `StoreError::Unauthorized` whether the address or the passcode is wrong.
    fn check_login(
        &self,
        email: String,
        passcode: String,
    ) -> BoxFuture<'static, Fallible<Player>>;
}

//! Team creation and attendance submissions.
//!
//! Both run the same sequence: validate the form, persist the change, then refresh the player's
//! teams. Each step starts only once the one before it has finished, and nothing is retried.

use crate::{
    dal::{Store, StoreError},
    logic::{
        auth::Session,
        validate::{
            validate_attendance, validate_team_creation, AttendanceForm, CreateTeamForm,
            FieldErrors, ALREADY_PLAYING, NOT_YOUR_TEAM, SAME_PERSON, TEAM_EXISTS,
            UNKNOWN_PLAYER, UNKNOWN_TIME_SLOT,
        },
    },
    schema::{AttendanceRecord, NewTeam, PlayTime, TeamInfo},
};
use failure::Fallible;
use log::{info, warn};

/// Where players are sent after a successful submission.
pub const LADDER_PATH: &str = "/ladder";

/// How a submission turned out, short of an unexpected error.
#[derive(Debug)]
pub enum Submission {
    /// The change was made. The player should be sent to `redirect`.
    Accepted {
        /// The path to navigate to.
        redirect: &'static str,

        /// The player's teams, as refreshed after the change.
        teams: Vec<TeamInfo>,
    },

    /// The form was invalid or broke a league rule; nothing was changed.
    Rejected(FieldErrors),
}

/// Creates a team pairing the logged-in player with the player chosen on the form.
pub async fn create_team(
    store: &dyn Store,
    me: &Session,
    form: &CreateTeamForm,
) -> Fallible<Submission> {
    let errors = validate_team_creation(form, &me.player.user_id);
    if !errors.is_empty() {
        return Ok(Submission::Rejected(errors));
    }

    let new_team = NewTeam {
        first_player_id: me.player.user_id.clone(),
        second_player_id: form.second_player_id.clone().unwrap_or_default(),
    };
    match store.add_team(new_team, me.credentials).await {
        Ok(team) => info!(
            "{} created team {} at rank {}",
            me.player.user_id, team.team_id, team.rank
        ),
        Err(err) => {
            let message = match err.downcast_ref::<StoreError>() {
                Some(StoreError::TeamExists) => Some(TEAM_EXISTS),
                Some(StoreError::DuplicateMember) => Some(SAME_PERSON),
                Some(StoreError::NotFound) => Some(UNKNOWN_PLAYER),
                _ => None,
            };
            return match message {
                Some(message) => {
                    info!("{} can't create a team: {}", me.player.user_id, err);
                    Ok(Submission::Rejected(FieldErrors::single(
                        "secondPlayerId",
                        message,
                    )))
                }
                None => Err(err),
            };
        }
    }

    refresh(store, me).await
}

/// Sets the attendance of one of the logged-in player's teams.
pub async fn update_attendance(
    store: &dyn Store,
    me: &Session,
    form: &AttendanceForm,
) -> Fallible<Submission> {
    let errors = validate_attendance(form);
    if !errors.is_empty() {
        return Ok(Submission::Rejected(errors));
    }

    let play_time = match form.play_time.as_deref().unwrap_or_default().parse::<PlayTime>() {
        Ok(play_time) => play_time,
        Err(err) => {
            warn!("{} submitted {}", me.player.user_id, err);
            return Ok(Submission::Rejected(FieldErrors::single(
                "playTime",
                UNKNOWN_TIME_SLOT,
            )));
        }
    };
    let record = AttendanceRecord {
        team_id: form.team_id.clone().unwrap_or_default(),
        play_time,
    };
    let team_id = record.team_id.clone();

    if let Err(err) = store.update_team_status(record, me.credentials).await {
        let rejection = match err.downcast_ref::<StoreError>() {
            Some(StoreError::MultiplePlayTime { .. }) => Some(("playTime", ALREADY_PLAYING)),
            Some(StoreError::NotFound) | Some(StoreError::Unauthorized) => {
                Some(("teamId", NOT_YOUR_TEAM))
            }
            _ => None,
        };
        return match rejection {
            Some((field, message)) => {
                info!("{} can't update team {}: {}", me.player.user_id, team_id, err);
                Ok(Submission::Rejected(FieldErrors::single(field, message)))
            }
            None => Err(err),
        };
    }
    info!(
        "{} set team {} to {}",
        me.player.user_id, team_id, play_time
    );

    refresh(store, me).await
}

async fn refresh(store: &dyn Store, me: &Session) -> Fallible<Submission> {
    let teams = store.get_team_info(me.credentials).await?;
    Ok(Submission::Accepted {
        redirect: LADDER_PATH,
        teams,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dal::test_util::{login, seeded},
        schema::{Credentials, Player, Team},
    };
    use futures::{executor::block_on, future::BoxFuture};
    use maplit::btreemap;
    use uuid::Uuid;

    /// A store that fails the test if anything touches it.
    struct Untouchable;

    impl Store for Untouchable {
        fn players(&self) -> BoxFuture<'static, Fallible<Vec<Player>>> {
            panic!("players")
        }
        fn teams(&self) -> BoxFuture<'static, Fallible<Vec<Team>>> {
            panic!("teams")
        }
        fn attendance(&self) -> BoxFuture<'static, Fallible<Vec<AttendanceRecord>>> {
            panic!("attendance")
        }
        fn add_team(&self, _: NewTeam, _: Credentials) -> BoxFuture<'static, Fallible<Team>> {
            panic!("add_team")
        }
        fn update_team_status(
            &self,
            _: AttendanceRecord,
            _: Credentials,
        ) -> BoxFuture<'static, Fallible<()>> {
            panic!("update_team_status")
        }
        fn get_team_info(&self, _: Credentials) -> BoxFuture<'static, Fallible<Vec<TeamInfo>>> {
            panic!("get_team_info")
        }
        fn create_auth(&self, _: String) -> BoxFuture<'static, Fallible<Uuid>> {
            panic!("create_auth")
        }
        fn get_auth_user(&self, _: Uuid) -> BoxFuture<'static, Fallible<Player>> {
            panic!("get_auth_user")
        }
        fn check_login(&self, _: String, _: String) -> BoxFuture<'static, Fallible<Player>> {
            panic!("check_login")
        }
    }

    fn session(store: &dyn Store, user_id: &str, credentials: Credentials) -> Session {
        let player = block_on(store.get_auth_user(credentials.authorization_token)).unwrap();
        assert_eq!(player.user_id, user_id);
        Session {
            player,
            credentials,
        }
    }

    fn anonymous(user_id: &str) -> Session {
        Session {
            player: Player {
                user_id: user_id.to_owned(),
                first_name: String::new(),
                last_name: String::new(),
                email: String::new(),
                phone_number: String::new(),
            },
            credentials: Credentials {
                authorization_token: Uuid::new_v4(),
            },
        }
    }

    fn pick(second: &str) -> CreateTeamForm {
        CreateTeamForm {
            second_player_id: Some(second.to_owned()),
        }
    }

    fn declare(team_id: &str, play_time: &str) -> AttendanceForm {
        AttendanceForm {
            team_id: Some(team_id.to_owned()),
            play_time: Some(play_time.to_owned()),
        }
    }

    fn rejected(submission: Submission) -> FieldErrors {
        match submission {
            Submission::Rejected(errors) => errors,
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[test]
    fn invalid_forms_never_reach_the_store() {
        let me = anonymous("u1");

        let errors = rejected(block_on(create_team(&Untouchable, &me, &pick("u1"))).unwrap());
        assert_eq!(errors, FieldErrors::single("secondPlayerId", SAME_PERSON));

        let errors = rejected(
            block_on(update_attendance(
                &Untouchable,
                &me,
                &AttendanceForm::default(),
            ))
            .unwrap(),
        );
        assert_eq!(
            errors,
            FieldErrors::from(btreemap! {
                "playTime" => "Required",
                "teamId" => "Required",
            })
        );
    }

    #[test]
    fn created_teams_show_up_in_the_refresh() {
        let store = seeded();
        let me = session(&store, "u3", login(&store, "u3"));

        match block_on(create_team(&store, &me, &pick("u4"))).unwrap() {
            Submission::Accepted { redirect, teams } => {
                assert_eq!(redirect, "/ladder");
                assert_eq!(teams.len(), 1);
                assert_eq!(teams[0].team.second_player_id, "u4");
                assert_eq!(teams[0].play_time, "NONE");
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn existing_teams_become_a_field_error() {
        let store = seeded();
        let me = session(&store, "u2", login(&store, "u2"));
        let errors = rejected(block_on(create_team(&store, &me, &pick("u1"))).unwrap());
        assert_eq!(errors, FieldErrors::single("secondPlayerId", "team exists"));
    }

    #[test]
    fn other_store_failures_propagate() {
        let store = seeded();
        let me = anonymous("u3");
        assert!(block_on(create_team(&store, &me, &pick("u4"))).is_err());
    }

    #[test]
    fn unknown_players_become_a_field_error() {
        let store = seeded();
        let me = session(&store, "u3", login(&store, "u3"));
        let errors = rejected(block_on(create_team(&store, &me, &pick("u9"))).unwrap());
        assert_eq!(errors, FieldErrors::single("secondPlayerId", UNKNOWN_PLAYER));
    }

    #[test]
    fn other_peoples_teams_become_a_field_error() {
        let store = seeded();
        let me = session(&store, "u3", login(&store, "u3"));
        for team_id in &["t1", "t9"] {
            let errors =
                rejected(block_on(update_attendance(&store, &me, &declare(team_id, "NONE"))).unwrap());
            assert_eq!(errors, FieldErrors::single("teamId", NOT_YOUR_TEAM));
        }
    }

    #[test]
    fn attendance_is_recorded_and_refreshed() {
        let store = seeded();
        let me = session(&store, "u1", login(&store, "u1"));

        match block_on(update_attendance(&store, &me, &declare("t1", "TIME_SLOT_A"))).unwrap() {
            Submission::Accepted { redirect, teams } => {
                assert_eq!(redirect, LADDER_PATH);
                assert_eq!(teams[0].play_time, "TIME_SLOT_A");
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn unknown_time_slots_are_rejected() {
        let store = seeded();
        let me = session(&store, "u1", login(&store, "u1"));
        let errors =
            rejected(block_on(update_attendance(&store, &me, &declare("t1", "TIME_SLOT_C"))).unwrap());
        assert_eq!(errors, FieldErrors::single("playTime", UNKNOWN_TIME_SLOT));
    }

    #[test]
    fn double_booking_becomes_a_field_error() {
        let store = seeded();
        let u1 = session(&store, "u1", login(&store, "u1"));
        let u3 = session(&store, "u3", login(&store, "u3"));

        let other = match block_on(create_team(&store, &u3, &pick("u1"))).unwrap() {
            Submission::Accepted { teams, .. } => teams[0].team.team_id.clone(),
            other => panic!("expected acceptance, got {:?}", other),
        };
        match block_on(update_attendance(&store, &u1, &declare("t1", "TIME_SLOT_B"))).unwrap() {
            Submission::Accepted { .. } => {}
            other => panic!("expected acceptance, got {:?}", other),
        }

        let errors =
            rejected(block_on(update_attendance(&store, &u3, &declare(&other, "TIME_SLOT_A"))).unwrap());
        assert_eq!(errors, FieldErrors::single("playTime", ALREADY_PLAYING));
    }
}

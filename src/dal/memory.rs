use crate::{
    dal::{Store, StoreError},
    schema::{AttendanceRecord, Credentials, NewTeam, PlayTime, Player, Team, TeamInfo},
};
use antidote::Mutex;
use failure::{bail, Fallible, ResultExt};
use futures::{
    future::{ready, BoxFuture},
    FutureExt,
};
use log::{debug, info};
use serde_derive::Deserialize;
use std::{collections::HashMap, fs::File, io::BufReader, path::Path, sync::Arc};
use uuid::Uuid;

/// The initial contents of a `MemoryStore`.
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    /// The registered players.
    #[serde(default)]
    pub players: Vec<SeedPlayer>,

    /// The existing teams.
    #[serde(default)]
    pub teams: Vec<SeedTeam>,
}

impl Seed {
    /// Reads a seed from a JSON file.
    pub fn load(path: &Path) -> Fallible<Seed> {
        let file = File::open(path)
            .with_context(|_| format!("Couldn't open seed file {}", path.display()))?;
        let seed = serde_json::from_reader(BufReader::new(file))
            .with_context(|_| format!("Couldn't parse seed file {}", path.display()))?;
        Ok(seed)
    }
}

/// A player in a `Seed`, along with the passcode they log in with.
#[derive(Debug, Deserialize)]
pub struct SeedPlayer {
    /// The player.
    #[serde(flatten)]
    pub player: Player,

    /// The passcode. A player with an empty passcode can't log in.
    #[serde(default)]
    pub passcode: String,
}

/// A team in a `Seed`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedTeam {
    /// The team's ID. A fresh one is generated if this is missing.
    #[serde(default)]
    pub team_id: Option<String>,

    /// The first player's user ID.
    pub first_player_id: String,

    /// The second player's user ID.
    pub second_player_id: String,

    /// The team's rank.
    pub rank: u32,

    /// This week's attendance.
    #[serde(default)]
    pub play_time: PlayTime,
}

/// A store that keeps everything in memory.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Creates a store holding the given seed, checking that its teams are well-formed.
    pub fn new(seed: Seed) -> Fallible<MemoryStore> {
        let mut inner = Inner {
            players: Vec::with_capacity(seed.players.len()),
            passcodes: HashMap::new(),
            teams: Vec::with_capacity(seed.teams.len()),
            auths: HashMap::new(),
        };
        for SeedPlayer { player, passcode } in seed.players {
            if inner.player(&player.user_id).is_ok() {
                bail!("Seed has two players with ID {}", player.user_id);
            }
            if inner.player_by_email(&player.email).is_some() {
                bail!("Seed has two players with email {}", player.email);
            }
            let _ = inner.passcodes.insert(player.user_id.clone(), passcode);
            inner.players.push(player);
        }
        for team in seed.teams {
            if team.first_player_id == team.second_player_id {
                bail!("Seed team for {} has the same player twice", team.first_player_id);
            }
            for id in &[&team.first_player_id, &team.second_player_id] {
                if inner.player(id).is_err() {
                    bail!("Seed team refers to unknown player {}", id);
                }
            }
            if inner.pair_exists(&team.first_player_id, &team.second_player_id) {
                bail!(
                    "Seed has two teams for {} and {}",
                    team.first_player_id,
                    team.second_player_id
                );
            }
            let team_id = team.team_id.unwrap_or_else(new_id);
            if inner.teams.iter().any(|t| t.team_id == team_id) {
                bail!("Seed has two teams with ID {}", team_id);
            }
            inner.teams.push(StoredTeam {
                team_id,
                first_player_id: team.first_player_id,
                second_player_id: team.second_player_id,
                rank: team.rank,
                play_time: team.play_time,
            });
        }
        info!(
            "Store holds {} players and {} teams",
            inner.players.len(),
            inner.teams.len()
        );
        Ok(MemoryStore {
            inner: Arc::new(Mutex::new(inner)),
        })
    }

    /// Runs an operation against the store. The lock is only held while `func` runs, so the
    /// returned future is already resolved.
    fn query<F, T>(&self, func: F) -> BoxFuture<'static, Fallible<T>>
    where
        F: FnOnce(&mut Inner) -> Fallible<T>,
        T: Send + 'static,
    {
        let result = func(&mut *self.inner.lock());
        ready(result).boxed()
    }
}

impl Store for MemoryStore {
    fn players(&self) -> BoxFuture<'static, Fallible<Vec<Player>>> {
        self.query(|inner| Ok(inner.players.clone()))
    }

    fn teams(&self) -> BoxFuture<'static, Fallible<Vec<Team>>> {
        self.query(|inner| inner.teams.iter().map(|team| inner.hydrate(team)).collect())
    }

    fn attendance(&self) -> BoxFuture<'static, Fallible<Vec<AttendanceRecord>>> {
        self.query(|inner| {
            Ok(inner
                .teams
                .iter()
                .map(|team| AttendanceRecord {
                    team_id: team.team_id.clone(),
                    play_time: team.play_time,
                })
                .collect())
        })
    }

    fn add_team(
        &self,
        team: NewTeam,
        credentials: Credentials,
    ) -> BoxFuture<'static, Fallible<Team>> {
        self.query(move |inner| {
            let user_id = inner.authed(credentials)?;
            if user_id != team.first_player_id {
                return Err(StoreError::Unauthorized.into());
            }
            if team.first_player_id == team.second_player_id {
                return Err(StoreError::DuplicateMember.into());
            }
            let _ = inner.player(&team.second_player_id)?;
            if inner.pair_exists(&team.first_player_id, &team.second_player_id) {
                return Err(StoreError::TeamExists.into());
            }

            let last = inner.teams.iter().map(|t| t.rank).max().unwrap_or(0);
            let rank = match last.checked_add(1) {
                Some(rank) => rank,
                None => bail!("The ladder has no rank left for a new team"),
            };
            let stored = StoredTeam {
                team_id: new_id(),
                first_player_id: team.first_player_id,
                second_player_id: team.second_player_id,
                rank,
                play_time: PlayTime::None,
            };
            let team = inner.hydrate(&stored)?;
            inner.teams.push(stored);
            Ok(team)
        })
    }

    fn update_team_status(
        &self,
        record: AttendanceRecord,
        credentials: Credentials,
    ) -> BoxFuture<'static, Fallible<()>> {
        self.query(move |inner| {
            let user_id = inner.authed(credentials)?;
            let index = inner
                .teams
                .iter()
                .position(|team| team.team_id == record.team_id)
                .ok_or(StoreError::NotFound)?;

            let team = &inner.teams[index];
            if !team.has_player(&user_id) {
                return Err(StoreError::Unauthorized.into());
            }
            if record.play_time.is_playable() {
                for player_id in &[&team.first_player_id, &team.second_player_id] {
                    let active = inner.teams.iter().find(|other| {
                        other.team_id != team.team_id
                            && other.has_player(player_id)
                            && other.play_time.is_playable()
                    });
                    if let Some(active) = active {
                        return Err(StoreError::MultiplePlayTime {
                            user_id: player_id.to_string(),
                            team_id: active.team_id.clone(),
                        }
                        .into());
                    }
                }
            }

            debug!("Team {} is now {}", record.team_id, record.play_time);
            inner.teams[index].play_time = record.play_time;
            Ok(())
        })
    }

    fn get_team_info(&self, credentials: Credentials) -> BoxFuture<'static, Fallible<Vec<TeamInfo>>> {
        self.query(move |inner| {
            let user_id = inner.authed(credentials)?;
            let mut teams = inner
                .teams
                .iter()
                .filter(|team| team.has_player(&user_id))
                .map(|team| {
                    Ok(TeamInfo {
                        team: inner.hydrate(team)?,
                        play_time: team.play_time.code().to_owned(),
                    })
                })
                .collect::<Fallible<Vec<_>>>()?;
            teams.sort_by_key(|info| info.team.rank);
            Ok(teams)
        })
    }

    fn create_auth(&self, user_id: String) -> BoxFuture<'static, Fallible<Uuid>> {
        self.query(move |inner| {
            let _ = inner.player(&user_id)?;
            let token = Uuid::new_v4();
            let _ = inner.auths.insert(token, user_id);
            Ok(token)
        })
    }

    fn get_auth_user(&self, token: Uuid) -> BoxFuture<'static, Fallible<Player>> {
        self.query(move |inner| {
            let user_id = inner.authed(Credentials {
                authorization_token: token,
            })?;
            inner.player(&user_id).map(Player::clone)
        })
    }

    fn check_login(
        &self,
        email: String,
        passcode: String,
    ) -> BoxFuture<'static, Fallible<Player>> {
        self.query(move |inner| {
            let player = inner
                .player_by_email(&email)
                .ok_or(StoreError::Unauthorized)?;
            match inner.passcodes.get(&player.user_id) {
                Some(expected) if !expected.is_empty() && *expected == passcode => {
                    Ok(player.clone())
                }
                _ => Err(StoreError::Unauthorized.into()),
            }
        })
    }
}

struct Inner {
    players: Vec<Player>,
    passcodes: HashMap<String, String>,
    teams: Vec<StoredTeam>,
    auths: HashMap<Uuid, String>,
}

impl Inner {
    fn authed(&self, credentials: Credentials) -> Fallible<String> {
        match self.auths.get(&credentials.authorization_token) {
            Some(user_id) => Ok(user_id.clone()),
            None => Err(StoreError::Unauthorized.into()),
        }
    }

    fn player(&self, user_id: &str) -> Fallible<&Player> {
        self.players
            .iter()
            .find(|player| player.user_id == user_id)
            .ok_or_else(|| StoreError::NotFound.into())
    }

    fn player_by_email(&self, email: &str) -> Option<&Player> {
        self.players
            .iter()
            .find(|player| player.email.eq_ignore_ascii_case(email))
    }

    fn pair_exists(&self, first: &str, second: &str) -> bool {
        self.teams.iter().any(|team| {
            (team.first_player_id == first && team.second_player_id == second)
                || (team.first_player_id == second && team.second_player_id == first)
        })
    }

    fn hydrate(&self, team: &StoredTeam) -> Fallible<Team> {
        Ok(Team {
            team_id: team.team_id.clone(),
            first_player_id: team.first_player_id.clone(),
            second_player_id: team.second_player_id.clone(),
            first_player: self.player(&team.first_player_id)?.clone(),
            second_player: self.player(&team.second_player_id)?.clone(),
            rank: team.rank,
        })
    }
}

struct StoredTeam {
    team_id: String,
    first_player_id: String,
    second_player_id: String,
    rank: u32,
    play_time: PlayTime,
}

impl StoredTeam {
    fn has_player(&self, user_id: &str) -> bool {
        self.first_player_id == user_id || self.second_player_id == user_id
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

use crate::{
    dal::Store,
    logic::{
        self, auth::Session, build_roster, AttendanceForm, CreateTeamForm, FieldErrors,
        Submission,
    },
    router::{
        auth::session,
        util::{redirect, with_store, ResultExt},
    },
    view::{render_html, team_rows, time_options},
};
use failure::Fallible;
use futures::try_join;
use serde_json::json;
use std::sync::Arc;
use warp::{
    http::{Response, StatusCode},
    Filter,
};

const LOGIN_PATH: &str = "/login";

/// The "My Teams" page.
pub fn page(store: Arc<dyn Store>) -> Resp!() {
    warp::get()
        .and(warp::path!("team"))
        .and(with_store(store.clone()))
        .and(session(store))
        .and_then(|store: Arc<dyn Store>, me: Option<Session>| async move {
            let me = match me {
                Some(me) => me,
                None => return redirect(LOGIN_PATH).err_to_rejection(),
            };
            let forms = Forms::default();
            team_page(&*store, StatusCode::OK, me, &forms)
                .await
                .err_to_rejection()
        })
        .boxed()
}

/// The route for creating a team.
pub fn create(store: Arc<dyn Store>) -> Resp!() {
    warp::post()
        .and(warp::path!("team"))
        .and(warp::body::content_length_limit(2 * 1024))
        .and(with_store(store.clone()))
        .and(session(store))
        .and(warp::body::form())
        .and_then(
            |store: Arc<dyn Store>, me: Option<Session>, form: CreateTeamForm| async move {
                let me = match me {
                    Some(me) => me,
                    None => return redirect(LOGIN_PATH).err_to_rejection(),
                };
                let result = logic::create_team(&*store, &me, &form).await;
                submitted(&*store, me, result, |errors| Forms {
                    create: (form, errors),
                    ..Forms::default()
                })
                .await
                .err_to_rejection()
            },
        )
        .boxed()
}

/// The route for changing a team's play time.
pub fn attendance(store: Arc<dyn Store>) -> Resp!() {
    warp::post()
        .and(warp::path!("team" / "attendance"))
        .and(warp::body::content_length_limit(2 * 1024))
        .and(with_store(store.clone()))
        .and(session(store))
        .and(warp::body::form())
        .and_then(
            |store: Arc<dyn Store>, me: Option<Session>, form: AttendanceForm| async move {
                let me = match me {
                    Some(me) => me,
                    None => return redirect(LOGIN_PATH).err_to_rejection(),
                };
                let result = logic::update_attendance(&*store, &me, &form).await;
                submitted(&*store, me, result, |errors| Forms {
                    attendance: (form, errors),
                    ..Forms::default()
                })
                .await
                .err_to_rejection()
            },
        )
        .boxed()
}

/// The two forms on the page, each with whatever the player last submitted and its errors.
#[derive(Debug, Default)]
struct Forms {
    attendance: (AttendanceForm, FieldErrors),
    create: (CreateTeamForm, FieldErrors),
}

/// Redirects after an accepted submission, or shows the page again with the errors.
async fn submitted(
    store: &dyn Store,
    me: Session,
    result: Fallible<Submission>,
    forms: impl FnOnce(FieldErrors) -> Forms,
) -> Fallible<Response<String>> {
    match result? {
        Submission::Accepted { redirect: to, .. } => redirect(to),
        Submission::Rejected(errors) => {
            team_page(store, StatusCode::BAD_REQUEST, me, &forms(errors)).await
        }
    }
}

async fn team_page(
    store: &dyn Store,
    status: StatusCode,
    me: Session,
    forms: &Forms,
) -> Fallible<Response<String>> {
    let (players, team_info) = try_join!(store.players(), store.get_team_info(me.credentials))?;
    let players = build_roster(&players, &[]).players;
    render_html(
        status,
        "create-team.html",
        json!({
            "me": me,
            "players": players,
            "teams": team_rows(&team_info),
            "playTimes": time_options(),
            "attendance": { "form": forms.attendance.0, "errors": forms.attendance.1 },
            "create": { "form": forms.create.0, "errors": forms.create.1 },
        }),
    )
}

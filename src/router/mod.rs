//! The HTTP server.
//!
//! > **Router** is the the only module that knows anything about HTTP. Every other part of the
//! > system has no knowledge of how the request is really being made. The router's responsibility
//! > is to call into the domain logic, and then render that response data with an appropriate view.
//!
//! It is also the navigation collaborator: a submission the logic accepts becomes a redirect.

mod auth;
mod errors;
mod team;
mod util;

use crate::{
    dal::Store,
    logic::{auth::Session, build_roster, schedule},
    router::util::{with_store, ResultExt},
    view::render_html,
};
use failure::Fallible;
use packer::Packer;
use futures::try_join;
use log::{info, warn};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use warp::{
    http::{header::CONTENT_TYPE, Response, StatusCode},
    Filter, Rejection, Reply,
};

/// Serves the application at the given address until the server stops.
pub async fn serve_on(addr: SocketAddr, store: Arc<dyn Store>) -> Fallible<()> {
    let server = statics()
        .or(routes(store))
        .recover(errors::recover)
        .with(warp::log("vrcladder::router"));
    let (addr, server) = warp::serve(server).try_bind_ephemeral(addr)?;
    info!("Serving on {}...", addr);
    server.await;
    warn!("HTTP server exited");
    Ok(())
}

/// Every page and form handler.
pub fn routes(store: Arc<dyn Store>) -> Resp!() {
    ladder(store.clone())
        .or(match_groups(store.clone()))
        .unify()
        .or(team::page(store.clone()))
        .unify()
        .or(team::create(store.clone()))
        .unify()
        .or(team::attendance(store.clone()))
        .unify()
        .or(auth::login_get(store.clone()))
        .unify()
        .or(auth::login_post(store.clone()))
        .unify()
        .or(auth::logout())
        .unify()
        .boxed()
}

fn statics() -> impl Clone + Filter<Extract = (impl Reply,), Error = Rejection> {
    #[derive(Packer)]
    #[folder = "src/static"]
    struct Assets;

    warp::get()
        .and(warp::path("static"))
        .and(warp::path::tail())
        .and_then(|path: warp::path::Tail| async move {
            let body = match Assets::get(path.as_str()) {
                Some(body) => body,
                None => return Err(warp::reject::not_found()),
            };
            let content_type = if path.as_str().ends_with(".css") {
                "text/css; charset=utf-8"
            } else {
                "application/octet-stream"
            };
            Response::builder()
                .header(CONTENT_TYPE, content_type)
                .body(body)
                .map_err(failure::Error::from)
                .err_to_rejection()
        })
}

fn ladder(store: Arc<dyn Store>) -> Resp!() {
    warp::get()
        .and(warp::path::end().or(warp::path!("ladder")).unify())
        .and(with_store(store.clone()))
        .and(auth::session(store))
        .and_then(|store: Arc<dyn Store>, me: Option<Session>| async move {
            ladder_page(&*store, me).await.err_to_rejection()
        })
        .boxed()
}

async fn ladder_page(store: &dyn Store, me: Option<Session>) -> Fallible<Response<String>> {
    let (players, teams) = try_join!(store.players(), store.teams())?;
    let roster = build_roster(&players, &teams);
    render_html(
        StatusCode::OK,
        "index.html",
        json!({ "me": me, "roster": roster }),
    )
}

fn match_groups(store: Arc<dyn Store>) -> Resp!() {
    warp::get()
        .and(warp::path!("match-groups"))
        .and(with_store(store.clone()))
        .and(auth::session(store))
        .and_then(|store: Arc<dyn Store>, me: Option<Session>| async move {
            match_groups_page(&*store, me).await.err_to_rejection()
        })
        .boxed()
}

async fn match_groups_page(store: &dyn Store, me: Option<Session>) -> Fallible<Response<String>> {
    let (teams, attendance) = try_join!(store.teams(), store.attendance())?;
    let schedule = schedule(&teams, &attendance);
    render_html(
        StatusCode::OK,
        "match-groups.html",
        json!({ "me": me, "schedule": schedule }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dal::test_util::seeded;
    use warp::http::header::{LOCATION, SET_COOKIE};

    fn app() -> Resp!() {
        routes(Arc::new(seeded()))
    }

    fn cookie_for<B>(resp: &Response<B>) -> String {
        let set_cookie = resp.headers()[SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_owned()
    }

    fn body<B: AsRef<[u8]>>(resp: &Response<B>) -> String {
        String::from_utf8(resp.body().as_ref().to_vec()).unwrap()
    }

    #[tokio::test]
    async fn ladder_lists_teams_and_players() {
        let app = app();
        for path in &["/", "/ladder"] {
            let resp = warp::test::request().path(path).reply(&app).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let html = body(&resp);
            assert!(html.contains("Dana"));
            let alex = html.find("<li>Alex").unwrap();
            let dana = html.find("<li>Dana").unwrap();
            assert!(alex < dana);
        }
    }

    #[tokio::test]
    async fn match_groups_render_without_attendance() {
        let resp = warp::test::request()
            .path("/match-groups")
            .reply(&app())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body(&resp).contains("Not enough teams are attending yet."));
    }

    #[tokio::test]
    async fn team_page_requires_login() {
        let resp = warp::test::request().path("/team").reply(&app()).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers()[LOCATION], "/login");
    }

    #[tokio::test]
    async fn create_a_team_then_see_it() {
        let app = app();
        let resp = warp::test::request()
            .method("POST")
            .path("/login")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("email=u3%40example.com&passcode=u3-passcode")
            .reply(&app)
            .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        let cookie = cookie_for(&resp);

        let resp = warp::test::request()
            .method("POST")
            .path("/team")
            .header("cookie", cookie.as_str())
            .header("content-type", "application/x-www-form-urlencoded")
            .body("secondPlayerId=u3")
            .reply(&app)
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body(&resp).contains("Cannot be same person"));

        let resp = warp::test::request()
            .method("POST")
            .path("/team")
            .header("cookie", cookie.as_str())
            .header("content-type", "application/x-www-form-urlencoded")
            .body("secondPlayerId=u9")
            .reply(&app)
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body(&resp).contains("Unknown player"));

        let resp = warp::test::request()
            .method("POST")
            .path("/team")
            .header("cookie", cookie.as_str())
            .header("content-type", "application/x-www-form-urlencoded")
            .body("secondPlayerId=u4")
            .reply(&app)
            .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers()[LOCATION], "/ladder");

        let resp = warp::test::request()
            .path("/team")
            .header("cookie", cookie.as_str())
            .reply(&app)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body(&resp).contains("Second Player: Blair"));
    }

    #[tokio::test]
    async fn attendance_form_reports_missing_fields() {
        let app = app();
        let resp = warp::test::request()
            .method("POST")
            .path("/login")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("email=u1%40example.com&passcode=u1-passcode")
            .reply(&app)
            .await;
        let cookie = cookie_for(&resp);

        let resp = warp::test::request()
            .method("POST")
            .path("/team/attendance")
            .header("cookie", cookie.as_str())
            .header("content-type", "application/x-www-form-urlencoded")
            .body("teamId=&playTime=")
            .reply(&app)
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(&resp).matches(">Required<").count(), 2);

        let resp = warp::test::request()
            .method("POST")
            .path("/team/attendance")
            .header("cookie", cookie.as_str())
            .header("content-type", "application/x-www-form-urlencoded")
            .body("teamId=t1&playTime=TIME_SLOT_A")
            .reply(&app)
            .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers()[LOCATION], "/ladder");
    }

    #[tokio::test]
    async fn logins_without_the_passcode_get_no_cookie() {
        let app = app();
        let attempts = &[
            "email=u1%40example.com",
            "email=u1%40example.com&passcode=",
            "email=u1%40example.com&passcode=u2-passcode",
            "email=nobody%40example.com&passcode=u1-passcode",
        ];
        for attempt in attempts {
            let resp = warp::test::request()
                .method("POST")
                .path("/login")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(*attempt)
                .reply(&app)
                .await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", attempt);
            assert!(resp.headers().get(SET_COOKIE).is_none(), "{}", attempt);
            assert!(body(&resp).contains("Wrong email address or passcode"));
        }
    }

    #[tokio::test]
    async fn statics_are_served() {
        let resp = warp::test::request()
            .path("/static/style.css")
            .reply(&statics())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/css; charset=utf-8");
    }
}

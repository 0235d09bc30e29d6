use crate::{
    dal::{Store, StoreError},
    logic::{self, auth::Session, validate::FieldErrors},
    router::util::{redirect, with_store, ResultExt},
    view::render_html,
};
use chrono::Duration;
use failure::Fallible;
use log::debug;
use serde_derive::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use warp::{
    http::{header::SET_COOKIE, HeaderValue, Response, StatusCode},
    Filter, Rejection,
};

const BAD_LOGIN: &str = "Wrong email address or passcode";

/// A filter that looks up the session for the `auth` cookie. A missing or stale cookie means
/// nobody is logged in; it never rejects the request.
pub fn session(
    store: Arc<dyn Store>,
) -> impl Clone + Filter<Extract = (Option<Session>,), Error = Rejection> {
    warp::cookie::optional("auth")
        .and(with_store(store))
        .and_then(|token: Option<String>, store: Arc<dyn Store>| async move {
            let session = match token {
                Some(token) => match logic::auth::authed_user(&*store, &token).await {
                    Ok(session) => Some(session),
                    Err(err) => {
                        debug!("Ignoring auth cookie: {}", err);
                        None
                    }
                },
                None => None,
            };
            Ok::<_, Rejection>(session)
        })
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct LoginForm {
    email: String,

    #[serde(default, skip_serializing)]
    passcode: String,
}

pub fn login_get(store: Arc<dyn Store>) -> Resp!() {
    warp::get()
        .and(warp::path!("login"))
        .and(session(store))
        .and_then(|me: Option<Session>| async move {
            login_page(StatusCode::OK, me, &LoginForm::default(), &FieldErrors::default())
                .err_to_rejection()
        })
        .boxed()
}

pub fn login_post(store: Arc<dyn Store>) -> Resp!() {
    warp::post()
        .and(warp::path!("login"))
        .and(warp::body::content_length_limit(2 * 1024))
        .and(with_store(store))
        .and(warp::body::form())
        .and_then(|store: Arc<dyn Store>, form: LoginForm| async move {
            login(&*store, form).await.err_to_rejection()
        })
        .boxed()
}

async fn login(store: &dyn Store, form: LoginForm) -> Fallible<Response<String>> {
    let token = match logic::auth::login(store, &form.email, &form.passcode).await {
        Ok(token) => token,
        Err(err) => {
            let refused = match err.downcast_ref::<StoreError>() {
                Some(StoreError::Unauthorized) => true,
                _ => false,
            };
            if !refused {
                return Err(err);
            }
            let errors = FieldErrors::single("passcode", BAD_LOGIN);
            return login_page(StatusCode::UNAUTHORIZED, None, &form, &errors);
        }
    };

    let set_cookie = format!(
        "auth={}; Max-Age={}; Path=/; HttpOnly",
        token,
        Duration::weeks(520).num_seconds()
    );
    let mut resp = redirect("/team")?;
    let _ = resp.headers_mut().insert(SET_COOKIE, set_cookie.parse()?);
    Ok(resp)
}

pub fn logout() -> Resp!() {
    warp::get()
        .and(warp::path!("logout"))
        .and_then(|| async {
            let mut resp = redirect("/").err_to_rejection()?;
            let _ = resp
                .headers_mut()
                .insert(SET_COOKIE, HeaderValue::from_static("auth=; Max-Age=0; Path=/"));
            Ok::<_, Rejection>(resp)
        })
        .boxed()
}

fn login_page(
    status: StatusCode,
    me: Option<Session>,
    form: &LoginForm,
    errors: &FieldErrors,
) -> Fallible<Response<String>> {
    render_html(
        status,
        "login.html",
        json!({ "me": me, "form": form, "errors": errors }),
    )
}

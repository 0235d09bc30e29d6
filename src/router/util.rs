use crate::dal::Store;
use failure::{Error, Fallible};
use std::{convert::Infallible, sync::Arc};
use warp::{
    http::{header::LOCATION, Response, StatusCode},
    reject::{custom, Reject},
    Filter, Rejection,
};

/// An unexpected error, carried inside a `Rejection` until `errors::recover` renders it.
#[derive(Debug)]
pub struct Internal(pub Error);

impl Reject for Internal {}

/// An extension trait for results.
pub trait ResultExt<T> {
    /// Converts an error to a `warp::Rejection`.
    fn err_to_rejection(self) -> Result<T, Rejection>;
}

impl<T> ResultExt<T> for Fallible<T> {
    fn err_to_rejection(self) -> Result<T, Rejection> {
        self.map_err(|err| custom(Internal(err)))
    }
}

/// Passes the store to a handler.
pub fn with_store(
    store: Arc<dyn Store>,
) -> impl Clone + Filter<Extract = (Arc<dyn Store>,), Error = Infallible> {
    warp::any().map(move || store.clone())
}

/// A `302 Found` to the given path.
pub fn redirect(location: &str) -> Fallible<Response<String>> {
    let resp = Response::builder()
        .header(LOCATION, location)
        .status(StatusCode::FOUND)
        .body(String::new())?;
    Ok(resp)
}

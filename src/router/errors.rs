use crate::{
    router::util::Internal,
    util::{causes, log_err},
};
use warp::{
    http::{Response, StatusCode},
    Rejection,
};

/// Turns rejections that got past every route into responses. Unexpected errors are logged and
/// shown with their causes; anything else warp knows how to answer is passed back to it.
pub async fn recover(err: Rejection) -> Result<Response<String>, Rejection> {
    if let Some(Internal(err)) = err.find::<Internal>() {
        log_err(err);
        let mut msg = "Internal Server Error; please tell the league organizers the following:\n"
            .to_owned();
        for cause in causes(err) {
            msg.push('\n');
            msg += &cause;
        }
        let mut resp = Response::new(msg);
        *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        Ok(resp)
    } else if err.is_not_found() {
        let mut resp = Response::new("Not Found".to_owned());
        *resp.status_mut() = StatusCode::NOT_FOUND;
        Ok(resp)
    } else {
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use failure::format_err;
    use futures::executor::block_on;
    use warp::reject::{custom, not_found, Reject};

    #[derive(Debug)]
    struct Unhandled;

    impl Reject for Unhandled {}

    #[test]
    fn internal_errors_show_their_causes() {
        let err = format_err!("store unavailable");
        let resp = block_on(recover(custom(Internal(err)))).unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.body().contains("store unavailable"));
    }

    #[test]
    fn not_found_is_answered() {
        let resp = block_on(recover(not_found())).unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_rejections_go_back_to_warp() {
        assert!(block_on(recover(custom(Unhandled))).is_err());
    }
}

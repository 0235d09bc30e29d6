//! Various utilities.

use log::error;

/// Logs an error, including its causes and backtrace (if possible).
pub fn log_err(err: &failure::Error) {
    let causes = causes(err);
    if causes.len() <= 1 {
        error!("{}", err);
    } else {
        for (i, cause) in causes.iter().enumerate() {
            let prefix = if i == 0 { "" } else { "caused by: " };
            error!("{:>11}{}", prefix, cause);
        }
    }
    let bt = err.backtrace().to_string();
    if !bt.is_empty() {
        error!("{}", bt);
    }
}

/// Renders an error and each of its causes, outermost first.
pub fn causes(err: &failure::Error) -> Vec<String> {
    err.iter_chain().map(|cause| cause.to_string()).collect()
}

/// The type of a route. Every route answers with a `Response<String>`, so any two of them can be
/// `or`-ed and unified.
macro_rules! Resp {
    () => { warp::filters::BoxedFilter<(warp::http::Response<String>,)> };
}

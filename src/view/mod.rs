//! Rendering to templates.
//!
//! > View is the only module that knows anything about HTML, or JSON, or other "renderings" of the
//! > response. I'm happy to call this "view" in common with traditional stateless MVC, because
//! > it's role is largely the same.

use crate::{
    logic::time::display_time,
    schema::{PlayTime, TeamInfo},
};
use failure::Fallible;
use packer::Packer;
use serde_derive::Serialize;
use tera::{Context, Tera};
use warp::http::{header::CONTENT_TYPE, Response, StatusCode};

lazy_static::lazy_static! {
    static ref TERA: Tera = {
        #[derive(Packer)]
        #[folder = "src/view/templates"]
        struct Templates;

        let mut tera = Tera::default();
        let templates = Templates::list()
            .map(|name| (name, Templates::get_str(name).unwrap()))
            .collect::<Vec<_>>();
        tera.add_raw_templates(templates).unwrap();
        tera
    };
}

/// A time slot as offered in a `<select>`.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct TimeOption {
    /// The code submitted with the form.
    pub value: &'static str,

    /// The label shown to the player.
    pub time: &'static str,
}

/// The time slots, in the order they're offered.
pub fn time_options() -> Vec<TimeOption> {
    PlayTime::ALL
        .iter()
        .map(|pt| TimeOption {
            value: pt.code(),
            time: pt.label(),
        })
        .collect()
}

/// One of the logged-in player's teams, ready for display.
#[derive(Clone, Debug, Serialize)]
pub struct TeamRow<'a> {
    /// The team.
    pub team: &'a TeamInfo,

    /// The label for its play time.
    pub time: &'static str,
}

/// Labels each of the player's teams with its play time.
pub fn team_rows(teams: &[TeamInfo]) -> Vec<TeamRow> {
    teams
        .iter()
        .map(|team| TeamRow {
            team,
            time: display_time(&team.play_time),
        })
        .collect()
}

/// Renders a template as HTML to a String.
pub fn render<T: serde::Serialize>(name: &str, data: T) -> Fallible<String> {
    let context = Context::from_serialize(data)?;
    Ok(TERA.render(name, &context)?)
}

/// Renders a template as an HTML response with the given status.
pub fn render_html<T: serde::Serialize>(
    status: StatusCode,
    name: &str,
    data: T,
) -> Fallible<Response<String>> {
    let body = render(name, data)?;
    let resp = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .body(body)?;
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::validate::FieldErrors;
    use serde_json::json;

    #[test]
    fn every_template_parses() {
        let names = TERA.get_template_names().collect::<Vec<_>>();
        for name in &["index.html", "match-groups.html", "create-team.html", "login.html"] {
            assert!(names.contains(name), "missing template {}", name);
        }
    }

    #[test]
    fn field_errors_are_rendered() {
        let html = render(
            "login.html",
            json!({
                "me": null,
                "form": { "email": "x@example.com" },
                "errors": FieldErrors::single("email", "No player has that email address"),
            }),
        )
        .unwrap();
        assert!(html.contains("No player has that email address"));
        assert!(html.contains("x@example.com"));
    }

    #[test]
    fn time_options_follow_play_time_order() {
        let values = time_options()
            .into_iter()
            .map(|opt| opt.value)
            .collect::<Vec<_>>();
        assert_eq!(values, vec!["TIME_SLOT_A", "TIME_SLOT_B", "NONE"]);
    }
}

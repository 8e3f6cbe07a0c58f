use rocket::{
    http::Status,
    response::status,
    serde::json::{json, Json, Value},
    Catcher, Request, Route,
};

mod analysis;
mod results;
mod submission;
mod survey;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(survey::routes());
    routes.extend(submission::routes());
    routes.extend(results::routes());
    routes.extend(analysis::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers![default_catcher]
}

/// Keep error bodies JSON for failures that never reach a handler, such as
/// unmatched routes.
#[catch(default)]
fn default_catcher(status: Status, _req: &Request<'_>) -> status::Custom<Json<Value>> {
    status::Custom(status, Json(json!({ "error": status.reason_lossy() })))
}

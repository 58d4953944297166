use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use utoipa::OpenApi;

use crate::api::rest::{handlers, openapi::ApiDoc};
use crate::domain::service::Service;

pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let api = Router::new()
        .route("/team/add", post(handlers::add_team))
        .route("/team/get", get(handlers::get_team))
        .route("/users/setIsActive", post(handlers::set_is_active))
        .route("/users/getReview", get(handlers::get_review))
        .route("/pullRequest/create", post(handlers::create_pull_request))
        .route("/pullRequest/merge", post(handlers::merge_pull_request))
        .route("/pullRequest/reassign", post(handlers::reassign_reviewer))
        .layer(Extension(service));

    let doc = ApiDoc::openapi();
    let router = router
        .merge(api)
        .route("/openapi.json", get(move || async move { Json(doc) }));

    Ok(router)
}

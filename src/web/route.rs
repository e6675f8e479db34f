use crate::service::SharedNodeSourceService;
use crate::web::upload::{create_node_source, UploadState};
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub const CREATE_NODE_SOURCE_ROUTE: &str = "/createnodesource";

pub fn merge_vec(routers: Vec<Router>) -> Router {
    let mut router = Router::new();
    for r in routers {
        router = router.merge(r);
    }
    router
}

/// upload routes, limited to `web.upload_max_size` bytes of body
pub fn upload_routes(service: SharedNodeSourceService, web: &crate::conf::Web) -> Router {
    let state = UploadState { service, upload_max_size: web.upload_max_size };
    Router::new()
        .route(CREATE_NODE_SOURCE_ROUTE, get(create_node_source).post(create_node_source))
        .layer(DefaultBodyLimit::max(web.upload_max_size))
        .with_state(state)
}

/// every portal route, traced
pub fn portal_router(service: SharedNodeSourceService, web: &crate::conf::Web) -> Router {
    merge_vec(vec![upload_routes(service, web)]).layer(TraceLayer::new_for_http())
}

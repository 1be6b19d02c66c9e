use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Response,
    routing::get,
};

use crate::{
    application::posts::PostService,
    infra::{assets::serve_static, csrf::CsrfGuard, db::SqliteRepositories},
    presentation::views::{
        AboutTemplate, ContactTemplate, IndexTemplate, IndexView, LayoutChrome, LayoutContext,
        PostDetailView, PostTemplate, StaticPageView, render_not_found_response,
        render_template_response,
    },
};

use super::{
    db_health_response,
    middleware::{log_responses, set_request_context},
    parse_post_id, post_service_error_response, posts,
};

#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<PostService>,
    pub db: Arc<SqliteRepositories>,
    pub chrome: LayoutChrome,
    pub csrf: Arc<CsrfGuard>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/post/{id}", get(show_post))
        .route("/about", get(about))
        .route("/contact", get(contact))
        .route(
            "/new-post",
            get(posts::new_post_form).post(posts::new_post_submit),
        )
        .route(
            "/edit/{id}",
            get(posts::edit_post_form).post(posts::edit_post_submit),
        )
        .route("/delete/{id}", get(posts::delete_post))
        .route("/_health/db", get(public_health))
        .route("/static/{*path}", get(serve_static))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn index(State(state): State<HttpState>) -> Response {
    match state.posts.list_posts().await {
        Ok(posts) => {
            let view = LayoutContext::new(state.chrome.clone(), IndexView::new(&posts));
            render_template_response(IndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => post_service_error_response(&state, "infra::http::public::index", err),
    }
}

async fn show_post(State(state): State<HttpState>, Path(raw_id): Path<String>) -> Response {
    let Some(id) = parse_post_id(&raw_id) else {
        return render_not_found_response(state.chrome.clone());
    };

    match state.posts.load_post(id).await {
        Ok(Some(post)) => {
            let chrome = state.chrome.clone().with_title(post.title.clone());
            let view = LayoutContext::new(chrome, PostDetailView::from(&post));
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(state.chrome.clone()),
        Err(err) => post_service_error_response(&state, "infra::http::public::show_post", err),
    }
}

async fn about(State(state): State<HttpState>) -> Response {
    let chrome = state.chrome.clone().with_title("About");
    let view = LayoutContext::new(chrome, StaticPageView::about());
    render_template_response(AboutTemplate { view }, StatusCode::OK)
}

async fn contact(State(state): State<HttpState>) -> Response {
    let chrome = state.chrome.clone().with_title("Contact");
    let view = LayoutContext::new(chrome, StaticPageView::contact());
    render_template_response(ContactTemplate { view }, StatusCode::OK)
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.db.health_check().await)
}

async fn fallback(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.chrome.clone())
}

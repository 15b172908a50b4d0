//! HTTP server - listing and detail pages, JSON API, theme switch and assets

use anyhow::Result;
use axum::{
    extract::{FromRequestParts, Path, State},
    http::{header, request::Parts, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::BlogError;
use crate::templates::{PostPage, SiteData, TemplateRenderer};
use crate::theme::Theme;
use crate::Blog;

/// Server state
struct ServerState {
    blog: Arc<Blog>,
    templates: TemplateRenderer,
    site: SiteData,
}

type SharedState = Arc<ServerState>;

#[axum::async_trait]
impl<S> FromRequestParts<S> for Theme
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(Theme::from_cookie_header)
            .unwrap_or_default())
    }
}

/// Build the application router
pub fn router(blog: Arc<Blog>) -> Result<Router> {
    let state = Arc::new(ServerState {
        templates: TemplateRenderer::new()?,
        site: SiteData::from_config(&blog.config),
        blog: Arc::clone(&blog),
    });

    let assets = ServeDir::new(&blog.assets_dir);

    let app = Router::new()
        .route("/", get(index_page))
        .route("/api/posts", get(api_posts))
        .route("/api/posts/:slug", get(api_post))
        .route("/theme", get(theme_post_page).post(toggle_theme))
        .route("/theme/:mode", get(set_theme))
        .route("/:slug", get(post_page))
        .nest_service(&blog.config.asset_mount(), assets)
        .fallback(not_found_page)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Start the server
pub async fn start(blog: Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(Arc::new(blog))?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run blocking filesystem work off the async workers
async fn blocking<T, F>(state: &ServerState, f: F) -> Result<T>
where
    F: FnOnce(&Blog) -> Result<T, BlogError> + Send + 'static,
    T: Send + 'static,
{
    let blog = Arc::clone(&state.blog);
    Ok(tokio::task::spawn_blocking(move || f(&blog)).await??)
}

/// NotFound and Parse map to 404, everything else to 500
fn status_for(err: &anyhow::Error) -> StatusCode {
    match err.downcast_ref::<BlogError>() {
        Some(e) if e.is_not_found() => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn html_response(status: StatusCode, rendered: Result<String>) -> Response {
    match rendered {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

fn error_page(state: &ServerState, theme: Theme, status: StatusCode) -> Response {
    let message = if status == StatusCode::NOT_FOUND {
        "Not Found"
    } else {
        "I think I broke something.."
    };
    let rendered = state.templates.render_error(
        &state.site,
        theme,
        status.as_u16(),
        status.canonical_reason().unwrap_or_default(),
        message,
    );
    html_response(status, rendered)
}

fn json_error(status: StatusCode, err: &anyhow::Error) -> Response {
    let body = serde_json::json!({ "error": err.to_string() });
    (status, Json(body)).into_response()
}

async fn index_page(State(state): State<SharedState>, theme: Theme) -> Response {
    match blocking(&state, |blog| blog.posts()).await {
        Ok(posts) => html_response(
            StatusCode::OK,
            state.templates.render_index(&state.site, theme, &posts),
        ),
        Err(e) => {
            tracing::error!("Failed to list posts: {:#}", e);
            error_page(&state, theme, StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn post_page(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    theme: Theme,
) -> Response {
    render_post_page(&state, slug, theme).await
}

/// `GET /theme` shares its path with the theme toggle, so a post named
/// `theme` is answered here
async fn theme_post_page(State(state): State<SharedState>, theme: Theme) -> Response {
    render_post_page(&state, "theme".to_string(), theme).await
}

async fn render_post_page(state: &ServerState, slug: String, theme: Theme) -> Response {
    let lookup = slug.clone();
    match blocking(state, move |blog| blog.post(&lookup)).await {
        Ok(post) => {
            let page = PostPage {
                image: post
                    .featured_image
                    .as_deref()
                    .map(|img| state.blog.loader().renderer().rewrite_image_url(img)),
                canonical: format!("{}/{}", state.site.url, slug),
                post,
            };
            html_response(
                StatusCode::OK,
                state.templates.render_post(&state.site, theme, &page),
            )
        }
        Err(e) => {
            tracing::info!("Post {:?} unavailable: {:#}", slug, e);
            error_page(state, theme, status_for(&e))
        }
    }
}

async fn not_found_page(State(state): State<SharedState>, theme: Theme) -> Response {
    error_page(&state, theme, StatusCode::NOT_FOUND)
}

async fn api_posts(State(state): State<SharedState>) -> Response {
    match blocking(&state, |blog| blog.posts()).await {
        Ok(posts) => Json(posts).into_response(),
        Err(e) => {
            tracing::error!("Failed to list posts: {:#}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &e)
        }
    }
}

async fn api_post(State(state): State<SharedState>, Path(slug): Path<String>) -> Response {
    match blocking(&state, move |blog| blog.post(&slug)).await {
        Ok(post) => Json(post).into_response(),
        Err(e) => json_error(status_for(&e), &e),
    }
}

/// Flip the current theme and persist it
async fn toggle_theme(theme: Theme, headers: HeaderMap) -> Response {
    persist_theme(theme.toggled(), &headers)
}

/// Persist an explicit theme
async fn set_theme(Path(mode): Path<String>, headers: HeaderMap) -> Response {
    match mode.parse::<Theme>() {
        Ok(theme) => persist_theme(theme, &headers),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

fn persist_theme(theme: Theme, headers: &HeaderMap) -> Response {
    tracing::debug!("Theme set to {}", theme);
    let target = referer_path(headers);
    (
        [(header::SET_COOKIE, theme.to_set_cookie())],
        Redirect::to(&target),
    )
        .into_response()
}

/// Same-site path of the Referer, or `/`
fn referer_path(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| referer.parse::<Uri>().ok())
        .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_string()))
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or_else(|| "/".to_string())
}

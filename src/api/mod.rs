//! HTTP handlers and routing

pub mod books;
pub mod health;
pub mod home;
pub mod requests;
pub mod session;
pub mod users;

use axum::{
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tower_sessions::SessionStore;

use crate::{
    error::{AppError, AppResult},
    models::user::SessionUser,
    AppState,
};

pub use session::Session;

/// Create the application router with all routes, keeping sessions in `store`
pub fn router<S: SessionStore + Clone>(state: AppState, store: S) -> Router {
    let sessions = session::layer(store, &state.config.session);

    Router::new()
        .route("/", get(home::home))
        .route("/about", get(home::about))
        // Requests
        .route("/request/new", get(requests::new_request).post(requests::create_request))
        .route("/request/:id", get(requests::show_request))
        // Users
        .route("/user/signup", get(users::signup_user).post(users::create_user))
        .route("/user/login", get(users::login_user).post(users::verify_user))
        .route("/user/logout", post(users::logout_user))
        // Books
        .route("/book/new", get(books::new_book).post(books::create_book))
        .route("/book/:volume_id", get(books::show_book))
        .route("/book/:volume_id/edit", get(books::edit_book).post(books::update_book))
        .route("/book/:volume_id/download", post(books::download_book))
        // Health
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .fallback(not_found)
        .with_state(state)
        .layer(sessions)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn not_found() -> AppError {
    AppError::NotFound("No such page".to_string())
}

/// Parse a positive numeric path id; anything else is a 404
pub fn parse_id(raw: &str) -> AppResult<i32> {
    match raw.parse::<i32>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::NotFound(format!("Invalid id {:?}", raw))),
    }
}

/// Logged-in user for a write action, rejecting anonymous submissions
pub fn require_user(session: &Session) -> AppResult<SessionUser> {
    session
        .user()
        .cloned()
        .ok_or_else(|| AppError::BadRequest("Login required".to_string()))
}

/// Send an anonymous visitor to the login page with an explanation
pub async fn redirect_to_login(mut session: Session, message: &str) -> AppResult<Response> {
    session.add_flash(message);
    session.save().await?;
    Ok(Redirect::to("/user/login").into_response())
}

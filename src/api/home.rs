//! Home and about pages

use axum::{extract::State, response::Html};

use crate::{
    error::AppResult,
    views::{self, Template, TemplateData},
    AppState,
};

use super::Session;

/// Latest requests and books, with the site announcement if configured
pub async fn home(
    State(state): State<AppState>,
    mut session: Session,
) -> AppResult<Html<String>> {
    let limit = state.config.site.latest_limit;
    let requests = state.services.requests.latest(limit).await?;
    let books = state.services.catalog.latest_books(limit).await?;

    let flash = session.take_flash();
    let current_user = session.user().cloned();
    session.save().await?;

    Ok(views::render(
        Template::Home,
        TemplateData {
            current_user,
            flash,
            announcement: state.config.site.announcement.clone(),
            requests,
            books,
            ..Default::default()
        },
    ))
}

pub async fn about(session: Session) -> Html<String> {
    views::render(
        Template::About,
        TemplateData {
            current_user: session.user().cloned(),
            ..Default::default()
        },
    )
}

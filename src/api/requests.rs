//! Book request pages

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::request::NewRequest,
    views::{self, FormView, Template, TemplateData},
    AppState,
};

use super::{parse_id, redirect_to_login, require_user, Session};

/// Display a single request
pub async fn show_request(
    State(state): State<AppState>,
    mut session: Session,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = parse_id(&id)?;

    let request = state
        .services
        .requests
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

    let flash = session.take_flash();
    let current_user = session.user().cloned();
    session.save().await?;

    Ok(views::render(
        Template::ShowRequest,
        TemplateData {
            current_user,
            flash,
            request: Some(request),
            ..Default::default()
        },
    ))
}

/// Display the new request form
pub async fn new_request(session: Session) -> AppResult<Response> {
    let Some(user) = session.user().cloned() else {
        return redirect_to_login(session, "Please log in to make a request.").await;
    };

    Ok(views::render(
        Template::NewRequest,
        TemplateData {
            current_user: Some(user),
            form: Some(FormView::Request(NewRequest::default())),
            ..Default::default()
        },
    )
    .into_response())
}

/// Create a new request on behalf of the logged-in user
pub async fn create_request(
    State(state): State<AppState>,
    mut session: Session,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    WithRejection(Form(mut form), _): WithRejection<Form<NewRequest>, AppError>,
) -> AppResult<Response> {
    let user = require_user(&session)?;
    form.requester = user.username.clone();

    if !form.valid() {
        return Ok(views::render(
            Template::NewRequest,
            TemplateData {
                current_user: Some(user),
                form: Some(FormView::Request(form)),
                ..Default::default()
            },
        )
        .into_response());
    }

    let ip = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default();
    let id = state.services.requests.create(&form, &ip).await?;

    session.add_flash("Your request was saved successfully!");
    session.save().await?;

    Ok(Redirect::to(&format!("/request/{}", id)).into_response())
}

//! Book catalog pages

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::{book::NewBook, user::SessionUser},
    views::{self, FormView, Template, TemplateData},
    AppState,
};

use super::{redirect_to_login, require_user, Session};

fn book_not_found(volume_id: &str) -> AppError {
    AppError::NotFound(format!("Book {} not found", volume_id))
}

fn render_book_form(template: Template, user: SessionUser, form: NewBook) -> Response {
    views::render(
        template,
        TemplateData {
            current_user: Some(user),
            form: Some(FormView::Book(form)),
            ..Default::default()
        },
    )
    .into_response()
}

/// Display a single book
pub async fn show_book(
    State(state): State<AppState>,
    mut session: Session,
    Path(volume_id): Path<String>,
) -> AppResult<Html<String>> {
    let book = state
        .services
        .catalog
        .get_book(&volume_id)
        .await?
        .ok_or_else(|| book_not_found(&volume_id))?;

    let flash = session.take_flash();
    let current_user = session.user().cloned();
    session.save().await?;

    Ok(views::render(
        Template::ShowBook,
        TemplateData {
            current_user,
            flash,
            book: Some(book),
            ..Default::default()
        },
    ))
}

/// Display the upload form
pub async fn new_book(session: Session) -> AppResult<Response> {
    let Some(user) = session.user().cloned() else {
        return redirect_to_login(session, "Please log in to upload a book.").await;
    };

    Ok(render_book_form(Template::NewBook, user, NewBook::default()))
}

/// Add a book to the catalog, uploaded by the logged-in user
pub async fn create_book(
    State(state): State<AppState>,
    mut session: Session,
    WithRejection(Form(mut form), _): WithRejection<Form<NewBook>, AppError>,
) -> AppResult<Response> {
    let user = require_user(&session)?;
    form.uploader = user.username.clone();

    if !form.valid() {
        return Ok(render_book_form(Template::NewBook, user, form));
    }

    if state.services.catalog.volume_exists(&form.volume_id).await? {
        form.errors
            .add("volume_id", "A book with this volume ID already exists");
        return Ok(render_book_form(Template::NewBook, user, form));
    }

    state.services.catalog.upload_book(&form).await?;

    session.add_flash("Your book was uploaded successfully!");
    session.save().await?;

    Ok(Redirect::to(&format!("/book/{}", form.volume_id)).into_response())
}

/// Display the edit form filled with the stored book
pub async fn edit_book(
    State(state): State<AppState>,
    session: Session,
    Path(volume_id): Path<String>,
) -> AppResult<Response> {
    let Some(user) = session.user().cloned() else {
        return redirect_to_login(session, "Please log in to edit a book.").await;
    };

    let book = state
        .services
        .catalog
        .get_book(&volume_id)
        .await?
        .ok_or_else(|| book_not_found(&volume_id))?;

    Ok(render_book_form(Template::EditBook, user, NewBook::from(&book)))
}

/// Replace a book's details; the volume ID comes from the path
pub async fn update_book(
    State(state): State<AppState>,
    mut session: Session,
    Path(volume_id): Path<String>,
    WithRejection(Form(mut form), _): WithRejection<Form<NewBook>, AppError>,
) -> AppResult<Response> {
    let user = require_user(&session)?;

    let book = state
        .services
        .catalog
        .get_book(&volume_id)
        .await?
        .ok_or_else(|| book_not_found(&volume_id))?;

    form.volume_id = book.volume_id;
    form.uploader = book.uploader;

    if !form.valid() {
        return Ok(render_book_form(Template::EditBook, user, form));
    }

    state
        .services
        .catalog
        .update_book(&form)
        .await?
        .ok_or_else(|| book_not_found(&volume_id))?;

    session.add_flash("The book was updated successfully!");
    session.save().await?;

    Ok(Redirect::to(&format!("/book/{}", form.volume_id)).into_response())
}

/// Count a download of the book
pub async fn download_book(
    State(state): State<AppState>,
    mut session: Session,
    Path(volume_id): Path<String>,
) -> AppResult<Redirect> {
    let downloads = state
        .services
        .catalog
        .record_download(&volume_id)
        .await?
        .ok_or_else(|| book_not_found(&volume_id))?;

    tracing::debug!("Book {} downloaded {} times", volume_id, downloads);

    session.add_flash("Thanks for downloading!");
    session.save().await?;

    Ok(Redirect::to(&format!("/book/{}", volume_id)))
}

//! Signup, login and logout

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::user::{LoginForm, NewUser, SessionUser},
    views::{self, FormView, Template, TemplateData},
    AppState,
};

use super::Session;

/// Present the signup form
pub async fn signup_user(session: Session) -> Html<String> {
    views::render(
        Template::Signup,
        TemplateData {
            current_user: session.user().cloned(),
            form: Some(FormView::Signup(NewUser::default())),
            ..Default::default()
        },
    )
}

fn redisplay_signup(session: &Session, form: NewUser) -> Response {
    views::render(
        Template::Signup,
        TemplateData {
            current_user: session.user().cloned(),
            form: Some(FormView::Signup(form.redacted())),
            ..Default::default()
        },
    )
    .into_response()
}

/// Create a user account from the signup form
pub async fn create_user(
    State(state): State<AppState>,
    mut session: Session,
    WithRejection(Form(mut form), _): WithRejection<Form<NewUser>, AppError>,
) -> AppResult<Response> {
    if !form.valid() {
        return Ok(redisplay_signup(&session, form));
    }

    if state.services.users.username_taken(&form.username).await? {
        form.errors.add("username", "This username is already taken");
        return Ok(redisplay_signup(&session, form));
    }

    state.services.users.register(&form).await?;

    session.add_flash("Your account was created successfully! Please login.");
    session.save().await?;

    Ok(Redirect::to("/user/login").into_response())
}

/// Present the login form, with any pending flash message
pub async fn login_user(mut session: Session) -> AppResult<Html<String>> {
    let flash = session.take_flash();
    let current_user = session.user().cloned();
    session.save().await?;

    Ok(views::render(
        Template::Login,
        TemplateData {
            current_user,
            flash,
            form: Some(FormView::Login(LoginForm::default())),
            ..Default::default()
        },
    ))
}

/// Check submitted credentials and remember the user in the session
pub async fn verify_user(
    State(state): State<AppState>,
    mut session: Session,
    WithRejection(Form(form), _): WithRejection<Form<LoginForm>, AppError>,
) -> AppResult<Redirect> {
    let user = state
        .services
        .users
        .authenticate(&form.username, &form.password)
        .await?;

    let Some(user) = user else {
        session.add_flash("Invalid Login");
        session.save().await?;
        return Ok(Redirect::to("/user/login"));
    };

    tracing::info!("User {} logged in", user.username);

    session.cycle_id().await?;
    session.set_user(SessionUser::from(&user));
    session.save().await?;

    Ok(Redirect::to("/request/new"))
}

/// Forget the logged-in user
pub async fn logout_user(mut session: Session) -> AppResult<Redirect> {
    session.clear_user();
    session.save().await?;

    Ok(Redirect::to("/"))
}

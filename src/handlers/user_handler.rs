use actix_identity::Identity;
use actix_session::Session;
use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::SqlitePool;

use crate::dto::page_dto::ProfilePageDTO;
use crate::errors::{AppError, Result};
use crate::models::credentials::Credentials;
use crate::models::edit_profile_credentials::EditProfileCredentials;
use crate::models::melody::Melody;
use crate::models::user::User;
use crate::models::user_favorited_track::UserFavoritedTrack;
use crate::utils::auth::{log_in, CurrentUser};
use crate::utils::session;

/// Logs the user in and resets the recommendation list.
///
/// Favorites stay in the database; the cookie store caps the session at about 4 KB.
fn start_session(req: &HttpRequest, session: &Session, user: &User) -> Result<()> {
    log_in(req, user.id)?;
    session::set_recommended_tracks(session, Vec::new())
}

pub async fn signup(
    req: HttpRequest,
    db_pool: web::Data<SqlitePool>,
    session: Session,
    new_user: web::Form<Credentials>,
) -> Result<HttpResponse> {
    let user = User::signup(&db_pool, &new_user.username, &new_user.password).await?;
    start_session(&req, &session, &user)?;
    session::flash_redirect(&session, &format!("Welcome to Melodic, {}!", user.username), "/")
}

pub async fn login(
    req: HttpRequest,
    db_pool: web::Data<SqlitePool>,
    session: Session,
    credentials: web::Form<Credentials>,
) -> Result<HttpResponse> {
    match User::authenticate(&db_pool, &credentials.username, &credentials.password).await? {
        Some(user) => {
            start_session(&req, &session, &user)?;
            log::info!("user {} logged in", user.id);
            session::flash_redirect(&session, &format!("Welcome back, {}!", user.username), "/")
        }
        None => Ok(HttpResponse::Unauthorized().body("Invalid username or password")),
    }
}

pub async fn logout(identity: Option<Identity>, session: Session) -> HttpResponse {
    if let Some(identity) = identity {
        identity.logout();
    }
    session.purge();
    session::redirect("/")
}

pub async fn profile(
    db_pool: web::Data<SqlitePool>,
    session: Session,
    current_user: CurrentUser,
    user_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = user_id.into_inner();
    if !current_user.owns(user_id) {
        return session::deny(&session);
    }

    let user = User::find(&db_pool, user_id).await?.ok_or(AppError::NotFound("User"))?;
    let melodies = Melody::for_user(&db_pool, user_id).await?;
    let favorited_tracks = UserFavoritedTrack::tracks_for_user(&db_pool, user_id).await?;

    session::remember_page(&session, &format!("/profile/{}", user_id))?;
    let messages = session::take_flashes(&session)?;

    Ok(HttpResponse::Ok().json(ProfilePageDTO {
        user_id,
        username: user.username,
        messages,
        melodies,
        favorited_tracks,
    }))
}

pub async fn edit_profile(
    db_pool: web::Data<SqlitePool>,
    session: Session,
    current_user: CurrentUser,
    form: web::Form<EditProfileCredentials>,
) -> Result<HttpResponse> {
    let user_id = match current_user.id() {
        Some(id) => id,
        None => return session::deny(&session),
    };
    let profile_url = format!("/profile/{}", user_id);

    let result = User::update_profile(
        &db_pool,
        user_id,
        &form.password,
        &form.username,
        form.new_password.as_deref(),
    )
    .await;

    match result {
        Ok(_) => session::flash_redirect(&session, "Profile updated", &profile_url),
        Err(AppError::Unauthorized) => session::flash_redirect(&session, "Incorrect password", &profile_url),
        Err(AppError::Validation(message)) => session::flash_redirect(&session, &message, &profile_url),
        Err(e) => Err(e),
    }
}

pub async fn delete_account(
    db_pool: web::Data<SqlitePool>,
    identity: Option<Identity>,
    session: Session,
    current_user: CurrentUser,
) -> Result<HttpResponse> {
    let user_id = match current_user.id() {
        Some(id) => id,
        None => return session::deny(&session),
    };

    User::delete(&db_pool, user_id).await?;
    if let Some(identity) = identity {
        identity.logout();
    }
    session.purge();
    Ok(session::redirect("/"))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/signup").route(web::post().to(signup)));
    cfg.service(web::resource("/login").route(web::post().to(login)));
    cfg.service(web::resource("/logout").route(web::post().to(logout)));
    cfg.service(web::resource("/profile/{user_id}").route(web::get().to(profile)));
    cfg.service(web::resource("/edit-profile").route(web::post().to(edit_profile)));
    cfg.service(web::resource("/delete-account").route(web::post().to(delete_account)));
}

use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::Local;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::dto::page_dto::{FeedMelodyDTO, HomePageDTO};
use crate::errors::{AppError, Result};
use crate::models::melody::{Melody, NewMelody};
use crate::utils::auth::CurrentUser;
use crate::utils::session;

pub const HOME_TITLE: &str = "Welcome to Melodic";

#[derive(Debug, Deserialize)]
pub struct SaveMelodyForm {
    pub name: Option<String>,
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "checkbox")]
    pub visibility: Option<bool>,
}

/// HTML checkboxes post `on`; `true`/`false` are accepted as well.
fn checkbox<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<bool>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    let value = match value {
        Some(value) => value.trim().to_ascii_lowercase(),
        None => return Ok(None),
    };
    match value.as_str() {
        "" => Ok(None),
        "on" | "true" | "1" | "yes" => Ok(Some(true)),
        "off" | "false" | "0" | "no" => Ok(Some(false)),
        other => Err(de::Error::custom(format!("invalid visibility {:?}", other))),
    }
}

pub async fn home(
    db_pool: web::Data<SqlitePool>,
    session: Session,
    current_user: CurrentUser,
) -> Result<HttpResponse> {
    let melodies = Melody::public_feed(&db_pool)
        .await?
        .into_iter()
        .map(|shared| FeedMelodyDTO {
            editable: current_user.owns(shared.melody.user_id),
            shared,
        })
        .collect();

    session::remember_page(&session, "/")?;
    let messages = session::take_flashes(&session)?;

    Ok(HttpResponse::Ok().json(HomePageDTO {
        title: HOME_TITLE,
        current_user: current_user.id(),
        messages,
        melodies,
    }))
}

pub async fn save_melody(
    db_pool: web::Data<SqlitePool>,
    session: Session,
    current_user: CurrentUser,
    form: web::Form<SaveMelodyForm>,
) -> Result<HttpResponse> {
    let user_id = match current_user.id() {
        Some(id) => id,
        None => return session::flash_redirect(&session, "Log-in to save melodies", "/"),
    };

    let form = form.into_inner();
    let melody = Melody::create(
        &db_pool,
        NewMelody {
            user_id: Some(user_id),
            name: form.name,
            timestamp: Some(Local::now().format("%-m/%-d/%y %H:%M").to_string()),
            music_notes: Some(form.notes.unwrap_or_default()),
            visibility: form.visibility,
        },
    )
    .await?;

    log::info!("user {} saved melody {}", user_id, melody.id);
    Ok(session::redirect(&session::last_page(&session)))
}

pub async fn delete_melody(
    db_pool: web::Data<SqlitePool>,
    session: Session,
    current_user: CurrentUser,
    melody_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = match current_user.id() {
        Some(id) => id,
        None => return session::deny(&session),
    };

    match Melody::delete(&db_pool, melody_id.into_inner(), user_id).await {
        Ok(()) => session::flash_redirect(&session, "Melody deleted", &session::last_page(&session)),
        Err(AppError::Unauthorized) => session::deny(&session),
        Err(e) => Err(e),
    }
}

pub async fn edit_melody(
    db_pool: web::Data<SqlitePool>,
    session: Session,
    current_user: CurrentUser,
    melody_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = match current_user.id() {
        Some(id) => id,
        None => return session::deny(&session),
    };

    match Melody::toggle_visibility(&db_pool, melody_id.into_inner(), user_id).await {
        Ok(melody) => {
            let message = if melody.visibility { "Melody shared" } else { "Melody hidden" };
            session::flash_redirect(&session, message, &session::last_page(&session))
        }
        Err(AppError::Unauthorized) => session::deny(&session),
        Err(e) => Err(e),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)));
    cfg.service(web::resource("/save-melody").route(web::post().to(save_melody)));
    cfg.service(web::resource("/delete-melody/{id}").route(web::post().to(delete_melody)));
    cfg.service(web::resource("/edit-melody/{id}").route(web::post().to(edit_melody)));
}

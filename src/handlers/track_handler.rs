use std::collections::HashSet;

use actix_session::Session;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::dto::page_dto::{JamPageDTO, SearchPageDTO, TrackResultDTO};
use crate::errors::Result;
use crate::models::favorited_track::{FavoritedTrack, NewFavoritedTrack};
use crate::models::user_favorited_track::UserFavoritedTrack;
use crate::utils::auth::CurrentUser;
use crate::utils::session;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn search_tracks(
    req: HttpRequest,
    db_pool: web::Data<SqlitePool>,
    session: Session,
    current_user: CurrentUser,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner().q;
    let tracks = if query.trim().is_empty() {
        Vec::new()
    } else {
        FavoritedTrack::search(&db_pool, &query).await?
    };

    let favorite_ids: HashSet<String> = match current_user.id() {
        Some(user_id) => UserFavoritedTrack::spotify_ids_for_user(&db_pool, user_id)
            .await?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };
    let can_favorite = current_user.is_authenticated();
    let tracks = tracks
        .into_iter()
        .map(|track| TrackResultDTO {
            favorited: can_favorite.then(|| favorite_ids.contains(&track.spotify_track_id)),
            track,
        })
        .collect();

    session::remember_page(&session, &req.uri().to_string())?;
    let messages = session::take_flashes(&session)?;

    Ok(HttpResponse::Ok().json(SearchPageDTO {
        query,
        can_favorite,
        messages,
        tracks,
    }))
}

pub async fn jam(
    db_pool: web::Data<SqlitePool>,
    session: Session,
    current_user: CurrentUser,
    spotify_track_id: web::Path<String>,
) -> Result<HttpResponse> {
    let spotify_track_id = spotify_track_id.into_inner();
    let track = FavoritedTrack::find_by_spotify_id(&db_pool, &spotify_track_id).await?;

    let can_favorite = current_user.is_authenticated();
    let is_favorite = match (current_user.id(), &track) {
        (Some(user_id), Some(track)) => Some(UserFavoritedTrack::exists(&db_pool, user_id, track.id).await?),
        (Some(_), None) => Some(false),
        (None, _) => None,
    };
    let recommended_tracks = session::recommended_tracks(&session)?;

    session::remember_page(&session, &format!("/jam/{}", spotify_track_id))?;
    let messages = session::take_flashes(&session)?;

    Ok(HttpResponse::Ok().json(JamPageDTO {
        spotify_track_id,
        track,
        can_favorite,
        is_favorite,
        recommended_tracks,
        messages,
    }))
}

/// Toggles the caller's favorite for a track, recording its metadata on first use.
pub async fn favorite_track(
    db_pool: web::Data<SqlitePool>,
    session: Session,
    current_user: CurrentUser,
    form: web::Form<NewFavoritedTrack>,
) -> Result<HttpResponse> {
    let user_id = match current_user.id() {
        Some(id) => id,
        None => return session::deny(&session),
    };

    let track = FavoritedTrack::find_or_create(&db_pool, form.into_inner()).await?;
    let now_favorite = UserFavoritedTrack::toggle(&db_pool, user_id, &track).await?;
    log::debug!("user {} favorite {} -> {}", user_id, track.spotify_track_id, now_favorite);

    Ok(session::redirect(&session::last_page(&session)))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/search-tracks").route(web::get().to(search_tracks)));
    cfg.service(web::resource("/jam/{spotify_track_id}").route(web::get().to(jam)));
    cfg.service(web::resource("/favorite-track").route(web::post().to(favorite_track)));
}

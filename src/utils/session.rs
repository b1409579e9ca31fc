use actix_session::config::PersistentSession;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::time::Duration;
use actix_web::cookie::Key;
use actix_web::http::header;
use actix_web::HttpResponse;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{AppError, Result};

pub const FLASHES_KEY: &str = "_flashes";
pub const LAST_URL_KEY: &str = "last_url";
pub const RECOMMENDED_TRACKS_KEY: &str = "recommended_tracks";

pub const ACCESS_UNAUTHORIZED: &str = "Access unauthorized";

const SESSION_TTL_DAYS: i64 = 7;

/// Cookie-backed session; the whole state travels signed and encrypted in the cookie.
pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("melodic".to_string())
        .cookie_secure(secure)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::days(SESSION_TTL_DAYS)))
        .build()
}

fn get<T: DeserializeOwned>(session: &Session, key: &str) -> Result<Option<T>> {
    session
        .get::<T>(key)
        .map_err(|e| AppError::Session(e.to_string()))
}

fn set<T: Serialize>(session: &Session, key: &str, value: T) -> Result<()> {
    session
        .insert(key, value)
        .map_err(|e| AppError::Session(e.to_string()))
}

pub fn flash(session: &Session, message: &str) -> Result<()> {
    let mut flashes: Vec<String> = get(session, FLASHES_KEY)?.unwrap_or_default();
    flashes.push(message.to_string());
    set(session, FLASHES_KEY, flashes)
}

/// Drains the queued flash messages.
pub fn take_flashes(session: &Session) -> Result<Vec<String>> {
    let flashes: Vec<String> = get(session, FLASHES_KEY)?.unwrap_or_default();
    if !flashes.is_empty() {
        session.remove(FLASHES_KEY);
    }
    Ok(flashes)
}

pub fn remember_page(session: &Session, url: &str) -> Result<()> {
    set(session, LAST_URL_KEY, url)
}

pub fn last_page(session: &Session) -> String {
    get::<String>(session, LAST_URL_KEY)
        .ok()
        .flatten()
        .unwrap_or_else(|| "/".to_string())
}

pub fn recommended_tracks(session: &Session) -> Result<Vec<String>> {
    Ok(get(session, RECOMMENDED_TRACKS_KEY)?.unwrap_or_default())
}

pub fn set_recommended_tracks(session: &Session, ids: Vec<String>) -> Result<()> {
    set(session, RECOMMENDED_TRACKS_KEY, ids)
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn flash_redirect(session: &Session, message: &str, location: &str) -> Result<HttpResponse> {
    flash(session, message)?;
    Ok(redirect(location))
}

/// The answer to any anonymous or non-owner request against a protected route.
pub fn deny(session: &Session) -> Result<HttpResponse> {
    flash_redirect(session, ACCESS_UNAUTHORIZED, "/")
}

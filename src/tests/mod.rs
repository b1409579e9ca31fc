use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::test::TestRequest;
use sqlx::SqlitePool;

use crate::models::favorited_track::{FavoritedTrack, NewFavoritedTrack};
use crate::models::melody::{Melody, NewMelody};
use crate::models::user::User;
use crate::models::user_favorited_track::UserFavoritedTrack;

/// Builds the full application around `$pool` with a fresh session key.
macro_rules! init_app {
    ($pool:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($pool.clone()))
                .wrap(actix_identity::IdentityMiddleware::default())
                .wrap(crate::utils::session::session_middleware(
                    actix_web::cookie::Key::generate(),
                    false,
                ))
                .configure(crate::handlers::init_routes),
        )
        .await
    };
}

/// Sends `$req` with the jar's cookies and keeps whatever cookies come back.
macro_rules! send {
    ($app:expr, $jar:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$app, $jar.request($req).to_request()).await;
        $jar.store(&resp);
        resp
    }};
}

mod track_handler_test;

pub async fn setup_db() -> SqlitePool {
    crate::db::connect("sqlite::memory:")
        .await
        .expect("Could not set up database")
}

/// Minimal browser-like cookie store for driving session-based routes.
#[derive(Default)]
pub struct CookieJar {
    cookies: Vec<Cookie<'static>>,
}

impl CookieJar {
    pub fn request(&self, req: TestRequest) -> TestRequest {
        self.cookies
            .iter()
            .fold(req, |req, cookie| req.cookie(cookie.clone()))
    }

    pub fn store<B>(&mut self, resp: &ServiceResponse<B>) {
        for cookie in resp.response().cookies() {
            let cookie = cookie.into_owned();
            self.cookies.retain(|c| c.name() != cookie.name());
            // A removal cookie comes back empty.
            if !cookie.value().is_empty() {
                self.cookies.push(cookie);
            }
        }
    }
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .expect("response is not a redirect")
        .to_str()
        .expect("location is not ascii")
        .to_string()
}

pub fn login_request(username: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/login")
        .set_form([("username", username), ("password", password)])
}

/// Two users, two tracks (one favorite each) and four melodies, one shared and one
/// hidden per user.
pub struct Fixture {
    pub mainuser: User,
    pub user1: User,
    pub track1: FavoritedTrack,
    pub track2: FavoritedTrack,
    pub mel1: Melody,
    pub mel2: Melody,
    pub mel3: Melody,
    pub mel4: Melody,
}

pub async fn seed(pool: &SqlitePool) -> Fixture {
    let mainuser = User::signup(pool, "mainuser", "testing").await.unwrap();
    let user1 = User::signup(pool, "testuser1", "testing").await.unwrap();

    let track = |n: u32, spotify_track_id: &str| NewFavoritedTrack {
        track_name: Some(format!("trackName{}", n)),
        artist_name: Some(format!("artistName{}", n)),
        album_name: Some(format!("albumName{}", n)),
        track_photo: Some(format!("photo{}.png", n)),
        spotify_track_id: Some(spotify_track_id.to_string()),
    };
    let track1 = FavoritedTrack::create(pool, track(1, "12345")).await.unwrap();
    let track2 = FavoritedTrack::create(pool, track(2, "123456")).await.unwrap();
    UserFavoritedTrack::add(pool, mainuser.id, track1.id).await.unwrap();
    UserFavoritedTrack::add(pool, user1.id, track2.id).await.unwrap();

    let melody = |user_id: i64, name: &str, visibility: bool| NewMelody {
        user_id: Some(user_id),
        name: Some(name.to_string()),
        timestamp: Some("1/18/22 10:40".to_string()),
        music_notes: Some("sample notes".to_string()),
        visibility: Some(visibility),
    };
    let mel1 = Melody::create(pool, melody(mainuser.id, "test1", true)).await.unwrap();
    let mel2 = Melody::create(pool, melody(mainuser.id, "test2", false)).await.unwrap();
    let mel3 = Melody::create(pool, melody(user1.id, "test3", true)).await.unwrap();
    let mel4 = Melody::create(pool, melody(user1.id, "test4", false)).await.unwrap();

    Fixture {
        mainuser,
        user1,
        track1,
        track2,
        mel1,
        mel2,
        mel3,
        mel4,
    }
}

/// Names of the melodies listed under `key` in a JSON page.
pub fn melody_names(page: &serde_json::Value, key: &str) -> Vec<String> {
    page[key]
        .as_array()
        .expect("page has no melody list")
        .iter()
        .map(|melody| melody["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

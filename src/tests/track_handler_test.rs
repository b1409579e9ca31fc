#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};

    use crate::models::favorited_track::{FavoritedTrack, NewFavoritedTrack, NOT_AVAILABLE};
    use crate::models::user::User;
    use crate::models::user_favorited_track::UserFavoritedTrack;
    use crate::tests::{location, login_request, seed, setup_db, CookieJar};
    use crate::utils::session::ACCESS_UNAUTHORIZED;

    #[actix_rt::test]
    async fn test_search_form() {
        let pool = setup_db().await;
        seed(&pool).await;
        let app = init_app!(pool);
        let mut jar = CookieJar::default();

        send!(app, jar, login_request("mainuser", "testing"));
        let resp = send!(app, jar, TestRequest::get().uri("/search-tracks?q=trackname"));
        assert_eq!(resp.status(), StatusCode::OK);

        let page: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(page["can_favorite"], true);
        let tracks = page["tracks"].as_array().unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0]["spotify_track_id"], "12345");
        assert_eq!(tracks[0]["favorited"], true);
        assert_eq!(tracks[1]["favorited"], false);
    }

    #[actix_rt::test]
    async fn test_search_form_logged_out() {
        let pool = setup_db().await;
        seed(&pool).await;
        let app = init_app!(pool);
        let mut jar = CookieJar::default();

        let resp = send!(app, jar, TestRequest::get().uri("/search-tracks?q=trackName1"));
        assert_eq!(resp.status(), StatusCode::OK);

        let page: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(page["can_favorite"], false);
        let tracks = page["tracks"].as_array().unwrap();
        assert_eq!(tracks.len(), 1);
        assert!(tracks[0].get("favorited").is_none());
    }

    #[actix_rt::test]
    async fn test_empty_search() {
        let pool = setup_db().await;
        seed(&pool).await;
        let app = init_app!(pool);
        let mut jar = CookieJar::default();

        let resp = send!(app, jar, TestRequest::get().uri("/search-tracks"));
        assert_eq!(resp.status(), StatusCode::OK);

        let page: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(page["tracks"], serde_json::json!([]));
    }

    #[actix_rt::test]
    async fn test_spotify_player() {
        let pool = setup_db().await;
        seed(&pool).await;
        let app = init_app!(pool);
        let mut jar = CookieJar::default();

        send!(app, jar, login_request("mainuser", "testing"));

        let resp = send!(app, jar, TestRequest::get().uri("/jam/6tHtqQ2VYGqgcjh5TAMunF"));
        assert_eq!(resp.status(), StatusCode::OK);
        let page: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(page["can_favorite"], true);
        assert_eq!(page["is_favorite"], false);
        assert!(page["track"].is_null());
        assert_eq!(page["recommended_tracks"], serde_json::json!([]));

        let resp = send!(app, jar, TestRequest::get().uri("/jam/12345"));
        let page: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(page["is_favorite"], true);
        assert_eq!(page["track"]["track_name"], "trackName1");
    }

    #[actix_rt::test]
    async fn test_spotify_player_logged_out() {
        let pool = setup_db().await;
        seed(&pool).await;
        let app = init_app!(pool);
        let mut jar = CookieJar::default();

        let resp = send!(app, jar, TestRequest::get().uri("/jam/6tHtqQ2VYGqgcjh5TAMunF"));
        assert_eq!(resp.status(), StatusCode::OK);

        let page: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(page["can_favorite"], false);
        assert!(page.get("is_favorite").is_none());
    }

    #[actix_rt::test]
    async fn test_favorite_track() {
        let pool = setup_db().await;
        let fixture = seed(&pool).await;
        let app = init_app!(pool);
        let mut jar = CookieJar::default();

        send!(app, jar, login_request("mainuser", "testing"));
        send!(app, jar, TestRequest::get().uri("/jam/6tHtqQ2VYGqgcjh5TAMunF"));

        let resp = send!(
            app,
            jar,
            TestRequest::post()
                .uri("/favorite-track")
                .set_form([("spotify_track_id", "6tHtqQ2VYGqgcjh5TAMunF"), ("track_name", "Jam")])
        );
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/jam/6tHtqQ2VYGqgcjh5TAMunF");

        let track = FavoritedTrack::find_by_spotify_id(&pool, "6tHtqQ2VYGqgcjh5TAMunF")
            .await
            .unwrap()
            .expect("track was not recorded");
        assert_eq!(track.track_name, "Jam");
        assert_eq!(track.artist_name, NOT_AVAILABLE);
        assert!(UserFavoritedTrack::exists(&pool, fixture.mainuser.id, track.id).await.unwrap());

        let resp = send!(app, jar, TestRequest::get().uri("/jam/6tHtqQ2VYGqgcjh5TAMunF"));
        let page: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(page["is_favorite"], true);

        // A second toggle unfavorites but keeps the track on record.
        send!(
            app,
            jar,
            TestRequest::post()
                .uri("/favorite-track")
                .set_form([("spotify_track_id", "6tHtqQ2VYGqgcjh5TAMunF")])
        );
        assert!(!UserFavoritedTrack::exists(&pool, fixture.mainuser.id, track.id).await.unwrap());
        assert!(FavoritedTrack::find(&pool, track.id).await.unwrap().is_some());
    }

    #[actix_rt::test]
    async fn test_favorite_track_logged_out() {
        let pool = setup_db().await;
        seed(&pool).await;
        let app = init_app!(pool);
        let mut jar = CookieJar::default();

        let resp = send!(
            app,
            jar,
            TestRequest::post()
                .uri("/favorite-track")
                .set_form([("spotify_track_id", "6tHtqQ2VYGqgcjh5TAMunF")])
        );
        assert_eq!(location(&resp), "/");

        let resp = send!(app, jar, TestRequest::get().uri("/"));
        let page: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(page["messages"][0], ACCESS_UNAUTHORIZED);
        assert!(FavoritedTrack::find_by_spotify_id(&pool, "6tHtqQ2VYGqgcjh5TAMunF")
            .await
            .unwrap()
            .is_none());
    }

    #[actix_rt::test]
    async fn test_login_with_many_favorites() {
        let pool = setup_db().await;
        let fan = User::signup(&pool, "fan", "testing").await.unwrap();
        for n in 0..300 {
            let track = FavoritedTrack::create(
                &pool,
                NewFavoritedTrack {
                    track_name: Some(format!("Anthem {}", n)),
                    ..NewFavoritedTrack::new(&format!("{:0>22}", n))
                },
            )
            .await
            .unwrap();
            UserFavoritedTrack::add(&pool, fan.id, track.id).await.unwrap();
        }
        let app = init_app!(pool);
        let mut jar = CookieJar::default();

        let resp = send!(app, jar, login_request("fan", "testing"));
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/");

        let resp = send!(app, jar, TestRequest::get().uri("/search-tracks?q=anthem%2029"));
        assert_eq!(resp.status(), StatusCode::OK);
        let page: serde_json::Value = test::read_body_json(resp).await;
        let tracks = page["tracks"].as_array().unwrap();
        assert_eq!(tracks.len(), 11);
        assert!(tracks.iter().all(|track| track["favorited"] == true));

        let spotify_track_id = format!("{:0>22}", 299);
        let resp = send!(app, jar, TestRequest::get().uri(&format!("/jam/{}", spotify_track_id)));
        assert_eq!(resp.status(), StatusCode::OK);
        let page: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(page["is_favorite"], true);

        let resp = send!(
            app,
            jar,
            TestRequest::post()
                .uri("/favorite-track")
                .set_form([("spotify_track_id", spotify_track_id.as_str())])
        );
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(UserFavoritedTrack::count(&pool).await.unwrap(), 299);
    }
}

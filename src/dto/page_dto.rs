use serde::Serialize;

use crate::models::favorited_track::FavoritedTrack;
use crate::models::melody::{Melody, SharedMelody};

#[derive(Serialize, Debug)]
pub struct FeedMelodyDTO {
    #[serde(flatten)]
    pub shared: SharedMelody,
    /// Visibility controls are offered only to the author.
    pub editable: bool,
}

#[derive(Serialize, Debug)]
pub struct HomePageDTO {
    pub title: &'static str,
    pub current_user: Option<i64>,
    pub messages: Vec<String>,
    pub melodies: Vec<FeedMelodyDTO>,
}

#[derive(Serialize, Debug)]
pub struct ProfilePageDTO {
    pub user_id: i64,
    pub username: String,
    pub messages: Vec<String>,
    pub melodies: Vec<Melody>,
    pub favorited_tracks: Vec<FavoritedTrack>,
}

#[derive(Serialize, Debug)]
pub struct TrackResultDTO {
    #[serde(flatten)]
    pub track: FavoritedTrack,
    /// Only present for logged in callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorited: Option<bool>,
}

#[derive(Serialize, Debug)]
pub struct SearchPageDTO {
    pub query: String,
    pub can_favorite: bool,
    pub messages: Vec<String>,
    pub tracks: Vec<TrackResultDTO>,
}

#[derive(Serialize, Debug)]
pub struct JamPageDTO {
    pub spotify_track_id: String,
    pub track: Option<FavoritedTrack>,
    pub can_favorite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    pub recommended_tracks: Vec<String>,
    pub messages: Vec<String>,
}

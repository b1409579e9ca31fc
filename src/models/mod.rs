pub mod credentials;
pub mod edit_profile_credentials;
pub mod favorited_track;
pub mod melody;
pub mod user;
pub mod user_favorited_track;

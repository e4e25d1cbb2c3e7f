//! HTTP API handlers for mixboard-ui

pub mod health;
pub mod playlists;
pub mod recommendations;
pub mod search;
pub mod ui;
pub mod users;

pub use health::health_check;
pub use playlists::{
    add_track, create_playlist, delete_playlist, get_playlist_detail, list_playlists,
    remove_track,
};
pub use recommendations::{artist_recommendations, mood_recommendations, search_recommendations};
pub use search::search_music;
pub use ui::{serve_app_js, serve_index, serve_style_css};
pub use users::{get_user_profile, login_user, register_user};

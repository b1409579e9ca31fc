pub mod melody_handler;
pub mod track_handler;
pub mod user_handler;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(melody_handler::init_routes)
        .configure(track_handler::init_routes)
        .configure(user_handler::init_routes);
}

mod get_recipients;
mod grant_recipient;
mod revoke_recipient;

use actix_web::web;
use get_recipients::get_recipients_controller;
use grant_recipient::grant_recipient_controller;
use revoke_recipient::revoke_recipient_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/recipients", web::get().to(get_recipients_controller));
    cfg.route(
        "/recipients/{recipient_id}",
        web::post().to(grant_recipient_controller),
    );
    cfg.route(
        "/recipients/{recipient_id}",
        web::delete().to(revoke_recipient_controller),
    );
}

use actix_web::web;

use crate::handlers::shifts;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/worker/{worker_id}")
            .route("/available", web::get().to(shifts::get_available_shifts))
            .route("/assigned", web::get().to(shifts::get_assigned_shifts))
            .route("/requests", web::get().to(shifts::get_requested_shifts)),
    )
    .route(
        "/shift/{shift_id}/request/{worker_id}",
        web::post().to(shifts::request_shift),
    );
}

use actix_web::web;

use crate::handlers::admin;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/shift", web::post().to(admin::create_shift))
            .route("/shift/{id}", web::get().to(admin::get_shift))
            .route("/shift/{id}", web::put().to(admin::update_shift))
            .route("/shift/{id}", web::delete().to(admin::delete_shift))
            .route(
                "/shift/{shift_id}/approve/{worker_id}",
                web::put().to(admin::approve_shift_request),
            )
            .route(
                "/shift/{shift_id}/reject/{worker_id}",
                web::put().to(admin::reject_shift_request),
            )
            .route("/shifts", web::get().to(admin::list_shifts))
            .route("/shifts/day", web::get().to(admin::get_shifts_by_day))
            .route("/shift-requests", web::get().to(admin::get_shift_requests))
            .route(
                "/workers/{worker_id}/limits",
                web::get().to(admin::get_worker_limits),
            ),
    );
}

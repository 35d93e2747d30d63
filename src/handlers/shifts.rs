use actix_web::{HttpRequest, HttpResponse, web};

use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::middleware::RequestIdExt;
use crate::services::ShiftEngine;

// Worker-facing handlers

pub async fn get_available_shifts(
    engine: web::Data<ShiftEngine>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let shifts = engine.get_available_shifts(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(shifts)))
}

pub async fn get_assigned_shifts(
    engine: web::Data<ShiftEngine>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let shifts = engine.get_assigned_shifts(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(shifts)))
}

pub async fn get_requested_shifts(
    engine: web::Data<ShiftEngine>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let shifts = engine.get_all_requested_shifts(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(shifts)))
}

pub async fn request_shift(
    engine: web::Data<ShiftEngine>,
    path: web::Path<(i64, i64)>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let (shift_id, worker_id) = path.into_inner();
    log::debug!(
        "[{}] Worker {} requesting shift {}",
        req.correlation_id().unwrap_or_default(),
        worker_id,
        shift_id
    );
    let claim = engine.request_shift(shift_id, worker_id).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        Some(claim),
        "Shift requested",
    )))
}

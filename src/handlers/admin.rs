use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::database::models::{ShiftInput, ShiftListQuery, WorkerShiftDetailQuery};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::ShiftEngine;

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DecisionQuery {
    pub approved_by: Option<i64>,
}

// Shift administration

pub async fn create_shift(
    engine: web::Data<ShiftEngine>,
    input: web::Json<ShiftInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    if input.end_time <= input.start_time {
        return Err(AppError::BadRequest(
            "end_time must be after start_time".to_string(),
        ));
    }

    let shift = engine.create_shift(input).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(shift)))
}

pub async fn get_shift(
    engine: web::Data<ShiftEngine>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let shift = engine.get_shift(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(shift)))
}

pub async fn update_shift(
    engine: web::Data<ShiftEngine>,
    path: web::Path<i64>,
    input: web::Json<ShiftInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    if input.end_time <= input.start_time {
        return Err(AppError::BadRequest(
            "end_time must be after start_time".to_string(),
        ));
    }

    let shift = engine.update_shift(path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(shift)))
}

pub async fn delete_shift(
    engine: web::Data<ShiftEngine>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    engine.delete_shift(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Shift deleted",
    )))
}

pub async fn list_shifts(
    engine: web::Data<ShiftEngine>,
    query: web::Query<ShiftListQuery>,
) -> Result<HttpResponse, AppError> {
    let shifts = engine.list_shifts(&query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(shifts)))
}

pub async fn get_shifts_by_day(
    engine: web::Data<ShiftEngine>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, AppError> {
    let shifts = engine.get_shifts_by_day(&query.date).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(shifts)))
}

// Claim decisions

pub async fn get_shift_requests(
    engine: web::Data<ShiftEngine>,
    query: web::Query<WorkerShiftDetailQuery>,
) -> Result<HttpResponse, AppError> {
    let requests = engine.get_all_shift_requests(&query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(requests)))
}

pub async fn approve_shift_request(
    engine: web::Data<ShiftEngine>,
    path: web::Path<(i64, i64)>,
    query: web::Query<DecisionQuery>,
) -> Result<HttpResponse, AppError> {
    let (shift_id, worker_id) = path.into_inner();
    let outcome = engine
        .approve_shift_request(shift_id, worker_id, query.approved_by)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(outcome)))
}

pub async fn reject_shift_request(
    engine: web::Data<ShiftEngine>,
    path: web::Path<(i64, i64)>,
    query: web::Query<DecisionQuery>,
) -> Result<HttpResponse, AppError> {
    let (shift_id, worker_id) = path.into_inner();
    let rejected = engine
        .reject_shift_request(shift_id, worker_id, query.approved_by)
        .await?;

    let response = match rejected {
        Some(claim) => ApiResponse::success_with_message(Some(claim), "Request rejected"),
        None => ApiResponse::success_with_message(None, "No request to reject"),
    };
    Ok(HttpResponse::Ok().json(response))
}

pub async fn get_worker_limits(
    engine: web::Data<ShiftEngine>,
    path: web::Path<i64>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, AppError> {
    let quota = engine.check_limits(path.into_inner(), &query.date).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(quota)))
}

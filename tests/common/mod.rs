#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{App, web};
use chrono::{NaiveDate, NaiveTime};
use fake::Fake;
use fake::faker::address::en::CityName;
use fake::faker::job::en::Title;

use roster::database::models::{Shift, ShiftInput};
use roster::database::repositories::MemoryStore;
use roster::middleware::RequestIdMiddleware;
use roster::{ShiftEngine, routes};

pub fn setup_test_env() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Engine over a fresh in-memory store, plus the store handle for inspection.
pub fn memory_engine() -> (ShiftEngine, MemoryStore) {
    setup_test_env();
    let store = MemoryStore::new();
    let engine = ShiftEngine::new(Arc::new(store.clone()), Arc::new(store.clone()));
    (engine, store)
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub fn time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M").unwrap()
}

/// Open shift with a generated role and location.
pub fn shift_on(day: &str, start: &str, end: &str) -> ShiftInput {
    ShiftInput {
        date: date(day),
        start_time: time(start),
        end_time: time(end),
        role_assignment: Title().fake(),
        location: CityName().fake(),
        is_available: true,
    }
}

pub async fn create_shift(engine: &ShiftEngine, day: &str, start: &str, end: &str) -> Shift {
    engine.create_shift(shift_on(day, start, end)).await.unwrap()
}

/// Request and immediately approve a shift for a worker.
pub async fn assign(engine: &ShiftEngine, shift_id: i64, worker_id: i64) {
    engine.request_shift(shift_id, worker_id).await.unwrap();
    engine
        .approve_shift_request(shift_id, worker_id, Some(1000))
        .await
        .unwrap();
}

/// Actix app wired the same way as the server, over the given engine.
pub fn create_app(
    engine: ShiftEngine,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(engine))
        .wrap(RequestIdMiddleware)
        .configure(routes::configure)
}

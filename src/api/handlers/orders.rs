use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::api::AppState;
use crate::models::OrderStatus;
use crate::storage::open_store;

/// GET /orders?status=PENDING|SHIPPED
pub async fn orders_list_handler(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let status = match query.get("status").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(s) => match OrderStatus::parse(s) {
            Some(st) => Some(st),
            None => return HttpResponse::BadRequest().json(json!({"error": "status debe ser PENDING o SHIPPED"})),
        },
        None => None,
    };

    let db = state.config.db.clone();
    let res = tokio::task::spawn_blocking(move || {
        let mut store = open_store(&db)?;
        store.list_orders(status)
    })
    .await;

    match res {
        Ok(Ok(orders)) => HttpResponse::Ok().json(json!({"count": orders.len(), "orders": orders})),
        Ok(Err(e)) => HttpResponse::InternalServerError().json(json!({"error": format!("failed to list orders: {}", e)})),
        Err(e) => HttpResponse::InternalServerError().json(json!({"error": format!("task join error: {}", e)})),
    }
}

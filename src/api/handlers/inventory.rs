use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::info;

use crate::api::handlers::upload_error_response;
use crate::api::{read_upload, AppState};
use crate::excel::{extension_valida, import_inventory};
use crate::storage::open_store;

/// POST /inventory/import
/// Lee la planilla de bodega (con detección de encabezados) y hace upsert por código.
pub async fn inventory_import_handler(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    let upload = match read_upload(payload, state.config.max_upload_bytes).await {
        Ok(u) => u,
        Err(e) => return upload_error_response(e),
    };
    if !extension_valida(&upload.filename) {
        return HttpResponse::BadRequest()
            .json(json!({"error": "solo se aceptan archivos .xlsx o .xls", "file": upload.filename}));
    }

    let permit = match state.import_slots.clone().acquire_owned().await {
        Ok(p) => p,
        Err(_) => return HttpResponse::InternalServerError().json(json!({"error": "failed to acquire semaphore"})),
    };

    let file = upload.filename.clone();
    let bytes = upload.bytes;
    let parsed = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        import_inventory(&bytes)
    });
    let items = match parsed.await {
        Ok(Ok(items)) => items,
        Ok(Err(e)) => return HttpResponse::UnprocessableEntity().json(json!({"error": e.to_string(), "file": file})),
        Err(e) => return HttpResponse::InternalServerError().json(json!({"error": format!("task join error: {}", e)})),
    };

    let db = state.config.db.clone();
    let total = items.len();
    let res = tokio::task::spawn_blocking(move || {
        let mut store = open_store(&db)?;
        store.upsert_inventory(&items)
    })
    .await;

    match res {
        Ok(Ok(n)) => {
            info!(file = %file, items = total, "inventario guardado");
            HttpResponse::Ok().json(json!({"status": "ok", "file": file, "items": total, "items_upserted": n}))
        }
        Ok(Err(e)) => HttpResponse::InternalServerError().json(json!({"error": format!("failed to store inventory: {}", e)})),
        Err(e) => HttpResponse::InternalServerError().json(json!({"error": format!("task join error: {}", e)})),
    }
}

/// GET /inventory
pub async fn inventory_list_handler(state: web::Data<AppState>) -> impl Responder {
    let db = state.config.db.clone();
    let res = tokio::task::spawn_blocking(move || {
        let mut store = open_store(&db)?;
        store.list_inventory()
    })
    .await;

    match res {
        Ok(Ok(items)) => HttpResponse::Ok().json(json!({"count": items.len(), "items": items})),
        Ok(Err(e)) => HttpResponse::InternalServerError().json(json!({"error": format!("failed to list inventory: {}", e)})),
        Err(e) => HttpResponse::InternalServerError().json(json!({"error": format!("task join error: {}", e)})),
    }
}

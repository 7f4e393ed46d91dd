use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

use crate::api::handlers::upload_error_response;
use crate::api::{read_upload, AppState};
use crate::excel::{extension_valida, import_plan, ImportError};
use crate::models::{ImportOptions, ImportReport};
use crate::storage::open_store;

/// Resultado de correr la importación fuera del runtime async.
enum PlanOutcome {
    Parsed(ImportReport),
    Rejected(ImportError),
}

/// Recibe el archivo, valida la extensión y corre el parser en un hilo
/// bloqueante. Devuelve la respuesta de error lista si algo falla antes.
async fn parse_uploaded_plan(
    state: &web::Data<AppState>,
    query: &HashMap<String, String>,
    payload: Multipart,
) -> Result<(String, PlanOutcome), HttpResponse> {
    let upload = read_upload(payload, state.config.max_upload_bytes).await.map_err(upload_error_response)?;

    if !extension_valida(&upload.filename) {
        return Err(HttpResponse::BadRequest()
            .json(json!({"error": "solo se aceptan archivos .xlsx o .xls", "file": upload.filename})));
    }

    let default_client = query
        .get("client")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| state.config.default_client.clone());
    let mut opts = ImportOptions::new(&default_client, Utc::now());
    opts.default_carrier = state.config.default_carrier.clone();

    let permit = match state.import_slots.clone().acquire_owned().await {
        Ok(p) => p,
        Err(_) => return Err(HttpResponse::InternalServerError().json(json!({"error": "failed to acquire semaphore"}))),
    };

    let filename = upload.filename.clone();
    let bytes = upload.bytes;
    info!(file = %filename, bytes = bytes.len(), "importando plan de producción");

    let blocking = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        import_plan(&bytes, &opts)
    });

    match blocking.await {
        Ok(Ok(report)) => Ok((filename, PlanOutcome::Parsed(report))),
        Ok(Err(e)) => Ok((filename, PlanOutcome::Rejected(e))),
        Err(e) => Err(HttpResponse::InternalServerError().json(json!({"error": format!("task join error: {}", e)}))),
    }
}

/// POST /plan/preview?client=...
/// Parsea el plan y devuelve los pedidos sin guardarlos.
pub async fn plan_preview_handler(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
    payload: Multipart,
) -> impl Responder {
    match parse_uploaded_plan(&state, &query, payload).await {
        Ok((file, PlanOutcome::Parsed(report))) => HttpResponse::Ok().json(json!({
            "file": file,
            "sheet": report.sheet,
            "historical_rows": report.historical_rows,
            "working_rows": report.working_rows,
            "color_overrides": report.color_overrides,
            "yellow_rows": report.yellow_rows,
            "orders": report.orders,
        })),
        Ok((file, PlanOutcome::Rejected(e))) => {
            HttpResponse::UnprocessableEntity().json(json!({"error": e.to_string(), "file": file}))
        }
        Err(resp) => resp,
    }
}

/// POST /plan/import?client=...
/// Parsea el plan y hace upsert de los pedidos por número de orden.
pub async fn plan_import_handler(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
    payload: Multipart,
) -> impl Responder {
    let (file, report) = match parse_uploaded_plan(&state, &query, payload).await {
        Ok((file, PlanOutcome::Parsed(report))) => (file, report),
        Ok((file, PlanOutcome::Rejected(e))) => {
            return HttpResponse::UnprocessableEntity().json(json!({"error": e.to_string(), "file": file}));
        }
        Err(resp) => return resp,
    };

    let db = state.config.db.clone();
    let orders = report.orders;
    let total = orders.len();
    let written = tokio::task::spawn_blocking(move || {
        let mut store = open_store(&db)?;
        store.upsert_orders(&orders)
    })
    .await;

    match written {
        Ok(Ok(n)) => {
            info!(file = %file, pedidos = total, escritos = n, "plan guardado");
            HttpResponse::Ok().json(json!({
                "status": "ok",
                "file": file,
                "sheet": report.sheet,
                "orders": total,
                "orders_upserted": n,
                "historical_rows": report.historical_rows,
                "working_rows": report.working_rows,
                "color_overrides": report.color_overrides,
                "yellow_rows": report.yellow_rows,
            }))
        }
        Ok(Err(e)) => {
            error!(file = %file, error = %e, "falló el upsert de pedidos");
            HttpResponse::InternalServerError().json(json!({"error": format!("failed to store orders: {}", e)}))
        }
        Err(e) => HttpResponse::InternalServerError().json(json!({"error": format!("task join error: {}", e)})),
    }
}

pub mod health;
pub mod inventory;
pub mod orders;
pub mod plan;

pub use health::*;
pub use inventory::*;
pub use orders::*;
pub use plan::*;

use actix_web::HttpResponse;
use serde_json::json;

use crate::api::UploadError;

/// Respuesta de error para fallas al recibir el archivo.
pub(crate) fn upload_error_response(e: UploadError) -> HttpResponse {
    match e {
        UploadError::TooLarge(_) => HttpResponse::PayloadTooLarge().json(json!({"error": e.to_string()})),
        _ => HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
    }
}

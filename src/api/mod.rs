//! Capa HTTP: estado compartido, lectura de archivos subidos y handlers.

use std::sync::Arc;

use actix_multipart::Multipart;
use futures_util::stream::StreamExt;
use tokio::sync::Semaphore;
use tracing::warn;

use crate::config::Config;

pub mod handlers;

/// Estado compartido entre workers.
pub struct AppState {
    pub config: Config,
    /// Limita cuántas importaciones pesadas corren a la vez
    pub import_slots: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState { config, import_slots: Arc::new(Semaphore::new(std::cmp::max(1, num_cpus::get()))) }
    }
}

/// Archivo recibido por multipart.
#[derive(Debug)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no se recibió ningún archivo")]
    Missing,
    #[error("el archivo supera el máximo de {0} bytes")]
    TooLarge(usize),
    #[error("error leyendo el multipart: {0}")]
    Multipart(String),
}

/// Lee el primer campo con archivo del multipart (preferentemente `file`).
pub async fn read_upload(mut payload: Multipart, max_bytes: usize) -> Result<Upload, UploadError> {
    while let Some(field_res) = payload.next().await {
        let mut field = field_res.map_err(|e| UploadError::Multipart(e.to_string()))?;

        let filename = match field.content_disposition().get_filename() {
            Some(f) => f.to_string(),
            None => {
                // campos de texto sueltos: se consumen y se ignoran
                while let Some(chunk) = field.next().await {
                    if let Err(e) = chunk {
                        warn!(error = %e, "campo multipart ilegible");
                        break;
                    }
                }
                continue;
            }
        };

        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| UploadError::Multipart(e.to_string()))?;
            if bytes.len() + chunk.len() > max_bytes {
                return Err(UploadError::TooLarge(max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(Upload { filename, bytes });
    }
    Err(UploadError::Missing)
}

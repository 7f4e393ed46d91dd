//! Módulo `excel` dividido en submódulos para mantener el código organizado.
//!
//! Submódulos:
//! - `io`: apertura de libros desde bytes, conversión de celdas y rellenos
//! - `colores`: clasificación de colores de relleno (verde / amarillo)
//! - `clasificador`: estado de una fila por texto y por color
//! - `plan`: importación del plan de producción a pedidos
//! - `inventario`: importación de la planilla de bodega

/// Helpers de IO y utilidades para parsing de Excel
mod io;

pub mod colores;

pub mod clasificador;

/// Plan de producción: `import_plan`
pub mod plan;

/// Inventario de bodega: `import_inventory`
pub mod inventario;

pub use clasificador::{classify_by_date_pattern, classify_row, override_by_fill_color};
pub use colores::{clasificar_color, es_amarillo, es_verde, ColorRelleno};
pub use inventario::import_inventory;
pub use io::{cell_to_string, FillMap};
pub use plan::{import_plan, parse_plan, parse_plan_sheet, select_sheet, PlanSheet};

/// Transportadora asignada cuando la fila no trae una
pub const DEFAULT_CARRIER: &str = "POR ASIGNAR";

/// Extensiones aceptadas al subir un archivo
pub const EXTENSIONES_VALIDAS: &[&str] = &["xlsx", "xls"];

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("no se pudo abrir el archivo como planilla: {0}")]
    Workbook(#[source] calamine::Error),
    #[error("el libro no contiene hojas")]
    NoSheets,
    #[error("no se encontró una fila de encabezados de inventario")]
    HeaderNotFound,
}

/// Indica si el nombre de archivo tiene una extensión de planilla aceptada.
pub fn extension_valida(filename: &str) -> bool {
    std::path::Path::new(filename)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(|e| EXTENSIONES_VALIDAS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

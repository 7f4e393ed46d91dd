//! Lectura de la planilla de inventario de bodega.
//!
//! A diferencia del plan de producción, esta planilla no tiene columnas fijas:
//! se busca la fila de encabezados en las primeras filas de cada hoja y las
//! columnas se ubican por nombre.

use calamine::{Data, Range};
use tracing::{debug, info};

use crate::excel::io::{cell_text, last_row, normalize_header, open_workbook_bytes, read_all_sheets};
use crate::excel::ImportError;
use crate::models::InventoryItem;

/// Filas revisadas buscando encabezados
pub const FILAS_BUSQUEDA_ENCABEZADO: u32 = 20;
pub const UNIDAD_POR_DEFECTO: &str = "UND";

const CLAVES_CODIGO: &[&str] = &["codigo", "cod", "referencia", "ref", "sku", "item"];
const CLAVES_DESCRIPCION: &[&str] = &["descripcion", "material", "nombre", "producto", "insumo"];
const CLAVES_CANTIDAD: &[&str] = &["cantidad", "cant", "stock", "existencia", "saldo"];
const CLAVES_UNIDAD: &[&str] = &["unidad", "und", "um", "unidadmedida"];
const CLAVES_UBICACION: &[&str] = &["ubicacion", "bodega", "estante"];

const UMBRAL_SIMILITUD: f64 = 0.92;

/// Columnas (1-based) ubicadas en la fila de encabezados.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryHeader {
    pub row: u32,
    pub code: u32,
    pub description: Option<u32>,
    pub quantity: u32,
    pub unit: Option<u32>,
    pub location: Option<u32>,
}

fn coincide(encabezado: &str, claves: &[&str]) -> bool {
    if encabezado.is_empty() {
        return false;
    }
    claves.iter().any(|k| {
        encabezado == *k
            || (k.len() > 3 && encabezado.starts_with(k))
            || strsim::jaro_winkler(encabezado, k) >= UMBRAL_SIMILITUD
    })
}

/// Busca la fila de encabezados. Exige al menos código y cantidad.
pub fn detect_header(values: &Range<Data>) -> Option<InventoryHeader> {
    let fin = last_row(values).min(FILAS_BUSQUEDA_ENCABEZADO);
    let ancho = values.width() as u32 + values.start().map(|(_, c)| c).unwrap_or(0);

    for row in 1..=fin {
        let mut code = None;
        let mut description = None;
        let mut quantity = None;
        let mut unit = None;
        let mut location = None;

        for col in 1..=ancho {
            let h = normalize_header(&cell_text(values, row, col));
            // el orden importa: "cod" también es prefijo de otras palabras
            if quantity.is_none() && coincide(&h, CLAVES_CANTIDAD) {
                quantity = Some(col);
            } else if unit.is_none() && coincide(&h, CLAVES_UNIDAD) {
                unit = Some(col);
            } else if code.is_none() && coincide(&h, CLAVES_CODIGO) {
                code = Some(col);
            } else if description.is_none() && coincide(&h, CLAVES_DESCRIPCION) {
                description = Some(col);
            } else if location.is_none() && coincide(&h, CLAVES_UBICACION) {
                location = Some(col);
            }
        }

        if let (Some(code), Some(quantity)) = (code, quantity) {
            debug!(fila = row, "encabezado de inventario encontrado");
            return Some(InventoryHeader { row, code, description, quantity, unit, location });
        }
    }
    None
}

/// Interpreta cantidades como "1.234,5", "12,5" o "40".
pub fn parse_quantity(s: &str) -> f64 {
    let limpio: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if limpio.is_empty() {
        return 0.0;
    }
    let normalizado = if limpio.contains(',') && limpio.contains('.') {
        limpio.replace('.', "").replace(',', ".")
    } else {
        limpio.replace(',', ".")
    };
    normalizado.parse::<f64>().unwrap_or(0.0)
}

fn opcional(values: &Range<Data>, row: u32, col: Option<u32>) -> String {
    col.map(|c| cell_text(values, row, c)).unwrap_or_default()
}

/// Lee los ítems de una hoja a partir de su encabezado.
pub fn read_inventory_sheet(values: &Range<Data>, header: &InventoryHeader) -> Vec<InventoryItem> {
    let fin = last_row(values);
    let mut items = Vec::new();
    for row in (header.row + 1)..=fin {
        let code = cell_text(values, row, header.code);
        if code.is_empty() {
            continue;
        }
        let unit = opcional(values, row, header.unit);
        let location = opcional(values, row, header.location);
        items.push(InventoryItem {
            code,
            description: opcional(values, row, header.description),
            quantity: parse_quantity(&cell_text(values, row, header.quantity)),
            unit: if unit.is_empty() { UNIDAD_POR_DEFECTO.to_string() } else { unit.to_uppercase() },
            location: if location.is_empty() { None } else { Some(location) },
        });
    }
    items
}

/// Importa el inventario usando la primera hoja con encabezados reconocibles.
pub fn import_inventory(bytes: &[u8]) -> Result<Vec<InventoryItem>, ImportError> {
    let mut workbook = open_workbook_bytes(bytes)?;
    let sheets = read_all_sheets(&mut workbook);
    for (name, values) in sheets.iter() {
        if let Some(header) = detect_header(values) {
            let items = read_inventory_sheet(values, &header);
            info!(sheet = %name, items = items.len(), "inventario importado");
            return Ok(items);
        }
    }
    Err(ImportError::HeaderNotFound)
}

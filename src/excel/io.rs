use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use tracing::{debug, warn};

use crate::excel::ImportError;

/// Libro abierto desde los bytes subidos.
pub type PlanWorkbook = Sheets<Cursor<Vec<u8>>>;

/// Convierte un `Data` de calamine al texto que vería el usuario en la celda.
/// Las celdas que no se pueden representar quedan como cadena vacía.
pub fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if (f.floor() - f).abs() < f64::EPSILON && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => if *b { "TRUE".to_string() } else { "FALSE".to_string() },
        Data::Empty => String::new(),
        Data::Error(_) => String::new(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => ndt.format("%d/%m/%Y").to_string(),
            None => String::new(),
        },
        Data::DateTimeIso(s) => s.trim().to_string(),
        Data::DurationIso(s) => s.trim().to_string(),
    }
}

/// Texto de una celda usando coordenadas 1-based (fila, columna).
pub fn cell_text(range: &Range<Data>, row: u32, col: u32) -> String {
    if row == 0 || col == 0 {
        return String::new();
    }
    match range.get_value((row - 1, col - 1)) {
        Some(d) => cell_to_string(d),
        None => String::new(),
    }
}

/// Última fila (1-based) con datos en el rango, 0 si está vacío.
pub fn last_row(range: &Range<Data>) -> u32 {
    match range.end() {
        Some((r, _)) if !range.is_empty() => r + 1,
        _ => 0,
    }
}

/// Normaliza encabezados eliminando espacios y pasando a minúsculas.
pub fn normalize_header(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != '_')
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Abre el libro a partir de los bytes subidos (xlsx o xls).
/// Es el único punto donde una importación puede fallar por completo.
pub fn open_workbook_bytes(bytes: &[u8]) -> Result<PlanWorkbook, ImportError> {
    let cursor = Cursor::new(bytes.to_vec());
    open_workbook_auto_from_rs(cursor).map_err(ImportError::Workbook)
}

/// Lee todas las hojas del libro como rangos de calamine, en el orden del libro.
/// Una hoja que no se puede leer se reemplaza por un rango vacío.
pub fn read_all_sheets(workbook: &mut PlanWorkbook) -> Vec<(String, Range<Data>)> {
    let names = workbook.sheet_names().to_owned();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        match workbook.worksheet_range(&name) {
            Ok(range) => out.push((name, range)),
            Err(e) => {
                warn!(sheet = %name, error = %e, "hoja ilegible, se trata como vacía");
                out.push((name, Range::empty()));
            }
        }
    }
    out
}

/// Los xlsx son zip (cabecera "PK"); los xls binarios no traen estilos legibles.
pub fn is_xlsx(bytes: &[u8]) -> bool {
    bytes.len() > 4 && bytes[0] == b'P' && bytes[1] == b'K'
}

/// Mapa (fila, columna) 1-based -> color ARGB del relleno sólido de la celda.
pub type FillMap = HashMap<(u32, u32), String>;

/// Recolecta los colores de relleno de las columnas pedidas en la hoja indicada.
///
/// calamine no expone estilos, por lo que los rellenos se leen con
/// umya-spreadsheet. Si el archivo no es xlsx o el libro no se puede leer con
/// umya, se devuelve un mapa vacío: sin colores no hay override, pero la
/// importación sigue.
pub fn read_fill_colors(bytes: &[u8], sheet_name: &str, columns: &[u32], max_row: u32) -> FillMap {
    let mut fills = FillMap::new();
    if !is_xlsx(bytes) {
        debug!("archivo no xlsx, se omiten colores de relleno");
        return fills;
    }

    let book = match umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes), true) {
        Ok(b) => b,
        Err(e) => {
            warn!(error = ?e, "no se pudieron leer los estilos del libro");
            return fills;
        }
    };

    let sheet = match book.get_sheet_by_name(sheet_name) {
        Some(s) => s,
        None => {
            warn!(sheet = %sheet_name, "hoja no encontrada al leer estilos");
            return fills;
        }
    };

    let last = sheet.get_highest_row().min(max_row);
    for row in 1..=last {
        for &col in columns {
            let argb = match sheet.get_cell((col, row)) {
                Some(cell) => match cell.get_style().get_background_color() {
                    Some(color) => color.get_argb().to_string(),
                    None => continue,
                },
                None => continue,
            };
            if !argb.is_empty() {
                fills.insert((row, col), argb);
            }
        }
    }

    debug!(sheet = %sheet_name, celdas = fills.len(), "colores de relleno leídos");
    fills
}

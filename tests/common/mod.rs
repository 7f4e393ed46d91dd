#![allow(dead_code)]

use std::io::Cursor;

use chrono::TimeZone;
use planimport::ImportOptions;

/// Celda de prueba: (fila, columna) 1-based, texto y relleno opcional.
pub struct Celda {
    pub fila: u32,
    pub col: u32,
    pub texto: &'static str,
    pub relleno: Option<&'static str>,
}

pub fn celda(fila: u32, col: u32, texto: &'static str) -> Celda {
    Celda { fila, col, texto, relleno: None }
}

pub fn celda_color(fila: u32, col: u32, texto: &'static str, argb: &'static str) -> Celda {
    Celda { fila, col, texto, relleno: Some(argb) }
}

/// Arma un xlsx en memoria con las hojas indicadas, en orden.
pub fn libro(hojas: &[(&str, Vec<Celda>)]) -> Vec<u8> {
    let mut book = umya_spreadsheet::new_file();
    for (i, (nombre, celdas)) in hojas.iter().enumerate() {
        if i == 0 {
            book.get_sheet_mut(&0).unwrap().set_name(*nombre);
        } else {
            book.new_sheet(*nombre).unwrap();
        }
        let sheet = book.get_sheet_mut(&i).unwrap();
        for c in celdas {
            sheet.get_cell_mut((c.col, c.fila)).set_value(c.texto);
            if let Some(argb) = c.relleno {
                sheet.get_style_mut((c.col, c.fila)).set_background_color(argb);
            }
        }
    }

    let mut out = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut out).unwrap();
    out.into_inner()
}

pub fn opciones() -> ImportOptions {
    ImportOptions::new("SIN CLIENTE", chrono::Utc.with_ymd_and_hms(2025, 11, 3, 12, 0, 0).unwrap())
}

/// Ruta sqlite única por test dentro del directorio temporal.
pub fn db_temporal(nombre: &str) -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("planimport-{}-{}-{}.db", nombre, std::process::id(), nanos))
}

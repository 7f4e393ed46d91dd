//! Clasificación de colores de relleno de celdas.
//!
//! La planta marca en verde las filas ya despachadas y en amarillo las que
//! están en proceso. Primero se compara contra la paleta conocida (los verdes
//! y amarillos estándar de Excel) y si no hay coincidencia se usa una
//! heurística sobre los canales RGB.

/// Verdes conocidos (ARGB en mayúsculas)
const VERDES: &[&str] = &[
    "FF00B050", "FF92D050", "FF00FF00", "FF70AD47", "FFA9D08E", "FFC6EFCE", "FFC6E0B4", "FFE2EFDA",
    "FF548235", "FF00B04F",
];

/// Amarillos conocidos (ARGB en mayúsculas)
const AMARILLOS: &[&str] = &["FFFFFF00", "FFFFC000", "FFFFEB9C", "FFFFE699", "FFFFF2CC", "FFFFD966"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRelleno {
    Verde,
    Amarillo,
    Otro,
}

/// Normaliza "#FF00B050", "ff00b050" o "00B050" a "FF00B050".
/// Devuelve None si el texto no es un color hexadecimal válido.
fn normalizar_argb(argb: &str) -> Option<String> {
    let s = argb.trim().trim_start_matches('#').to_uppercase();
    if !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match s.len() {
        8 => Some(s),
        6 => Some(format!("FF{}", s)),
        _ => None,
    }
}

fn canales(argb_normalizado: &str) -> Option<(u8, u8, u8)> {
    let rgb = &argb_normalizado[2..];
    let r = u8::from_str_radix(&rgb[0..2], 16).ok()?;
    let g = u8::from_str_radix(&rgb[2..4], 16).ok()?;
    let b = u8::from_str_radix(&rgb[4..6], 16).ok()?;
    Some((r, g, b))
}

pub fn es_verde(argb: &str) -> bool {
    let Some(c) = normalizar_argb(argb) else { return false };
    if VERDES.contains(&c.as_str()) {
        return true;
    }
    match canales(&c) {
        Some((r, g, b)) => g > 160 && g > r && g > b && r < 190 && b < 190,
        None => false,
    }
}

pub fn es_amarillo(argb: &str) -> bool {
    let Some(c) = normalizar_argb(argb) else { return false };
    if AMARILLOS.contains(&c.as_str()) {
        return true;
    }
    match canales(&c) {
        Some((r, g, b)) => r > 200 && g > 180 && b < 150,
        None => false,
    }
}

/// El verde tiene precedencia: es la única señal que cambia el estado.
pub fn clasificar_color(argb: &str) -> ColorRelleno {
    if es_verde(argb) {
        ColorRelleno::Verde
    } else if es_amarillo(argb) {
        ColorRelleno::Amarillo
    } else {
        ColorRelleno::Otro
    }
}

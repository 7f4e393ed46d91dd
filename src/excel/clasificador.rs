//! Clasificador de estado en dos etapas para filas de la zona de trabajo:
//! primero el texto (fechas futuras => pendiente), después el color de
//! relleno, que gana siempre que indique despacho.

use crate::excel::colores::es_verde;
use crate::models::OrderStatus;

/// Busca en el texto de la fila una fecha que indique entrega futura.
pub fn classify_by_date_pattern<S: AsRef<str>>(row_text: &[S]) -> OrderStatus {
    let pendiente = row_text.iter().any(|t| {
        let t = t.as_ref().to_uppercase();
        if t.is_empty() {
            return false;
        }
        t.contains("2026") || t.contains("/26") || ((t.contains("ENE") || t.contains("FEB")) && t.contains("2025"))
    });
    if pendiente { OrderStatus::Pending } else { OrderStatus::Shipped }
}

/// Un relleno verde en cualquiera de las celdas indicadas fuerza SHIPPED.
pub fn override_by_fill_color(fills: &[Option<&str>]) -> Option<OrderStatus> {
    if fills.iter().flatten().any(|argb| es_verde(argb)) {
        Some(OrderStatus::Shipped)
    } else {
        None
    }
}

/// Composición de ambas etapas: el color gana sobre el texto.
pub fn classify_row<S: AsRef<str>>(row_text: &[S], fills: &[Option<&str>]) -> OrderStatus {
    override_by_fill_color(fills).unwrap_or_else(|| classify_by_date_pattern(row_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patrones_de_fecha() {
        assert_eq!(classify_by_date_pattern(&["", "15/ENE/2026"]), OrderStatus::Pending);
        assert_eq!(classify_by_date_pattern(&["entrega 03/02/26"]), OrderStatus::Pending);
        assert_eq!(classify_by_date_pattern(&["feb 2025"]), OrderStatus::Pending);
        assert_eq!(classify_by_date_pattern(&["ENE", "2025"]), OrderStatus::Shipped);
        assert_eq!(classify_by_date_pattern(&["MAR 2025", "SOFA"]), OrderStatus::Shipped);
        let vacia: [&str; 0] = [];
        assert_eq!(classify_by_date_pattern(&vacia), OrderStatus::Shipped);
    }

    #[test]
    fn color_gana_sobre_texto() {
        let texto = ["15/ENE/2026"];
        assert_eq!(classify_row(&texto, &[Some("FF00B050"), None]), OrderStatus::Shipped);
        assert_eq!(classify_row(&texto, &[None, Some("FF92D050")]), OrderStatus::Shipped);
        assert_eq!(classify_row(&texto, &[Some("FFFFFF00"), None]), OrderStatus::Pending);
        assert_eq!(classify_row(&texto, &[None, None]), OrderStatus::Pending);
    }

    #[test]
    fn override_sin_verde_no_opina() {
        assert_eq!(override_by_fill_color(&[Some("FF808080")]), None);
        assert_eq!(override_by_fill_color(&[]), None);
    }
}

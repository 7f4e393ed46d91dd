// Estructuras de datos principales

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Estado de despacho de un pedido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Shipped,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Shipped => "SHIPPED",
        }
    }

    /// Interpreta el texto guardado en base de datos o recibido por query string.
    pub fn parse(s: &str) -> Option<OrderStatus> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Some(OrderStatus::Pending),
            "SHIPPED" => Some(OrderStatus::Shipped),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pedido listo para el upsert, una entrada por número de orden de compra.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub purchase_order_number: String,
    pub client: String,
    /// Descripciones distintas unidas con " / " (máx. 500 caracteres)
    pub product: String,
    /// Cantidad de filas del Excel fusionadas en este pedido
    pub quantity: u32,
    pub status: OrderStatus,
    pub priority: bool,
    pub carrier: String,
    pub assigned_worker: Option<String>,
    /// Fecha de ingreso en formato YYYY-MM-DD
    pub intake_date: String,
    /// Texto libre tal como viene en la celda de fecha de entrega
    pub due_date: String,
    pub dispatch_date: Option<DateTime<Utc>>,
}

/// Parámetros de una importación. El tiempo entra como parámetro para que
/// dos corridas sobre el mismo archivo den exactamente el mismo resultado.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub default_client: String,
    pub default_carrier: String,
    pub intake_date: NaiveDate,
    pub imported_at: DateTime<Utc>,
}

impl ImportOptions {
    pub fn new(default_client: &str, imported_at: DateTime<Utc>) -> Self {
        ImportOptions {
            default_client: default_client.to_string(),
            default_carrier: crate::excel::DEFAULT_CARRIER.to_string(),
            intake_date: imported_at.date_naive(),
            imported_at,
        }
    }
}

/// Resultado de una importación del plan de producción.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub sheet: String,
    pub historical_rows: usize,
    pub working_rows: usize,
    /// Filas de la zona de trabajo forzadas a SHIPPED por relleno verde
    pub color_overrides: usize,
    /// Filas con relleno amarillo (en proceso según la planta); sólo informativo
    pub yellow_rows: usize,
    pub orders: Vec<OrderLine>,
}

/// Ítem de bodega leído desde la planilla de inventario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub code: String,
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    pub location: Option<String>,
}

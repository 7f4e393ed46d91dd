//! Persistencia de pedidos e inventario.
//!
//! `OrderStore` es el colaborador de "upsert de pedidos": inserta o reemplaza
//! por `purchase_order_number`, fila por fila y sin transacción que abarque
//! todo el lote (la última escritura gana). Hay dos backends: sqlite para un
//! archivo local y Postgres para una base remota.

use crate::config::DbTarget;
use crate::models::{InventoryItem, OrderLine, OrderStatus};

pub mod pg;
pub mod sqlite;

pub use pg::PostgresStore;
pub use sqlite::SqliteStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("postgres: {0}")]
    Postgres(#[from] postgres::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub trait OrderStore {
    /// Crea las tablas si no existen.
    fn init(&mut self) -> Result<(), StoreError>;
    /// Inserta o reemplaza cada pedido; devuelve cuántos se escribieron.
    fn upsert_orders(&mut self, orders: &[OrderLine]) -> Result<usize, StoreError>;
    fn list_orders(&mut self, status: Option<OrderStatus>) -> Result<Vec<OrderLine>, StoreError>;
    fn upsert_inventory(&mut self, items: &[InventoryItem]) -> Result<usize, StoreError>;
    fn list_inventory(&mut self) -> Result<Vec<InventoryItem>, StoreError>;
}

/// Abre una conexión corta al destino configurado, con las tablas listas.
pub fn open_store(target: &DbTarget) -> Result<Box<dyn OrderStore + Send>, StoreError> {
    let mut store: Box<dyn OrderStore + Send> = match target {
        DbTarget::Sqlite(path) => Box::new(SqliteStore::open(path)?),
        DbTarget::Postgres(url) => Box::new(PostgresStore::connect(url)?),
    };
    store.init()?;
    Ok(store)
}

pub(crate) const SQL_CREATE_ORDERS: &str = "CREATE TABLE IF NOT EXISTS orders (
    purchase_order_number TEXT PRIMARY KEY,
    client TEXT NOT NULL,
    product TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    status TEXT NOT NULL,
    priority BOOLEAN NOT NULL,
    carrier TEXT NOT NULL,
    assigned_worker TEXT,
    intake_date TEXT NOT NULL,
    due_date TEXT NOT NULL,
    dispatch_date TEXT,
    updated_at TEXT NOT NULL
)";

pub(crate) const SQL_CREATE_INVENTORY: &str = "CREATE TABLE IF NOT EXISTS inventory (
    code TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    quantity DOUBLE PRECISION NOT NULL,
    unit TEXT NOT NULL,
    location TEXT,
    updated_at TEXT NOT NULL
)";

/// Fecha de despacho guardada como texto RFC 3339.
pub(crate) fn parse_dispatch_date(s: Option<String>) -> Option<chrono::DateTime<chrono::Utc>> {
    s.and_then(|t| chrono::DateTime::parse_from_rfc3339(&t).ok()).map(|d| d.with_timezone(&chrono::Utc))
}

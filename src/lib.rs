// Biblioteca raíz del crate `planimport`.
// Importa el plan de producción y el inventario de bodega desde Excel y
// expone el flujo de carga por HTTP.
pub mod api;
pub mod config;
pub mod excel;
pub mod models;
pub mod server;
pub mod storage;

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;

pub use excel::{import_inventory, import_plan, parse_plan, ImportError};
pub use models::{ImportOptions, ImportReport, InventoryItem, OrderLine, OrderStatus};
pub use storage::{open_store, OrderStore, StoreError};

use std::fs;
use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::debug;

use super::{parse_dispatch_date, OrderStore, StoreError, SQL_CREATE_INVENTORY, SQL_CREATE_ORDERS};
use crate::models::{InventoryItem, OrderLine, OrderStatus};

const SQL_UPSERT_ORDER: &str = "INSERT INTO orders (
        purchase_order_number, client, product, quantity, status, priority,
        carrier, assigned_worker, intake_date, due_date, dispatch_date, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
    ON CONFLICT(purchase_order_number) DO UPDATE SET
        client = excluded.client,
        product = excluded.product,
        quantity = excluded.quantity,
        status = excluded.status,
        priority = excluded.priority,
        carrier = excluded.carrier,
        assigned_worker = excluded.assigned_worker,
        intake_date = excluded.intake_date,
        due_date = excluded.due_date,
        dispatch_date = excluded.dispatch_date,
        updated_at = excluded.updated_at";

const SQL_UPSERT_ITEM: &str = "INSERT INTO inventory (code, description, quantity, unit, location, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(code) DO UPDATE SET
        description = excluded.description,
        quantity = excluded.quantity,
        unit = excluded.unit,
        location = excluded.location,
        updated_at = excluded.updated_at";

const SQL_SELECT_ORDERS: &str = "SELECT purchase_order_number, client, product, quantity, status, priority,
        carrier, assigned_worker, intake_date, due_date, dispatch_date
    FROM orders
    WHERE (?1 IS NULL OR status = ?1)
    ORDER BY purchase_order_number";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Abre (o crea) el archivo sqlite, creando el directorio si hace falta.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        Ok(SqliteStore { conn: Connection::open(path)? })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(SqliteStore { conn: Connection::open_in_memory()? })
    }
}

fn order_from_row(row: &Row<'_>) -> rusqlite::Result<OrderLine> {
    let status: String = row.get(4)?;
    let quantity: i64 = row.get(3)?;
    Ok(OrderLine {
        purchase_order_number: row.get(0)?,
        client: row.get(1)?,
        product: row.get(2)?,
        quantity: quantity.max(0) as u32,
        status: OrderStatus::parse(&status).unwrap_or(OrderStatus::Pending),
        priority: row.get(5)?,
        carrier: row.get(6)?,
        assigned_worker: row.get(7)?,
        intake_date: row.get(8)?,
        due_date: row.get(9)?,
        dispatch_date: parse_dispatch_date(row.get(10)?),
    })
}

impl OrderStore for SqliteStore {
    fn init(&mut self) -> Result<(), StoreError> {
        self.conn.execute(SQL_CREATE_ORDERS, [])?;
        self.conn.execute(SQL_CREATE_INVENTORY, [])?;
        Ok(())
    }

    fn upsert_orders(&mut self, orders: &[OrderLine]) -> Result<usize, StoreError> {
        let ts = Utc::now().to_rfc3339();
        let mut stmt = self.conn.prepare(SQL_UPSERT_ORDER)?;
        let mut written = 0usize;
        for o in orders {
            written += stmt.execute(params![
                o.purchase_order_number,
                o.client,
                o.product,
                o.quantity,
                o.status.as_str(),
                o.priority,
                o.carrier,
                o.assigned_worker,
                o.intake_date,
                o.due_date,
                o.dispatch_date.map(|d| d.to_rfc3339()),
                ts,
            ])?;
        }
        debug!(written, "pedidos escritos en sqlite");
        Ok(written)
    }

    fn list_orders(&mut self, status: Option<OrderStatus>) -> Result<Vec<OrderLine>, StoreError> {
        let mut stmt = self.conn.prepare(SQL_SELECT_ORDERS)?;
        let rows = stmt.query_map(params![status.map(|s| s.as_str())], order_from_row)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn upsert_inventory(&mut self, items: &[InventoryItem]) -> Result<usize, StoreError> {
        let ts = Utc::now().to_rfc3339();
        let mut stmt = self.conn.prepare(SQL_UPSERT_ITEM)?;
        let mut written = 0usize;
        for it in items {
            written += stmt.execute(params![it.code, it.description, it.quantity, it.unit, it.location, ts])?;
        }
        Ok(written)
    }

    fn list_inventory(&mut self) -> Result<Vec<InventoryItem>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT code, description, quantity, unit, location FROM inventory ORDER BY code")?;
        let rows = stmt.query_map([], |row| {
            Ok(InventoryItem {
                code: row.get(0)?,
                description: row.get(1)?,
                quantity: row.get(2)?,
                unit: row.get(3)?,
                location: row.get(4)?,
            })
        })?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pedido(numero: &str, estado: OrderStatus) -> OrderLine {
        OrderLine {
            purchase_order_number: numero.to_string(),
            client: "HOMECENTER".to_string(),
            product: "SOFA".to_string(),
            quantity: 1,
            status: estado,
            priority: false,
            carrier: "POR ASIGNAR".to_string(),
            assigned_worker: None,
            intake_date: "2025-11-03".to_string(),
            due_date: String::new(),
            dispatch_date: match estado {
                OrderStatus::Shipped => Some(Utc.with_ymd_and_hms(2025, 11, 3, 12, 0, 0).unwrap()),
                OrderStatus::Pending => None,
            },
        }
    }

    #[test]
    fn upsert_reemplaza_por_numero() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.init().unwrap();
        store.upsert_orders(&[pedido("150123", OrderStatus::Pending), pedido("350001", OrderStatus::Pending)]).unwrap();

        let mut cambiado = pedido("150123", OrderStatus::Shipped);
        cambiado.quantity = 4;
        cambiado.assigned_worker = Some("JUAN".to_string());
        store.upsert_orders(&[cambiado.clone()]).unwrap();

        let todos = store.list_orders(None).unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0], cambiado);

        let pendientes = store.list_orders(Some(OrderStatus::Pending)).unwrap();
        assert_eq!(pendientes.len(), 1);
        assert_eq!(pendientes[0].purchase_order_number, "350001");
    }

    #[test]
    fn inventario_ida_y_vuelta() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.init().unwrap();
        let item = InventoryItem {
            code: "TELA-01".into(),
            description: "Tela lino".into(),
            quantity: 12.5,
            unit: "MT".into(),
            location: None,
        };
        store.upsert_inventory(&[item.clone()]).unwrap();
        store.upsert_inventory(&[item.clone()]).unwrap();
        assert_eq!(store.list_inventory().unwrap(), vec![item]);
    }
}

use chrono::Utc;
use postgres::{Client, NoTls, Row};
use tracing::debug;

use super::{parse_dispatch_date, OrderStore, StoreError, SQL_CREATE_INVENTORY, SQL_CREATE_ORDERS};
use crate::models::{InventoryItem, OrderLine, OrderStatus};

const SQL_UPSERT_ORDER: &str = "INSERT INTO orders (
        purchase_order_number, client, product, quantity, status, priority,
        carrier, assigned_worker, intake_date, due_date, dispatch_date, updated_at
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
    ON CONFLICT (purchase_order_number) DO UPDATE SET
        client = EXCLUDED.client,
        product = EXCLUDED.product,
        quantity = EXCLUDED.quantity,
        status = EXCLUDED.status,
        priority = EXCLUDED.priority,
        carrier = EXCLUDED.carrier,
        assigned_worker = EXCLUDED.assigned_worker,
        intake_date = EXCLUDED.intake_date,
        due_date = EXCLUDED.due_date,
        dispatch_date = EXCLUDED.dispatch_date,
        updated_at = EXCLUDED.updated_at";

const SQL_UPSERT_ITEM: &str = "INSERT INTO inventory (code, description, quantity, unit, location, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6)
    ON CONFLICT (code) DO UPDATE SET
        description = EXCLUDED.description,
        quantity = EXCLUDED.quantity,
        unit = EXCLUDED.unit,
        location = EXCLUDED.location,
        updated_at = EXCLUDED.updated_at";

/// Backend Postgres con el cliente síncrono. Debe usarse fuera de los hilos
/// del runtime async (en el servidor siempre se llama dentro de `tokio::task::spawn_blocking`).
pub struct PostgresStore {
    client: Client,
}

impl PostgresStore {
    pub fn connect(url: &str) -> Result<Self, StoreError> {
        Ok(PostgresStore { client: Client::connect(url, NoTls)? })
    }
}

fn order_from_row(row: &Row) -> OrderLine {
    let status: String = row.get(4);
    let quantity: i32 = row.get(3);
    OrderLine {
        purchase_order_number: row.get(0),
        client: row.get(1),
        product: row.get(2),
        quantity: quantity.max(0) as u32,
        status: OrderStatus::parse(&status).unwrap_or(OrderStatus::Pending),
        priority: row.get(5),
        carrier: row.get(6),
        assigned_worker: row.get(7),
        intake_date: row.get(8),
        due_date: row.get(9),
        dispatch_date: parse_dispatch_date(row.get(10)),
    }
}

impl OrderStore for PostgresStore {
    fn init(&mut self) -> Result<(), StoreError> {
        self.client.batch_execute(&format!("{};\n{};", SQL_CREATE_ORDERS, SQL_CREATE_INVENTORY))?;
        Ok(())
    }

    fn upsert_orders(&mut self, orders: &[OrderLine]) -> Result<usize, StoreError> {
        let ts = Utc::now().to_rfc3339();
        let stmt = self.client.prepare(SQL_UPSERT_ORDER)?;
        let mut written = 0usize;
        for o in orders {
            let quantity = o.quantity.min(i32::MAX as u32) as i32;
            let dispatch = o.dispatch_date.map(|d| d.to_rfc3339());
            written += self.client.execute(
                &stmt,
                &[
                    &o.purchase_order_number,
                    &o.client,
                    &o.product,
                    &quantity,
                    &o.status.as_str(),
                    &o.priority,
                    &o.carrier,
                    &o.assigned_worker,
                    &o.intake_date,
                    &o.due_date,
                    &dispatch,
                    &ts,
                ],
            )? as usize;
        }
        debug!(written, "pedidos escritos en postgres");
        Ok(written)
    }

    fn list_orders(&mut self, status: Option<OrderStatus>) -> Result<Vec<OrderLine>, StoreError> {
        let filtro: Option<String> = status.map(|s| s.as_str().to_string());
        let rows = self.client.query(
            "SELECT purchase_order_number, client, product, quantity, status, priority,
                    carrier, assigned_worker, intake_date, due_date, dispatch_date
             FROM orders
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY purchase_order_number",
            &[&filtro],
        )?;
        Ok(rows.iter().map(order_from_row).collect())
    }

    fn upsert_inventory(&mut self, items: &[InventoryItem]) -> Result<usize, StoreError> {
        let ts = Utc::now().to_rfc3339();
        let stmt = self.client.prepare(SQL_UPSERT_ITEM)?;
        let mut written = 0usize;
        for it in items {
            written += self
                .client
                .execute(&stmt, &[&it.code, &it.description, &it.quantity, &it.unit, &it.location, &ts])?
                as usize;
        }
        Ok(written)
    }

    fn list_inventory(&mut self) -> Result<Vec<InventoryItem>, StoreError> {
        let rows = self
            .client
            .query("SELECT code, description, quantity, unit, location FROM inventory ORDER BY code", &[])?;
        Ok(rows
            .iter()
            .map(|row| InventoryItem {
                code: row.get(0),
                description: row.get(1),
                quantity: row.get(2),
                unit: row.get(3),
                location: row.get(4),
            })
            .collect())
    }
}

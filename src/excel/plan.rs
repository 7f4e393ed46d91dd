//! Importación del plan de producción desde Excel.
//!
//! El archivo de la planta tiene un layout fijo heredado de una planilla
//! histórica: las filas 1..=6022 son pedidos ya despachados y desde la 6023
//! empiezan los pedidos en curso. No hay detección de encabezados: si el
//! archivo cambia de layout las filas se clasifican mal en silencio.

use std::collections::{HashMap, HashSet};

use calamine::{Data, Range};
use tracing::{debug, info};

use crate::excel::clasificador::classify_row;
use crate::excel::colores::{clasificar_color, ColorRelleno};
use crate::excel::io::{cell_text, last_row, open_workbook_bytes, read_all_sheets, read_fill_colors, FillMap};
use crate::excel::ImportError;
use crate::models::{ImportOptions, ImportReport, OrderLine, OrderStatus};

// Columnas (1-based)
pub const COL_CLIENTE: u32 = 2;
pub const COL_PEDIDO: u32 = 3;
pub const COL_PRODUCTO: u32 = 4;
pub const COL_OPERARIO: u32 = 7;
pub const COL_ENTREGA: u32 = 10;
pub const COL_TRANSPORTADORA: u32 = 11;

// Filas (1-based)
pub const FILA_FIN_HISTORICO: u32 = 6022;
pub const FILA_LIMITE_ESCANEO: u32 = 30000;
pub const FILAS_MUESTRA_HOJA: u32 = 500;

/// Columnas revisadas al buscar fechas en la fila
pub const COLUMNAS_TEXTO: u32 = 25;
/// Filas seguidas sin pedido que se toman como fin de datos
pub const TOLERANCIA_VACIAS: u32 = 150;
pub const LARGO_MIN_PEDIDO: usize = 3;
pub const LARGO_MAX_PRODUCTO: usize = 500;

/// Prefijo del número de pedido -> cliente
const PREFIJOS_CLIENTE: &[(&str, &str)] = &[
    ("150", "HOMECENTER"),
    ("350", "FALABELLA"),
    ("TTJ", "TUGO"),
    ("450", "ALKOSTO"),
    ("OC-", "EXITO"),
];

/// Una hoja candidata: nombre, valores y rellenos.
pub struct PlanSheet {
    pub name: String,
    pub values: Range<Data>,
    pub fills: FillMap,
}

impl PlanSheet {
    pub fn new(name: &str, values: Range<Data>, fills: FillMap) -> Self {
        PlanSheet { name: name.to_string(), values, fills }
    }

    fn text(&self, row: u32, col: u32) -> String {
        cell_text(&self.values, row, col)
    }

    fn fill(&self, row: u32, col: u32) -> Option<&str> {
        self.fills.get(&(row, col)).map(|s| s.as_str())
    }
}

/// Fila cruda del Excel; sólo existe durante una llamada de parseo.
#[derive(Debug, Clone)]
struct RawRow {
    pedido: String,
    cliente: String,
    producto: String,
    operario: String,
    entrega: String,
    transportadora: String,
    estado: OrderStatus,
}

fn pedido_valido(pedido: &str) -> bool {
    pedido.chars().count() >= LARGO_MIN_PEDIDO
}

/// Cliente según el prefijo del pedido; `None` si ningún prefijo coincide.
pub fn client_from_prefix(pedido: &str) -> Option<&'static str> {
    let p = pedido.trim().to_uppercase();
    PREFIJOS_CLIENTE.iter().find(|(prefijo, _)| p.starts_with(prefijo)).map(|(_, cliente)| *cliente)
}

fn resolver_cliente(cliente: String, pedido: &str, default_client: &str) -> String {
    if !cliente.is_empty() {
        return cliente;
    }
    client_from_prefix(pedido).unwrap_or(default_client).to_string()
}

/// Cuenta las filas de muestra con un número de pedido válido.
pub fn count_order_cells(values: &Range<Data>) -> usize {
    let fin = last_row(values).min(FILAS_MUESTRA_HOJA);
    (1..=fin).filter(|&r| pedido_valido(&cell_text(values, r, COL_PEDIDO))).count()
}

/// Índice de la hoja con más pedidos en las primeras filas. En empate se
/// queda la primera; sin hojas o sin pedidos, la primera.
pub fn select_sheet(sheets: &[(String, Range<Data>)]) -> usize {
    let mut mejor = 0usize;
    let mut mejor_cuenta = 0usize;
    for (i, (name, values)) in sheets.iter().enumerate() {
        let cuenta = count_order_cells(values);
        debug!(sheet = %name, pedidos = cuenta, "muestra de hoja");
        if cuenta > mejor_cuenta {
            mejor = i;
            mejor_cuenta = cuenta;
        }
    }
    mejor
}

fn leer_fila(sheet: &PlanSheet, row: u32, pedido: String, estado: OrderStatus) -> RawRow {
    RawRow {
        pedido,
        cliente: sheet.text(row, COL_CLIENTE),
        producto: sheet.text(row, COL_PRODUCTO),
        operario: sheet.text(row, COL_OPERARIO),
        entrega: sheet.text(row, COL_ENTREGA),
        transportadora: sheet.text(row, COL_TRANSPORTADORA),
        estado,
    }
}

/// Estado acumulado de una importación. Vive sólo durante una llamada.
#[derive(Default)]
struct Acumulador {
    filas: Vec<RawRow>,
    historicos: HashSet<String>,
    historical_rows: usize,
    working_rows: usize,
    color_overrides: usize,
    yellow_rows: usize,
}

fn escanear_historico(sheet: &PlanSheet, acc: &mut Acumulador) {
    let fin = last_row(&sheet.values).min(FILA_FIN_HISTORICO);
    for row in 1..=fin {
        let pedido = sheet.text(row, COL_PEDIDO);
        if !pedido_valido(&pedido) {
            continue;
        }
        acc.historicos.insert(pedido.clone());
        acc.filas.push(leer_fila(sheet, row, pedido, OrderStatus::Shipped));
        acc.historical_rows += 1;
    }
}

fn escanear_trabajo(sheet: &PlanSheet, acc: &mut Acumulador) {
    let fin = last_row(&sheet.values).min(FILA_LIMITE_ESCANEO);
    let mut vacias_seguidas = 0u32;

    for row in (FILA_FIN_HISTORICO + 1)..=fin {
        let pedido = sheet.text(row, COL_PEDIDO);
        if !pedido_valido(&pedido) {
            vacias_seguidas += 1;
            if vacias_seguidas >= TOLERANCIA_VACIAS {
                debug!(fila = row, "fin de datos por filas vacías");
                break;
            }
            continue;
        }
        vacias_seguidas = 0;

        let texto: Vec<String> = (1..=COLUMNAS_TEXTO).map(|c| sheet.text(row, c)).collect();
        let rellenos = [sheet.fill(row, COL_PEDIDO), sheet.fill(row, COL_PRODUCTO)];

        let por_texto = classify_row(&texto, &[]);
        let mut estado = classify_row(&texto, &rellenos);
        if por_texto == OrderStatus::Pending && estado == OrderStatus::Shipped {
            acc.color_overrides += 1;
        }
        if rellenos.iter().flatten().any(|argb| clasificar_color(argb) == ColorRelleno::Amarillo) {
            acc.yellow_rows += 1;
        }

        // Un pedido que ya aparece en el histórico sigue despachado.
        if acc.historicos.contains(&pedido) {
            estado = OrderStatus::Shipped;
        }

        acc.filas.push(leer_fila(sheet, row, pedido, estado));
        acc.working_rows += 1;
    }
}

fn truncar(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

fn primero_no_vacio(actual: &mut String, nuevo: &str) {
    if actual.is_empty() && !nuevo.is_empty() {
        *actual = nuevo.to_string();
    }
}

/// Agrupa las filas crudas por número de pedido, en orden de aparición.
fn agrupar(filas: Vec<RawRow>, opts: &ImportOptions) -> Vec<OrderLine> {
    let mut indices: HashMap<String, usize> = HashMap::new();
    let mut grupos: Vec<(RawRow, Vec<String>, u32)> = Vec::new();

    for fila in filas {
        match indices.get(&fila.pedido) {
            Some(&i) => {
                let (base, productos, cantidad) = &mut grupos[i];
                *cantidad += 1;
                if fila.estado == OrderStatus::Shipped {
                    base.estado = OrderStatus::Shipped;
                }
                if !fila.producto.is_empty() && !productos.contains(&fila.producto) {
                    productos.push(fila.producto.clone());
                }
                primero_no_vacio(&mut base.cliente, &fila.cliente);
                primero_no_vacio(&mut base.operario, &fila.operario);
                primero_no_vacio(&mut base.entrega, &fila.entrega);
                primero_no_vacio(&mut base.transportadora, &fila.transportadora);
            }
            None => {
                indices.insert(fila.pedido.clone(), grupos.len());
                let productos = if fila.producto.is_empty() { Vec::new() } else { vec![fila.producto.clone()] };
                grupos.push((fila, productos, 1));
            }
        }
    }

    grupos
        .into_iter()
        .map(|(base, productos, cantidad)| {
            let dispatch_date = match base.estado {
                OrderStatus::Shipped => Some(opts.imported_at),
                OrderStatus::Pending => None,
            };
            let carrier = if base.transportadora.is_empty() { opts.default_carrier.clone() } else { base.transportadora };
            let client = resolver_cliente(base.cliente, &base.pedido, &opts.default_client);
            OrderLine {
                client,
                product: truncar(&productos.join(" / "), LARGO_MAX_PRODUCTO),
                quantity: cantidad,
                status: base.estado,
                priority: false,
                carrier,
                assigned_worker: if base.operario.is_empty() { None } else { Some(base.operario) },
                intake_date: opts.intake_date.format("%Y-%m-%d").to_string(),
                due_date: base.entrega,
                dispatch_date,
                purchase_order_number: base.pedido,
            }
        })
        .collect()
}

/// Corre las dos zonas sobre una hoja ya elegida y agrupa el resultado.
pub fn parse_plan_sheet(sheet: &PlanSheet, opts: &ImportOptions) -> ImportReport {
    let mut acc = Acumulador::default();
    escanear_historico(sheet, &mut acc);
    escanear_trabajo(sheet, &mut acc);

    let Acumulador { filas, historical_rows, working_rows, color_overrides, yellow_rows, .. } = acc;
    let orders = agrupar(filas, opts);

    info!(
        sheet = %sheet.name,
        historical_rows,
        working_rows,
        color_overrides,
        pedidos = orders.len(),
        "plan de producción importado"
    );

    ImportReport { sheet: sheet.name.clone(), historical_rows, working_rows, color_overrides, yellow_rows, orders }
}

/// Importa el plan de producción desde los bytes del archivo subido.
///
/// Sólo falla si los bytes no se pueden abrir como planilla; las filas
/// malformadas se omiten.
pub fn import_plan(bytes: &[u8], opts: &ImportOptions) -> Result<ImportReport, ImportError> {
    let mut workbook = open_workbook_bytes(bytes)?;
    let mut sheets = read_all_sheets(&mut workbook);
    if sheets.is_empty() {
        return Err(ImportError::NoSheets);
    }

    let idx = select_sheet(&sheets);
    let (name, values) = sheets.swap_remove(idx);
    let fin = last_row(&values).min(FILA_LIMITE_ESCANEO);
    let fills = read_fill_colors(bytes, &name, &[COL_PEDIDO, COL_PRODUCTO], fin);

    Ok(parse_plan_sheet(&PlanSheet::new(&name, values, fills), opts))
}

/// Atajo que devuelve sólo los pedidos.
pub fn parse_plan(bytes: &[u8], default_client: &str, imported_at: chrono::DateTime<chrono::Utc>) -> Result<Vec<OrderLine>, ImportError> {
    let opts = ImportOptions::new(default_client, imported_at);
    Ok(import_plan(bytes, &opts)?.orders)
}

mod common;

use common::{celda, celda_color, libro, opciones};
use planimport::excel::plan::{
    COL_CLIENTE, COL_ENTREGA, COL_OPERARIO, COL_PEDIDO, COL_PRODUCTO, COL_TRANSPORTADORA, FILA_FIN_HISTORICO,
    FILA_LIMITE_ESCANEO, FILAS_MUESTRA_HOJA,
};
use planimport::{import_plan, ImportError, OrderStatus};

#[test]
fn historico_y_trabajo_con_relleno_verde() {
    let bytes = libro(&[(
        "Plan",
        vec![
            celda(5, COL_PEDIDO, "150123"),
            celda(5, COL_PRODUCTO, "SOFA"),
            celda_color(6100, COL_PEDIDO, "150123", "FF00B050"),
            celda(6100, 15, "15/ENE/2026"),
        ],
    )]);

    let rep = import_plan(&bytes, &opciones()).expect("el libro debe abrirse");
    assert_eq!(rep.orders.len(), 1);
    let o = &rep.orders[0];
    assert_eq!(o.purchase_order_number, "150123");
    assert_eq!(o.client, "HOMECENTER");
    assert_eq!(o.product, "SOFA");
    assert_eq!(o.quantity, 2);
    assert_eq!(o.status, OrderStatus::Shipped);
    assert!(!o.priority);
    assert!(o.dispatch_date.is_some());
    assert_eq!(rep.historical_rows, 1);
    assert_eq!(rep.working_rows, 1);
    assert_eq!(rep.color_overrides, 1);
}

#[test]
fn fila_de_trabajo_con_fecha_futura_queda_pendiente() {
    let bytes = libro(&[("Plan", vec![celda(6023, COL_PEDIDO, "TTJ-44"), celda(6023, 20, "/26")])]);

    let rep = import_plan(&bytes, &opciones()).unwrap();
    assert_eq!(rep.orders.len(), 1);
    let o = &rep.orders[0];
    assert_eq!(o.purchase_order_number, "TTJ-44");
    assert_eq!(o.status, OrderStatus::Pending);
    assert_eq!(o.client, "TUGO");
    assert_eq!(o.dispatch_date, None);
    assert_eq!(o.carrier, planimport::excel::DEFAULT_CARRIER);
}

#[test]
fn campos_de_la_fila_se_copian() {
    let bytes = libro(&[(
        "Plan",
        vec![
            celda(6030, COL_CLIENTE, "MUEBLES DEL SUR"),
            celda(6030, COL_PEDIDO, "PX-100"),
            celda(6030, COL_PRODUCTO, "COMEDOR 6P"),
            celda(6030, COL_OPERARIO, "CARLOS"),
            celda(6030, COL_ENTREGA, "20/FEB/2026"),
            celda(6030, COL_TRANSPORTADORA, "COORDINADORA"),
        ],
    )]);

    let rep = import_plan(&bytes, &opciones()).unwrap();
    let o = &rep.orders[0];
    assert_eq!(o.client, "MUEBLES DEL SUR");
    assert_eq!(o.assigned_worker.as_deref(), Some("CARLOS"));
    assert_eq!(o.due_date, "20/FEB/2026");
    assert_eq!(o.carrier, "COORDINADORA");
    assert_eq!(o.status, OrderStatus::Pending);
    assert_eq!(o.intake_date, "2025-11-03");
}

#[test]
fn pedidos_cortos_no_generan_lineas() {
    let bytes = libro(&[(
        "Plan",
        vec![
            celda(2, COL_PEDIDO, "12"),
            celda(6023, COL_PEDIDO, "AB"),
            celda(6024, COL_PEDIDO, "ABC"),
            celda(6024, 9, "2026"),
        ],
    )]);

    let rep = import_plan(&bytes, &opciones()).unwrap();
    let numeros: Vec<&str> = rep.orders.iter().map(|o| o.purchase_order_number.as_str()).collect();
    assert_eq!(numeros, vec!["ABC"]);
}

#[test]
fn despachado_domina_al_agrupar() {
    let bytes = libro(&[(
        "Plan",
        vec![
            celda(6023, COL_PEDIDO, "350900"),
            celda(6023, COL_PRODUCTO, "SILLA"),
            celda(6023, 12, "ENTREGA 2026"),
            celda(6024, COL_PEDIDO, "350900"),
            celda(6024, COL_PRODUCTO, "MESA"),
            celda(6025, COL_PEDIDO, "350901"),
            celda(6025, 12, "ENTREGA 2026"),
        ],
    )]);

    let rep = import_plan(&bytes, &opciones()).unwrap();
    assert_eq!(rep.orders.len(), 2);
    assert_eq!(rep.orders[0].status, OrderStatus::Shipped);
    assert_eq!(rep.orders[0].product, "SILLA / MESA");
    assert_eq!(rep.orders[0].client, "FALABELLA");
    assert_eq!(rep.orders[1].status, OrderStatus::Pending);
}

#[test]
fn relleno_amarillo_no_cambia_estado() {
    let bytes = libro(&[(
        "Plan",
        vec![celda_color(6023, COL_PRODUCTO, "CAMA DOBLE", "FFFFFF00"), celda(6023, COL_PEDIDO, "OC-77"), celda(6023, 5, "2026")],
    )]);

    let rep = import_plan(&bytes, &opciones()).unwrap();
    assert_eq!(rep.yellow_rows, 1);
    assert_eq!(rep.color_overrides, 0);
    assert_eq!(rep.orders[0].status, OrderStatus::Pending);
}

const CODIGOS: [&str; 20] = [
    "P001", "P002", "P003", "P004", "P005", "P006", "P007", "P008", "P009", "P010", "P011", "P012", "P013", "P014",
    "P015", "P016", "P017", "P018", "P019", "P020",
];

/// `n` pedidos seguidos en la columna de pedido, desde la fila `desde`.
fn pedidos_desde(desde: u32, n: usize) -> Vec<common::Celda> {
    CODIGOS.iter().take(n).enumerate().map(|(i, c)| celda(desde + i as u32, COL_PEDIDO, *c)).collect()
}

#[test]
fn se_elige_la_hoja_con_mas_pedidos() {
    let bytes = libro(&[("Resumen", pedidos_desde(1, 10)), ("Plan 2025", pedidos_desde(1, 20))]);
    let rep = import_plan(&bytes, &opciones()).unwrap();
    assert_eq!(rep.sheet, "Plan 2025");
    assert_eq!(rep.orders.len(), 20);
}

#[test]
fn sin_pedidos_se_usa_la_primera_hoja() {
    let bytes = libro(&[("Portada", vec![celda(1, 1, "PLAN")]), ("Notas", vec![celda(1, 1, "x")])]);
    let rep = import_plan(&bytes, &opciones()).unwrap();
    assert_eq!(rep.sheet, "Portada");
    assert!(rep.orders.is_empty());
}

#[test]
fn misma_entrada_mismo_resultado() {
    let bytes = libro(&[(
        "Plan",
        vec![
            celda(3, COL_PEDIDO, "150555"),
            celda(3, COL_PRODUCTO, "SOFA"),
            celda(6023, COL_PEDIDO, "TTJ-9"),
            celda(6023, 4, "POLTRONA"),
            celda(6023, 6, "03/02/26"),
        ],
    )]);

    let a = import_plan(&bytes, &opciones()).unwrap();
    let b = import_plan(&bytes, &opciones()).unwrap();
    assert_eq!(a.orders, b.orders);
}

#[test]
fn bytes_que_no_son_planilla_fallan() {
    let res = import_plan(b"PK esto no es un zip valido", &opciones());
    assert!(matches!(res, Err(ImportError::Workbook(_))));
}

#[test]
fn parse_plan_usa_cliente_por_defecto() {
    use chrono::TimeZone;

    let bytes = libro(&[("Plan", vec![celda(6023, COL_PEDIDO, "XYZ-1"), celda(6023, COL_PRODUCTO, "BIFE")])]);
    let ahora = chrono::Utc.with_ymd_and_hms(2025, 12, 1, 8, 30, 0).unwrap();
    let pedidos = planimport::parse_plan(&bytes, "CLIENTE MOSTRADOR", ahora).unwrap();
    assert_eq!(pedidos.len(), 1);
    assert_eq!(pedidos[0].client, "CLIENTE MOSTRADOR");
    assert_eq!(pedidos[0].status, OrderStatus::Shipped);
    assert_eq!(pedidos[0].dispatch_date, Some(ahora));
    assert_eq!(pedidos[0].intake_date, "2025-12-01");
}

#[test]
fn la_muestra_de_hoja_solo_mira_las_primeras_filas() {
    // la hoja B tiene más pedidos, pero todos después de la fila de muestra
    let bytes = libro(&[("A", pedidos_desde(1, 10)), ("B", pedidos_desde(FILAS_MUESTRA_HOJA + 1, 20))]);
    let rep = import_plan(&bytes, &opciones()).unwrap();
    assert_eq!(rep.sheet, "A");
    assert_eq!(rep.orders.len(), 10);
}

#[test]
fn ultima_fila_historica_queda_despachada() {
    let bytes = libro(&[(
        "Plan",
        vec![
            celda(FILA_FIN_HISTORICO, COL_PEDIDO, "HIS-6022"),
            celda(FILA_FIN_HISTORICO, 12, "15/ENE/2026"),
            celda(FILA_FIN_HISTORICO + 1, COL_PEDIDO, "TRA-6023"),
            celda(FILA_FIN_HISTORICO + 1, 12, "15/ENE/2026"),
        ],
    )]);

    let rep = import_plan(&bytes, &opciones()).unwrap();
    assert_eq!(rep.historical_rows, 1);
    assert_eq!(rep.working_rows, 1);
    assert_eq!(rep.orders[0].purchase_order_number, "HIS-6022");
    assert_eq!(rep.orders[0].status, OrderStatus::Shipped);
    assert_eq!(rep.orders[1].purchase_order_number, "TRA-6023");
    assert_eq!(rep.orders[1].status, OrderStatus::Pending);
}

#[test]
fn el_escaneo_se_corta_en_la_fila_limite() {
    // una fila cada 100 para que la tolerancia de vacías nunca corte antes
    let mut celdas: Vec<common::Celda> = (FILA_FIN_HISTORICO + 1..FILA_LIMITE_ESCANEO)
        .step_by(100)
        .map(|fila| celda(fila, COL_PEDIDO, "RELLENO"))
        .collect();
    celdas.push(celda(FILA_LIMITE_ESCANEO, COL_PEDIDO, "ULTIMA"));
    celdas.push(celda(FILA_LIMITE_ESCANEO + 1, COL_PEDIDO, "FUERA"));

    let rep = import_plan(&libro(&[("Plan", celdas)]), &opciones()).unwrap();
    let numeros: Vec<&str> = rep.orders.iter().map(|o| o.purchase_order_number.as_str()).collect();
    assert_eq!(numeros, vec!["RELLENO", "ULTIMA"]);
}

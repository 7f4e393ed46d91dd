use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use tracing::info;

use crate::api::handlers::{
    health_handler, inventory_import_handler, inventory_list_handler, orders_list_handler, plan_import_handler,
    plan_preview_handler,
};
use crate::api::AppState;
use crate::config::Config;

/// Registra las rutas del servicio. Se reutiliza en los tests con `actix_web::test`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_handler))
        .route("/plan/preview", web::post().to(plan_preview_handler))
        .route("/plan/import", web::post().to(plan_import_handler))
        .route("/orders", web::get().to(orders_list_handler))
        .route("/inventory/import", web::post().to(inventory_import_handler))
        .route("/inventory", web::get().to(inventory_list_handler));
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind = config.bind_addr.clone();
    let state = web::Data::new(AppState::new(config));
    info!(bind = %bind, db = ?state.config.db, "iniciando servidor de importación");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            // el log de acceso de actix llega a tracing por el puente de `log`
            .wrap(Logger::new("%a \"%r\" %s %b %Dms"))
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .workers(std::cmp::max(1, num_cpus::get()))
    .bind(bind)?
    .run()
    .await
}

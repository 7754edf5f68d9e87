// Route exports
pub mod services;

use actix_web::web;

pub use services::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(services::configure),
    );
}

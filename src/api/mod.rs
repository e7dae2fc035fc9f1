pub mod analysis;
pub mod cors;
pub mod error;
pub mod health;
pub mod openapi;

use actix_web::web;

/// Register every HTTP route of the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(analysis::configure)
        .configure(health::configure)
        .configure(openapi::configure);
}

//! HTTP inbound adapter exposing the REST API under `/api/v1`.

use actix_web::web;

pub mod error;
pub mod health;
pub mod jokes;
pub mod outcome;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod users;

pub use crate::domain::ApiResult;

/// Base path of every API route.
pub const API_PREFIX: &str = "/api/v1";

/// Register the API scope. Callers provide `web::Data<HttpState>`.
///
/// `/jokes/random` is registered before `/jokes/{id}` so the literal segment
/// wins.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use jokes::inbound::http::configure_api;
///
/// let _app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
            .service(users::register)
            .service(users::login)
            .service(users::logout)
            .service(users::current_user)
            .service(jokes::list_jokes)
            .service(jokes::random_joke)
            .service(jokes::get_joke)
            .service(jokes::create_joke)
            .service(jokes::delete_joke),
    );
}

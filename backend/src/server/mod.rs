//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;

use jokes::Trace;
#[cfg(debug_assertions)]
use jokes::doc::ApiDoc;
use jokes::inbound::http::configure_api;
use jokes::inbound::http::health::{HealthState, live, ready};
use jokes::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure_api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the listener is bound.
/// - `config`: pre-built [`ServerConfig`] with session, binding, and storage settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config, Arc::new(DefaultClock));
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Smoke tests for the assembled application.

    use super::*;
    use std::net::SocketAddr;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use jokes::domain::{SessionSecret, SessionSecrets, TRACE_ID_HEADER};
    use jokes::inbound::http::session::SessionCookieConfig;
    use jokes::inbound::http::session_config::SessionSettings;
    use rstest::{fixture, rstest};

    #[fixture]
    fn deps() -> AppDependencies {
        let secrets = SessionSecrets::new(vec![SessionSecret::new(
            b"fedcba9876543210fedcba9876543210".to_vec(),
        )])
        .expect("one secret");
        let addr: SocketAddr = "127.0.0.1:0".parse().expect("literal address");
        let config = ServerConfig::new(
            SessionSettings {
                secrets,
                cookie: SessionCookieConfig { secure: false },
            },
            addr,
        )
        .with_bcrypt_cost(4);
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: build_http_state(&config, Arc::new(DefaultClock)),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn api_routes_are_traced(deps: AppDependencies) {
        let app = actix_test::init_service(build_app(deps)).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/v1/jokes")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key(TRACE_ID_HEADER));
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_follows_health_state(deps: AppDependencies) {
        let health = deps.health_state.clone();
        let app = actix_test::init_service(build_app(deps)).await;

        let req = actix_test::TestRequest::get()
            .uri("/health/ready")
            .to_request();
        let before = actix_test::call_service(&app, req).await;
        assert_eq!(before.status(), StatusCode::SERVICE_UNAVAILABLE);

        health.mark_ready();
        let req = actix_test::TestRequest::get()
            .uri("/health/ready")
            .to_request();
        let after = actix_test::call_service(&app, req).await;
        assert_eq!(after.status(), StatusCode::OK);
    }
}

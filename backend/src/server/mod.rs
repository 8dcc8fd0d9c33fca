//! Server construction and route wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use backend::Trace;
use backend::domain::{AccountService, PageService, PasswordHasher};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::links::{add_link, record_click, remove_link, update_link};
use backend::inbound::http::pages::{create_page, delete_page, my_page, public_page, update_page};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::users::{login, me, signup};
use backend::outbound::persistence::{MongoPageRepository, MongoUserRepository};

fn build_http_state(config: &ServerConfig) -> HttpState {
    let users = Arc::new(MongoUserRepository::new(&config.database));
    let pages = Arc::new(MongoPageRepository::new(&config.database));

    let accounts = Arc::new(AccountService::new(
        users.clone(),
        PasswordHasher::with_default_cost(),
        config.tokens.clone(),
    ));
    let page_service = Arc::new(PageService::new(pages, users));

    HttpState::new(
        accounts,
        page_service.clone(),
        page_service,
        config.tokens.clone(),
    )
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // The frontend is served from another origin.
    let cors = Cors::permissive();

    // `/linkpage/my` and the link routes must register before the
    // `/linkpage/{username}` catch-all so a handle named like a fixed
    // segment cannot shadow them.
    let api = web::scope("/api")
        .service(signup)
        .service(login)
        .service(me)
        .service(create_page)
        .service(my_page)
        .service(update_page)
        .service(delete_page)
        .service(add_link)
        .service(update_link)
        .service(remove_link)
        .service(record_click)
        .service(public_page);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(cors)
        .wrap(Trace)
        .service(api)
        .service(live)
        .service(ready)
}

/// Construct the HTTP server.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr())?
    .run();

    health_state.mark_ready();
    Ok(server)
}

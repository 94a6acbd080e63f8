use std::net::TcpListener;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    routes::{default_route, owner_details_route},
    services::BatchOrchestrator,
};

pub fn run(
    listener: TcpListener,
    orchestrator: BatchOrchestrator,
    max_payload_bytes: usize,
) -> Result<Server, std::io::Error> {
    let orchestrator = web::Data::new(orchestrator);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::health_check)
            .service(web::scope("/api").service(owner_details_route::get_owner_details))
            .app_data(orchestrator.clone())
            .app_data(web::PayloadConfig::new(max_payload_bytes))
    })
    .listen(listener)?
    .run();

    Ok(server)
}

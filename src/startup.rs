use std::net::TcpListener;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    configuration::ApplicationSettings,
    routes::{default_route, scrape_route},
    services::{Droid, LinkedinScraper},
};

pub fn run(
    listener: TcpListener,
    settings: ApplicationSettings,
    droid: Droid,
    scraper: LinkedinScraper,
) -> Result<Server, std::io::Error> {
    let settings = web::Data::new(settings);
    let droid = web::Data::new(droid);
    let scraper = web::Data::new(scraper);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::default)
            .service(default_route::health)
            .service(scrape_route::scrape)
            .app_data(settings.clone())
            .app_data(droid.clone())
            .app_data(scraper.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

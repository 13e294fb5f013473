use std::net::TcpListener;

use env_logger::Env;
use viper::{
    configuration::get_configuration,
    services::{Droid, LinkedinScraper},
    startup::run,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(configuration.application.port);
    let address = format!("{}:{}", configuration.application.host, port);
    let listener = TcpListener::bind(address)?;

    let droid = Droid::new(configuration.webdriver.clone());
    let scraper = LinkedinScraper::new(&configuration.scraper)
        .expect("Failed to build the scraper from configuration.");

    log::info!("Listening on port {}", port);

    run(listener, configuration.application, droid, scraper)?.await
}

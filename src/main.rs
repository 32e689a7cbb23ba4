mod config;
mod disease;
mod error;
mod inference;
mod routes;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use config::AppConfig;
use disease::DiseaseRegistry;
use inference::model::PlantModel;
use routes::configure_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    log::info!(
        "Loading {} model from {}",
        config.variant,
        config.model_path
    );

    let model = match PlantModel::load(config.variant, &config.model_path) {
        Ok(model) => model,
        Err(e) => {
            log::error!("Failed to load model at startup: {e}");
            return Err(std::io::Error::other(format!("Model loading failed: {e}")));
        }
    };

    let registry = match DiseaseRegistry::load(&config.data_path) {
        Ok(registry) => registry,
        Err(e) => {
            log::error!("Failed to load disease data from {}: {e}", config.data_path);
            return Err(std::io::Error::other(format!(
                "Disease data loading failed: {e}"
            )));
        }
    };
    log::info!("Loaded {} disease records", registry.len());

    let bind_address = format!("0.0.0.0:{}", config.port);
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(model.clone()))
            .app_data(web::Data::new(registry.clone()))
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}

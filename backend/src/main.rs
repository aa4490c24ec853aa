mod analysis;
mod routes;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use analysis::service::{AnalysisService, ProviderCredentials};
use routes::configure_routes;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let credentials = ProviderCredentials::from_env();
    if credentials.groq_api_key.is_none() {
        log::warn!("GROQ_API_KEY is not set; vision analysis is disabled.");
    }
    if credentials.gemini_api_key.is_none() {
        log::warn!("GEMINI_API_KEY is not set; detail enrichment will use Groq only.");
    }

    let service = AnalysisService::new(&credentials);

    let port = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let bind_address = format!("0.0.0.0:{}", port);

    log::info!("Starting plant analysis server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::AUTHORIZATION,
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(service.clone()))
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use opensplit::{
    api,
    config::Config,
    store::{GroupStore, MongoStore},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|err| std::io::Error::other(err.to_string()))?;
    let store = match &config.mongodb_uri {
        Some(uri) => {
            log::info!("Using MongoDB database {}", config.database);
            let store = MongoStore::connect(uri, &config.database)
                .await
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            GroupStore::Mongo(store)
        }
        None => {
            log::warn!("MONGODB_URI not set, groups are kept in memory");
            GroupStore::in_memory()
        }
    };
    let store = web::Data::new(store);

    log::info!("Listening on {}:{}", config.host, config.port);
    let cors_origin = config.cors_origin.clone();
    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header(),
            None => Cors::permissive(),
        };
        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(store.clone())
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

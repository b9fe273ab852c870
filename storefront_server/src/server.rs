use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use storefront_engine::{NotificationApi, OrderLifecycleApi, RecommendationApi, SqliteDatabase};

use crate::{
    amqp::AmqpBroker,
    config::ServerConfig,
    errors::ServerError,
    routes::configure_api,
    users::UserServiceClient,
    workers::{
        start_notification_consumer,
        start_order_lifecycle_worker,
        start_recommendation_consumer,
        start_recommendation_sweep_worker,
    },
};

/// Connects the database, starts the background workers, and serves the REST API until the server
/// is shut down.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🗃️ Database ready at {}", db.url());

    let broker = AmqpBroker::new(config.amqp.clone());
    let users = UserServiceClient::new(&config.user_service_url);

    let orders_api = OrderLifecycleApi::new(db.clone(), broker.clone());
    let recommendations_api = RecommendationApi::new(db.clone(), broker.clone(), users.clone());
    let notifications_api = NotificationApi::new(db.clone());
    start_order_lifecycle_worker(orders_api, config.order_advance_interval);
    start_recommendation_sweep_worker(recommendations_api.clone(), config.recommendation_sweep_interval);
    start_recommendation_consumer(broker.clone(), recommendations_api);
    start_notification_consumer(broker.clone(), notifications_api);

    let srv = create_server_instance(config, db, broker, users)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Builds the HTTP server. Workers are the caller's concern; this only wires the REST surface.
pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    broker: AmqpBroker,
    users: UserServiceClient,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let orders_api = OrderLifecycleApi::new(db.clone(), broker.clone());
        let recommendations_api = RecommendationApi::new(db.clone(), broker.clone(), users.clone());
        let notifications_api = NotificationApi::new(db.clone());
        let json_config = web::JsonConfig::default()
            .error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("sfs::access_log"))
            .app_data(json_config)
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(recommendations_api))
            .app_data(web::Data::new(notifications_api))
            .configure(configure_api::<AmqpBroker, UserServiceClient>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

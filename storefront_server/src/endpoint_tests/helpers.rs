use std::collections::HashMap;

use actix_web::{http::StatusCode, middleware::Logger, test, test::TestRequest, web, App};
use storefront_common::UserProfile;
use storefront_engine::{
    broker::MemoryBroker,
    test_utils::{memory_db, prepare_test_env},
    traits::{UserDirectory, UserDirectoryError},
    NotificationApi,
    OrderLifecycleApi,
    RecommendationApi,
    SqliteDatabase,
};

use crate::{errors::ServerError, routes::configure_api};

/// A canned user directory so endpoint tests never need a live user service.
#[derive(Clone, Default)]
pub struct StubDirectory {
    profiles: HashMap<i64, UserProfile>,
}

impl UserDirectory for StubDirectory {
    async fn fetch_profile(&self, user_id: i64) -> Result<UserProfile, UserDirectoryError> {
        self.profiles.get(&user_id).cloned().ok_or(UserDirectoryError::UserNotFound(user_id))
    }

    async fn fetch_all_profiles(&self) -> Result<Vec<UserProfile>, UserDirectoryError> {
        Ok(self.profiles.values().cloned().collect())
    }
}

/// Everything a test needs to issue requests and then assert against storage and the broker.
pub struct TestState {
    pub db: SqliteDatabase,
    pub broker: MemoryBroker,
    pub directory: StubDirectory,
}

impl TestState {
    pub async fn new() -> Self {
        prepare_test_env();
        Self { db: memory_db().await, broker: MemoryBroker::new(), directory: StubDirectory::default() }
    }

    pub fn orders_api(&self) -> OrderLifecycleApi<SqliteDatabase, MemoryBroker> {
        OrderLifecycleApi::new(self.db.clone(), self.broker.clone())
    }

    pub fn recommendations_api(&self) -> RecommendationApi<SqliteDatabase, MemoryBroker, StubDirectory> {
        RecommendationApi::new(self.db.clone(), self.broker.clone(), self.directory.clone())
    }

    pub fn notifications_api(&self) -> NotificationApi<SqliteDatabase> {
        NotificationApi::new(self.db.clone())
    }
}

/// Builds the full application, runs one request against it, and returns the status and raw body.
pub async fn request(state: &TestState, req: TestRequest) -> (StatusCode, String) {
    let json_config =
        web::JsonConfig::default().error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into());
    let app = App::new()
        .wrap(Logger::default())
        .app_data(json_config)
        .app_data(web::Data::new(state.orders_api()))
        .app_data(web::Data::new(state.recommendations_api()))
        .app_data(web::Data::new(state.notifications_api()))
        .configure(configure_api::<MemoryBroker, StubDirectory>);
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    (status, body)
}

pub async fn get(state: &TestState, path: &str) -> (StatusCode, String) {
    request(state, TestRequest::get().uri(path)).await
}

pub async fn post_json(state: &TestState, path: &str, body: serde_json::Value) -> (StatusCode, String) {
    request(state, TestRequest::post().uri(path).set_json(body)).await
}

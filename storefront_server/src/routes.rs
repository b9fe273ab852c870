//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two MUST go into
//! a separate module. Keep this module neat and tidy 🙏
//!
//! Actix cannot register generic handlers through the attribute macros, so the handlers are plain
//! async functions and [`configure_api`] wires them up with the concrete broker and user-directory
//! types the caller chose. Production uses the AMQP broker and the reqwest client; the endpoint
//! tests swap in the in-process broker and a canned directory.

use actix_web::{web, HttpResponse, Responder};
use log::*;
use storefront_engine::{
    broker::MessageBroker,
    traits::UserDirectory,
    NotificationApi,
    OrderLifecycleApi,
    RecommendationApi,
    SqliteDatabase,
};

use crate::{
    data_objects::{PlaceOrderRequest, RecommendRequest},
    errors::ServerError,
};

pub fn configure_api<B, U>(cfg: &mut web::ServiceConfig)
where
    B: MessageBroker,
    U: UserDirectory + Send + Sync + 'static,
{
    cfg.service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/order").route(web::post().to(place_order::<B>)))
        .service(web::resource("/orders/{user_id}").route(web::get().to(orders_for_user::<B>)))
        .service(web::resource("/recommend/{user_id}").route(web::post().to(recommend::<B, U>)))
        .service(web::resource("/recommendations/{user_id}").route(web::get().to(recommendations_for_user::<B, U>)))
        .service(web::resource("/notifications/unread/{user_id}").route(web::get().to(unread_notifications)))
        .service(web::resource("/notifications/mark-read/{id}").route(web::post().to(mark_notification_read)));
}

pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

pub async fn place_order<B: MessageBroker>(
    api: web::Data<OrderLifecycleApi<SqliteDatabase, B>>,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, ServerError> {
    let order = api.place_order(body.user_id).await?;
    // Existing REST consumers check for a plain 200 on this route.
    Ok(HttpResponse::Ok().json(order))
}

pub async fn orders_for_user<B: MessageBroker>(
    api: web::Data<OrderLifecycleApi<SqliteDatabase, B>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServerError> {
    let orders = api.orders_for_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

pub async fn recommend<B, U>(
    api: web::Data<RecommendationApi<SqliteDatabase, B, U>>,
    path: web::Path<i64>,
    body: web::Json<RecommendRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: MessageBroker,
    U: UserDirectory + Send + Sync + 'static,
{
    let body = body.into_inner();
    let recommendation = api.recommend(path.into_inner(), body.product_id, &body.reason).await?;
    Ok(HttpResponse::Ok().json(recommendation))
}

pub async fn recommendations_for_user<B, U>(
    api: web::Data<RecommendationApi<SqliteDatabase, B, U>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServerError>
where
    B: MessageBroker,
    U: UserDirectory + Send + Sync + 'static,
{
    let recommendations = api.recommendations_for_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(recommendations))
}

pub async fn unread_notifications(
    api: web::Data<NotificationApi<SqliteDatabase>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServerError> {
    let notifications = api.unread_for_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(notifications))
}

pub async fn mark_notification_read(
    api: web::Data<NotificationApi<SqliteDatabase>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServerError> {
    let notification = api.mark_read(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(notification))
}

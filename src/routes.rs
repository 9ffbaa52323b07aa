// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{config::AppState, docs, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/{id}/role", put(handlers::auth::update_user_role));

    let anexo_routes = Router::new()
        .route("/"
               ,post(handlers::anexos::create_anexo)
               .get(handlers::anexos::list_anexos)
        );

    let member_routes = Router::new()
        .route("/"
               ,post(handlers::members::create_member)
               .get(handlers::members::list_members)
        )
        .route("/{id}"
               ,get(handlers::members::get_member)
               .put(handlers::members::update_member)
               .delete(handlers::members::delete_member)
        )
        .route("/{id}/indicators", post(handlers::members::refresh_member_indicators))
        .route("/{id}/ministries/{ministry_id}"
               ,put(handlers::members::join_ministry)
               .delete(handlers::members::leave_ministry)
        );

    let ministry_routes = Router::new()
        .route("/"
               ,post(handlers::ministries::create_ministry)
               .get(handlers::ministries::list_ministries)
        )
        .route("/{id}/members", get(handlers::ministries::list_ministry_members));

    let event_routes = Router::new()
        .route("/"
               ,post(handlers::events::create_event)
               .get(handlers::events::list_events)
        )
        .route("/{id}/attendance"
               ,get(handlers::events::list_attendance)
               .put(handlers::events::set_attendance)
        )
        .route("/{id}/attendance/{member_id}", delete(handlers::events::clear_attendance));

    let finance_routes = Router::new()
        .route("/transactions"
               ,post(handlers::finance::create_transaction)
               .get(handlers::finance::list_transactions)
        )
        .route("/transactions/{id}", delete(handlers::finance::delete_transaction));

    let intercession_routes = Router::new()
        .route("/logs"
               ,post(handlers::intercession::create_log)
               .get(handlers::intercession::list_logs)
        )
        .route("/logs/{id}", delete(handlers::intercession::delete_log));

    let mission_routes = Router::new()
        .route("/"
               ,post(handlers::missions::create_trip)
               .get(handlers::missions::list_trips)
        )
        .route("/{id}/participants", post(handlers::missions::propose_participant))
        .route("/{id}/participants/{member_id}", put(handlers::missions::update_participant));

    let epmi_routes = Router::new()
        .route("/enrollments"
               ,post(handlers::epmi::enroll)
               .get(handlers::epmi::list_enrollments)
        )
        .route("/enrollments/{id}/status", put(handlers::epmi::update_enrollment_status));

    let indicator_routes = Router::new()
        .route("/recompute", post(handlers::indicators::recompute_all))
        .route("/summary", get(handlers::indicators::get_summary));

    // Tudo aqui exige Bearer válido
    let protected = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/anexos", anexo_routes)
        .nest("/api/members", member_routes)
        .nest("/api/ministries", ministry_routes)
        .nest("/api/events", event_routes)
        .nest("/api/finance", finance_routes)
        .nest("/api/intercession", intercession_routes)
        .nest("/api/missions", mission_routes)
        .nest("/api/epmi", epmi_routes)
        .nest("/api/indicators", indicator_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/permissions", get(handlers::rbac::list_permissions))
        .route("/api/docs/openapi.json", get(docs::openapi_json))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    // Nenhuma destas rotas chega a tocar no banco
    fn app() -> Router {
        let settings = Settings {
            database_url: "postgres://localhost/chms_test".into(),
            jwt_secret: "segredo-de-teste".into(),
            bind_addr: "127.0.0.1:0".into(),
            db_max_connections: 1,
            bootstrap_admin_email: None,
            indicator_sweep_secs: 0,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy(&settings.database_url)
            .expect("url válida");
        build_router(AppState::with_pool(pool, settings))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn protected_route_without_token_is_unauthorized() {
        let response = app()
            .oneshot(Request::get("/api/members").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Missing or invalid authentication token.");
    }

    #[tokio::test]
    async fn bad_token_error_follows_accept_language() {
        let request = Request::get("/api/indicators/summary")
            .header(header::AUTHORIZATION, "Bearer isto-nao-e-um-jwt")
            .header(header::ACCEPT_LANGUAGE, "pt-BR,pt;q=0.9")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Token de autenticação inválido ou ausente.");
    }

    #[tokio::test]
    async fn permissions_table_lists_every_role() {
        let response = app()
            .oneshot(Request::get("/api/permissions").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let roles = body.as_array().unwrap();
        assert_eq!(roles.len(), 6);
        assert_eq!(roles[0]["role"], "ADMIN");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let response = app()
            .oneshot(Request::get("/api/docs/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["paths"]["/api/members/{id}/indicators"].is_object());
        assert!(body["components"]["securitySchemes"]["api_jwt"].is_object());
    }
}

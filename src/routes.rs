// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::AppState, handlers, middleware::auth::auth_guard};

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK", "timestamp": Utc::now() }))
}

/// Todas as rotas que exigem `Authorization: Bearer <token>`.
pub fn protected_routes() -> Router<AppState> {
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route(
            "/profile",
            get(handlers::auth::get_profile).put(handlers::auth::update_profile),
        )
        .route("/change-password", put(handlers::auth::change_password))
        .route("/users", get(handlers::auth::list_users))
        .route("/users/{id}", put(handlers::auth::update_user));

    let client_routes = Router::new()
        .route(
            "/",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route("/email/{email}", get(handlers::clients::get_client_by_email))
        .route("/cpf/{cpf}", get(handlers::clients::get_client_by_cpf))
        .route(
            "/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        .route("/{id}/restore", post(handlers::clients::restore_client));

    let vehicle_routes = Router::new()
        .route(
            "/",
            get(handlers::vehicles::list_vehicles).post(handlers::vehicles::create_vehicle),
        )
        .route("/client/{client_id}", get(handlers::vehicles::list_vehicles_by_client))
        .route("/plate/{plate}", get(handlers::vehicles::get_vehicle_by_plate))
        .route(
            "/{id}",
            get(handlers::vehicles::get_vehicle)
                .put(handlers::vehicles::update_vehicle)
                .delete(handlers::vehicles::delete_vehicle),
        )
        .route("/{id}/restore", post(handlers::vehicles::restore_vehicle));

    let employee_routes = Router::new()
        .route(
            "/",
            get(handlers::employees::list_employees).post(handlers::employees::create_employee),
        )
        .route("/role/{role}", get(handlers::employees::list_employees_by_role))
        .route(
            "/{id}",
            get(handlers::employees::get_employee)
                .put(handlers::employees::update_employee)
                .delete(handlers::employees::delete_employee),
        )
        .route("/{id}/restore", post(handlers::employees::restore_employee));

    let service_routes = Router::new()
        .route(
            "/",
            get(handlers::services::list_services).post(handlers::services::create_service),
        )
        .route(
            "/{id}",
            get(handlers::services::get_service)
                .put(handlers::services::update_service)
                .delete(handlers::services::delete_service),
        )
        .route("/{id}/restore", post(handlers::services::restore_service));

    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route("/{id}/movements", post(handlers::products::add_stock_movement))
        .route("/{id}/restore", post(handlers::products::restore_product));

    let sale_routes = Router::new()
        .route(
            "/",
            get(handlers::sales::list_sales).post(handlers::sales::create_sale),
        )
        .route("/date-range", get(handlers::sales::list_sales_by_date_range))
        .route("/status/{status}", get(handlers::sales::list_sales_by_status))
        .route("/client/{client_id}", get(handlers::sales::list_sales_by_client))
        .route(
            "/{id}",
            get(handlers::sales::get_sale)
                .put(handlers::sales::update_sale)
                .delete(handlers::sales::delete_sale),
        );

    let ticket_routes = Router::new()
        .route(
            "/",
            get(handlers::tickets::list_tickets).post(handlers::tickets::create_ticket),
        )
        .route("/status/{status}", get(handlers::tickets::list_tickets_by_status))
        .route("/client/{client_id}", get(handlers::tickets::list_tickets_by_client))
        .route(
            "/{id}",
            get(handlers::tickets::get_ticket)
                .put(handlers::tickets::update_ticket)
                .delete(handlers::tickets::delete_ticket),
        );

    let payment_routes = Router::new()
        .route(
            "/",
            get(handlers::payments::list_payments).post(handlers::payments::create_payment),
        )
        .route("/status/{status}", get(handlers::payments::list_payments_by_status))
        .route("/client/{client_id}", get(handlers::payments::list_payments_by_client))
        .route("/service/{service_id}", get(handlers::payments::list_payments_by_service))
        .route(
            "/{id}",
            get(handlers::payments::get_payment)
                .put(handlers::payments::update_payment)
                .delete(handlers::payments::delete_payment),
        );

    let invoice_routes = Router::new()
        .route(
            "/",
            get(handlers::invoices::list_invoices).post(handlers::invoices::create_invoice),
        )
        .route("/number/{number}", get(handlers::invoices::get_invoice_by_number))
        .route("/status/{status}", get(handlers::invoices::list_invoices_by_status))
        .route("/client/{client_id}", get(handlers::invoices::list_invoices_by_client))
        .route(
            "/{id}",
            get(handlers::invoices::get_invoice)
                .put(handlers::invoices::update_invoice)
                .delete(handlers::invoices::delete_invoice),
        );

    let financial_routes = Router::new()
        .route(
            "/",
            get(handlers::financials::list_financials).post(handlers::financials::create_financial),
        )
        .route("/status/{status}", get(handlers::financials::list_financials_by_status))
        .route("/report/{year}/{month}", get(handlers::financials::monthly_report))
        .route(
            "/{id}",
            get(handlers::financials::get_financial)
                .put(handlers::financials::update_financial)
                .delete(handlers::financials::delete_financial),
        );

    Router::new()
        .nest("/auth", auth_routes)
        .nest("/clients", client_routes)
        .nest("/vehicles", vehicle_routes)
        .nest("/employees", employee_routes)
        .nest("/services", service_routes)
        .nest("/products", product_routes)
        .nest("/sales", sale_routes)
        .nest("/tickets", ticket_routes)
        .nest("/payments", payment_routes)
        .nest("/invoices", invoice_routes)
        .nest("/financials", financial_routes)
}

pub fn app(app_state: AppState) -> Router {
    let protected = protected_routes().route_layer(axum_middleware::from_fn_with_state(
        app_state.clone(),
        auth_guard,
    ));

    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(handlers::auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Extension,
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use sqlx::{postgres::PgPoolOptions, PgPool};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{
        config::Config,
        models::{auth::User, rbac::UserRole},
        services::auth::issue_token,
    };

    const SECRET: &str = "segredo-de-teste";

    fn state_with(pool: PgPool) -> AppState {
        let config = Config {
            database_url: "postgres://localhost/autocentro_test".into(),
            jwt_secret: SECRET.into(),
            jwt_expiration_hours: 24,
            bcrypt_cost: 4,
            port: 0,
            admin: None,
        };
        AppState::new(pool, &config)
    }

    // Pool sem conexão: as rotas testadas aqui não chegam ao banco.
    fn test_state() -> AppState {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/autocentro_test")
            .unwrap();
        state_with(pool)
    }

    fn user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "operador".into(),
            email: "operador@oficina.com".into(),
            password_hash: String::new(),
            role,
            employee_id: None,
            is_active: true,
            last_login: None,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    // Rotas protegidas com o usuário já autenticado (sem passar pelo JWT).
    fn app_as(role: UserRole) -> Router {
        protected_routes()
            .layer(Extension(user(role)))
            .with_state(test_state())
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let resp = app(test_state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "OK");
    }

    #[tokio::test]
    async fn protected_route_without_token_is_401() {
        let resp = app(test_state())
            .oneshot(Request::builder().uri("/clients").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(body_json(resp).await["message"].is_string());
    }

    #[tokio::test]
    async fn basic_auth_header_is_401() {
        let req = Request::builder()
            .uri("/sales")
            .header("authorization", "Basic YWRtaW46YWRtaW4=")
            .body(Body::empty())
            .unwrap();
        let resp = app(test_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_401() {
        let token = issue_token("outro-segredo", &user(UserRole::Admin), 24).unwrap();
        let req = Request::builder()
            .uri("/clients")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let resp = app(test_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_with_empty_fields_is_400_with_field_list() {
        let resp = app(test_state())
            .oneshot(json_request("POST", "/auth/login", r#"{"username":"","password":""}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body_json(resp).await;
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["password", "username"]);
    }

    #[tokio::test]
    async fn malformed_json_uses_error_envelope() {
        let resp = app_as(UserRole::Admin)
            .oneshot(json_request("POST", "/clients", "{ nao e json"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["errors"][0]["field"], "body");
    }

    #[tokio::test]
    async fn employee_cannot_create_clients() {
        let resp = app_as(UserRole::Employee)
            .oneshot(json_request("POST", "/clients", r#"{"fullName":"Maria"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn employee_cannot_register_users() {
        let body = r#"{"username":"novo","email":"novo@oficina.com","password":"Senha1"}"#;
        let resp = app_as(UserRole::Employee)
            .oneshot(json_request("POST", "/auth/register", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(resp).await["message"],
            "Acesso restrito a administradores"
        );
    }

    #[tokio::test]
    async fn employee_cannot_touch_financials_or_reports() {
        let app = app_as(UserRole::Employee);

        let list = Request::builder().uri("/financials").body(Body::empty()).unwrap();
        let resp = app.clone().oneshot(list).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let report = Request::builder()
            .uri("/financials/report/2024/5")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(report).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn employee_cannot_read_deleted_records() {
        let uri = format!("/clients/{}?includeDeleted=true", Uuid::new_v4());
        let resp = app_as(UserRole::Employee)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn employee_cannot_restore() {
        let uri = format!("/products/{}/restore", Uuid::new_v4());
        let resp = app_as(UserRole::Employee)
            .oneshot(Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn invalid_sale_item_is_reported_with_its_index() {
        let body = format!(
            r#"{{"clientId":"{}","vehicleId":"{}","items":[{{"serviceId":"{}","quantity":0,"unitPrice":10}}]}}"#,
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let resp = app_as(UserRole::Admin)
            .oneshot(json_request("POST", "/sales", &body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["errors"][0]["field"], "items[0].quantity");
    }

    #[tokio::test]
    async fn unknown_status_label_is_400() {
        let resp = app_as(UserRole::Admin)
            .oneshot(Request::builder().uri("/tickets/status/Perdido").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["errors"][0]["field"], "status");
    }

    #[tokio::test]
    async fn fractional_cents_and_huge_amounts_are_400() {
        for amount in ["0.333", "79228162514264337593543950335"] {
            let body = format!(r#"{{"baseAmount":"{amount}","quantity":2}}"#);
            let resp = app_as(UserRole::Admin)
                .oneshot(json_request("POST", "/payments", &body))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(resp).await["errors"][0]["field"], "baseAmount");
        }
    }

    // ------------------------------------------------------------------
    //  Com banco (cada teste recebe um banco novo com as migrations)
    // ------------------------------------------------------------------

    const ADMIN_PASSWORD: &str = "Admin123";

    async fn admin_token(state: &AppState) -> String {
        state
            .auth_service
            .ensure_admin("admin", "admin@oficina.com", ADMIN_PASSWORD)
            .await
            .unwrap();
        state
            .auth_service
            .login("admin", ADMIN_PASSWORD)
            .await
            .unwrap()
            .token
    }

    fn authed(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"));
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app(state.clone()).oneshot(req).await.unwrap();
        let status = resp.status();
        (status, body_json(resp).await)
    }

    fn client_body(email: &str) -> Value {
        serde_json::json!({
            "fullName": "Maria Souza",
            "email": email,
            "phone": "(11) 98765-4321",
            "address": "Rua das Oficinas, 100"
        })
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn deleted_client_leaves_reads_and_second_delete_is_404(pool: PgPool) {
        let state = state_with(pool);
        let token = admin_token(&state).await;

        let (status, body) = send(&state, authed("POST", "/clients", &token, Some(client_body("maria@cliente.com")))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["data"]["id"].as_str().unwrap().to_string();
        let uri = format!("/clients/{id}");

        let (status, _) = send(&state, authed("DELETE", &uri, &token, None)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&state, authed("DELETE", &uri, &token, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&state, authed("GET", &uri, &token, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Cliente não encontrado");

        let (_, body) = send(&state, authed("GET", "/clients", &token, None)).await;
        assert!(body["data"].as_array().unwrap().iter().all(|c| c["id"] != id.as_str()));

        // auditoria do admin ainda enxerga o registro
        let audit = format!("{uri}?includeDeleted=true");
        let (status, body) = send(&state, authed("GET", &audit, &token, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["deleted"], true);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn duplicate_client_email_is_409_on_email(pool: PgPool) {
        let state = state_with(pool);
        let token = admin_token(&state).await;

        let (status, first) = send(&state, authed("POST", "/clients", &token, Some(client_body("dup@cliente.com")))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&state, authed("POST", "/clients", &token, Some(client_body("DUP@cliente.com")))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["errors"][0]["field"], "email");

        // o índice único só vale para registros ativos
        let uri = format!("/clients/{}", first["data"]["id"].as_str().unwrap());
        send(&state, authed("DELETE", &uri, &token, None)).await;
        let (status, _) = send(&state, authed("POST", "/clients", &token, Some(client_body("dup@cliente.com")))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn login_returns_token_and_hides_password_hash(pool: PgPool) {
        let state = state_with(pool);
        admin_token(&state).await;

        let login = |username: &str, password: &str| {
            json_request(
                "POST",
                "/auth/login",
                &serde_json::json!({ "username": username, "password": password }).to_string(),
            )
        };

        let (status, body) = send(&state, login("admin", ADMIN_PASSWORD)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["data"]["token"].as_str().unwrap().is_empty());
        assert_eq!(body["data"]["user"]["role"], "admin");
        assert_eq!(body["data"]["user"]["permissions"]["canManageEmployees"], true);
        assert!(body["data"]["user"].get("passwordHash").is_none());

        let (status, wrong_password) = send(&state, login("admin", "Errada123")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, unknown_user) = send(&state, login("fantasma", ADMIN_PASSWORD)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password, unknown_user);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn invoices_are_numbered_in_sequence(pool: PgPool) {
        let state = state_with(pool);
        let token = admin_token(&state).await;

        let (_, client) = send(&state, authed("POST", "/clients", &token, Some(client_body("nf@cliente.com")))).await;
        let employee = serde_json::json!({ "name": "João Lima", "role": "Gerente" });
        let (status, employee) = send(&state, authed("POST", "/employees", &token, Some(employee))).await;
        assert_eq!(status, StatusCode::CREATED);

        let invoice = serde_json::json!({
            "clientId": client["data"]["id"],
            "employeeId": employee["data"]["id"],
            "paymentMethod": "PIX",
            "items": [{ "description": "Troca de óleo", "quantity": 1, "unitPrice": "120.00" }]
        });

        let mut numbers = Vec::new();
        for _ in 0..2 {
            let (status, body) = send(&state, authed("POST", "/invoices", &token, Some(invoice.clone()))).await;
            assert_eq!(status, StatusCode::CREATED);
            numbers.push(body["data"]["number"].as_str().unwrap().to_string());
        }
        assert_eq!(numbers, vec!["000001", "000002"]);

        let (_, list) = send(&state, authed("GET", "/invoices", &token, None)).await;
        assert_eq!(list["data"][0]["number"], "000002");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn stored_payment_keeps_total_consistent(pool: PgPool) {
        let state = state_with(pool);
        let token = admin_token(&state).await;

        let payment = serde_json::json!({ "baseAmount": "33.33", "quantity": 3, "discount": "0.99" });
        let (status, body) = send(&state, authed("POST", "/payments", &token, Some(payment))).await;
        assert_eq!(status, StatusCode::CREATED);

        let id = body["data"]["id"].as_str().unwrap();
        let (_, body) = send(&state, authed("GET", &format!("/payments/{id}"), &token, None)).await;
        let stored = &body["data"];
        let base: f64 = stored["baseAmount"].as_f64().unwrap();
        let discount: f64 = stored["discount"].as_f64().unwrap();
        let total: f64 = stored["totalAmount"].as_f64().unwrap();
        assert!((total - (base * 3.0 - discount)).abs() < 0.01);
        assert!((total - 99.0).abs() < 0.001);
    }
}

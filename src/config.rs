// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::services::{
    auth::AuthService, catalog_service::CatalogService, client_service::ClientService,
    employee_service::EmployeeService, financial_service::FinancialService,
    invoice_service::InvoiceService, payment_service::PaymentService,
    product_service::ProductService, sale_service::SaleService, ticket_service::TicketService,
    vehicle_service::VehicleService,
};

/// Administrador criado na subida quando não existe nenhum ativo.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
    pub port: u16,
    pub admin: Option<BootstrapAdmin>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let jwt_expiration_hours = parse_var("JWT_EXPIRATION_HOURS", 24)?;
        let bcrypt_cost = parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        let port = parse_var("PORT", 3000)?;

        let admin = match (
            env::var("ADMIN_USERNAME"),
            env::var("ADMIN_EMAIL"),
            env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(email), Ok(password)) => Some(BootstrapAdmin {
                username,
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration_hours,
            bcrypt_cost,
            port,
            admin,
        })
    }

    pub async fn connect(&self) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&self.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(pool)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{name} inválido: {raw}")),
        Err(_) => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub client_service: ClientService,
    pub vehicle_service: VehicleService,
    pub employee_service: EmployeeService,
    pub catalog_service: CatalogService,
    pub product_service: ProductService,
    pub sale_service: SaleService,
    pub ticket_service: TicketService,
    pub payment_service: PaymentService,
    pub invoice_service: InvoiceService,
    pub financial_service: FinancialService,
}

impl AppState {
    pub fn new(db_pool: PgPool, config: &Config) -> Self {
        Self {
            auth_service: AuthService::new(
                db_pool.clone(),
                config.jwt_secret.clone(),
                config.jwt_expiration_hours,
                config.bcrypt_cost,
            ),
            client_service: ClientService::new(db_pool.clone()),
            vehicle_service: VehicleService::new(db_pool.clone()),
            employee_service: EmployeeService::new(db_pool.clone()),
            catalog_service: CatalogService::new(db_pool.clone()),
            product_service: ProductService::new(db_pool.clone()),
            sale_service: SaleService::new(db_pool.clone()),
            ticket_service: TicketService::new(db_pool.clone()),
            payment_service: PaymentService::new(db_pool.clone()),
            invoice_service: InvoiceService::new(db_pool.clone()),
            financial_service: FinancialService::new(db_pool),
        }
    }
}

pub mod auth;
pub mod pricing;

pub mod catalog_service;
pub mod client_service;
pub mod employee_service;
pub mod financial_service;
pub mod invoice_service;
pub mod payment_service;
pub mod product_service;
pub mod sale_service;
pub mod ticket_service;
pub mod vehicle_service;

pub mod soft_delete;
pub use soft_delete::{SoftDeletable, SoftDeleteRepository};

pub mod user_repo;
pub use user_repo::UserRepository;
pub mod employee_repo;
pub use employee_repo::EmployeeRepository;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod vehicle_repo;
pub use vehicle_repo::VehicleRepository;
pub mod service_repo;
pub use service_repo::ServiceRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod sale_repo;
pub use sale_repo::SaleRepository;
pub mod ticket_repo;
pub use ticket_repo::TicketRepository;
pub mod invoice_repo;
pub use invoice_repo::InvoiceRepository;
pub mod financial_repo;
pub use financial_repo::FinancialRepository;

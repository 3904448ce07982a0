pub mod auth;
pub mod client;
pub mod employee;
pub mod financial;
pub mod invoice;
pub mod payment;
pub mod product;
pub mod rbac;
pub mod sale;
pub mod service;
pub mod ticket;
pub mod vehicle;

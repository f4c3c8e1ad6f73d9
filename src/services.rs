pub mod catalog_service;
pub mod client_service;
pub mod pack_service;
pub mod payment_service;

pub use catalog_service::CatalogService;
pub use client_service::ClientService;
pub use pack_service::PackService;
pub use payment_service::PaymentService;

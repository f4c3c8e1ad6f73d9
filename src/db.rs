pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod pack_repo;
pub use pack_repo::PackRepository;

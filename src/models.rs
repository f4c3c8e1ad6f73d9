pub mod catalog;
pub mod clients;
pub mod packs;
pub mod payments;

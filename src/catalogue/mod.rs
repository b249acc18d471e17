pub mod client;

pub use client::CatalogueClient;

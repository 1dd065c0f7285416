pub mod sparql;
pub mod client;

pub use client::WikidataClient;

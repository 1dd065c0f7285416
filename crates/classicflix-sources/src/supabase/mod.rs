//! Supabase catalog store: PostgREST tables plus GoTrue auth.

pub mod api;
pub mod auth;
pub mod client;
pub mod normalize;

pub use api::MovieUpdates;
pub use client::SupabaseClient;

//! Admin console core for the streaming marketplace.
//!
//! ARCHITECTURE
//! ============
//! One process-wide [`session::SessionStore`] holds the admin's token and
//! profile. The [`api::ApiClient`] reads it on every request and clears it
//! when the backend answers 401, asking its [`routes::Navigator`] to go to
//! the login page. Pages in [`pages`] fetch collections through the
//! client, filter them locally, and apply mutations only after the server
//! confirms them. [`routes::guard`] decides whether a route renders or
//! redirects.

pub mod api;
pub mod config;
pub mod filter;
pub mod models;
pub mod pages;
pub mod routes;
pub mod session;

#[cfg(test)]
mod testing;

//! # microblog
//!
//! A single-author blog. The author logs in and posts short entries;
//! anyone can read them, newest first.
//!
//! Routing, sessions, and templating are delegated to `axum`,
//! `tower-sessions`, and `askama`. The crate itself owns the request-scoped
//! connection lifecycle and the entry storage contract.
//!
//! ## Architecture
//!
//! ```text
//! Browser (HTML forms, session cookie)
//!     │
//!     ├── TraceLayer → SessionManagerLayer → connection_scope (web/)
//!     │
//!     ├── Handlers: list, add, login, logout, health (web/handlers/)
//!     ├── Session flag + flash messages (auth/)
//!     │
//!     ├── EntryStore (persistence/)
//!     │
//!     └── SQLite, one connection per request
//! ```

pub mod app_state;
pub mod auth;
pub mod config;
pub mod error;
pub mod persistence;
pub mod web;

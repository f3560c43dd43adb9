//! Persistence layer: the SQLite entry store.
//!
//! [`Database`] opens one connection per request; [`EntryStore`] runs the
//! entry statements against whichever connection it is handed. The schema
//! is applied only by the explicit `init-db` administrative command.

pub mod connection;
pub mod entries;
pub mod models;
pub mod schema;

pub use connection::{ConnectionStats, Database, LeasedConnection};
pub use entries::EntryStore;
pub use models::{Entry, NewEntry};

//! # Management Module
//!
//! Local persistence of application state. The only state tidl keeps between
//! runs is the login session, stored as JSON under
//! `<data_local_dir>/tidl/cache/session.json`.

mod session;

pub use session::SessionManager;

//! Core library modules for the Acces Client application.
//!
//! The update pipeline lives in [`probe`], [`oracle`], [`descriptor`],
//! [`apply`] and [`update`]; everything else is the connection directory
//! (persistence, launching, credentials) and shared plumbing.

pub mod apply;
pub mod config;
pub mod data_storage;
pub mod database;
pub mod descriptor;
pub mod launcher;
pub mod messages;
pub mod oracle;
pub mod probe;
pub mod secret;
pub mod update;
pub mod version;

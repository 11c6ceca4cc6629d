//! Scoped key/value catalogs persisted as JSON.
//!
//! Every catalog item has a global payload and may override it per folder.
//! Lookups from inside a folder tree pick the closest override, so settings
//! follow the directory you are working in.

pub mod action;
pub mod catalog;
pub mod console;
pub mod paths;
pub mod table;

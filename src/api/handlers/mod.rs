//! API handlers for the documentation gateway.
//!
//! `auth` carries the login/session/logout endpoints for both trust domains,
//! `config` the admin panel's configuration surface, and `content` the
//! authenticated markdown delivery path.

pub mod auth;
pub mod config;
pub mod content;
pub mod health;
pub mod root;

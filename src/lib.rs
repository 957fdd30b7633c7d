//! Multi-user resume storage service: registration, login with signed bearer
//! tokens, and per-owner resume CRUD.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod resumes;
pub mod state;
pub mod store;

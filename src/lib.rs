//! Daily Bugle - A small news publishing site
//!
//! This crate serves a list of published articles, per-category listings,
//! single article pages and a form for submitting new articles.

pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod routes;

//! Layered catalog data access with an async command pipeline.
//!
//! Reads go through a [`repository::Repository`] that consults an in-memory
//! cache, a durable local store and a slow authoritative remote service in
//! that order. Operations run as [`pipeline::UseCase`]s, off the caller's
//! context, and report back on it.

pub mod app;
pub mod commands;
pub mod config;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod repository;
pub mod source;
pub mod usecases;

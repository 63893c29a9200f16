//! Ticket checkout service: sells event spots through third-party partner systems
//! and reconciles their reservations into local tickets.

pub mod config;
pub mod handlers;
pub mod models;
pub mod partners;
pub mod repository;
pub mod routes;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test;

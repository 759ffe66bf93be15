pub mod app;
pub mod auth;
pub mod bookings;
pub mod calendars;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod users;

pub(crate) mod validation;

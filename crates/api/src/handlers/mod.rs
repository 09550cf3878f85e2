pub mod admin;
pub mod auth;
pub mod calendar;
pub mod clients;
pub mod dashboard;
pub mod notifications;
pub mod uploads;

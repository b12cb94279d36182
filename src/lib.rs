//! Just In Case — preparedness coach and assistant front end.

pub mod backend;
pub mod channels;
pub mod coach;
pub mod config;
pub mod error;

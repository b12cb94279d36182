//! Terminal front end for the coach and search surfaces.

pub mod cli;

pub use cli::{CliDisplay, CliSession, Flow, Mode};

//! Command-line front end for the expected-yards model.
pub mod commands;
pub mod situation;
pub mod util;

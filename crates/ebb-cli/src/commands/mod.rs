//! Command handlers, one module per subcommand group

pub mod category;
pub mod config;
pub mod item;
pub mod offsets;
pub mod review;
pub mod status;
pub mod translate;
pub mod user;

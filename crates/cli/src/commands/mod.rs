//! CLI commands

pub mod admin;
pub mod device;
pub mod gate;
pub mod init;
pub mod list;
pub mod parse;
pub mod status;
pub mod take;
pub mod upgrade;

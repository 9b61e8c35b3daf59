//! Command implementations that do more than render data.

pub mod init;

#![forbid(unsafe_code)]

pub mod access_log_service;
pub mod sweeper;

#![forbid(unsafe_code)]

pub mod accesslog;

#![deny(unsafe_code)]

pub mod sink;

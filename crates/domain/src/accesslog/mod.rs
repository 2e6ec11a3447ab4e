pub mod entity;
pub mod error;
pub mod query;
pub mod stats;
pub mod store;
pub mod suspicious;
pub mod threat;

pub mod error;
pub mod repo;
pub mod selector;
pub mod service;

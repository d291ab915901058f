// Library for tests to access modules

pub mod aggregation;
pub mod config;
pub mod models;
pub mod node_source;
pub mod routes;
pub mod version;

pub mod connection;
pub mod models;
pub mod products;
pub mod redis;

pub use connection::DbClient;

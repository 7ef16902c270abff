pub mod seed_worker;

pub use seed_worker::{DataSeeder, SeedWorker};

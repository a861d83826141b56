pub mod assistant;
pub mod config;
pub mod frontend;
pub mod retrieval;
pub mod server;

pub use config::Config;
pub use server::start_server;

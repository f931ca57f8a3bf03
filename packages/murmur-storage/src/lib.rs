pub mod agents;
pub mod cache;
pub mod campaigns;
pub mod db;
pub mod hashtags;
pub mod models;
pub mod posts;
pub mod schema;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

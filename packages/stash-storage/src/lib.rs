pub mod blobs;
pub mod db;
pub mod models;
pub mod schema;

mod error;

pub use error::{Error, Result};

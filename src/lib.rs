//! Ingests real-estate listing feeds (XML documents, directories of them, or
//! zip archives) into [`models::Property`] records, moving each feed file
//! through processing, completed and failed directories as it goes.

pub mod error;
pub mod feeds;
pub mod models;

pub use error::{FeedError, Result};

//! Tubely datastore adapters.
//!
//! The ingestion pipelines only need to read a video record and write back its
//! URL fields. [`VideoRepository`] captures that, with a Postgres adapter for
//! deployments and an in-memory adapter for local runs and tests.

pub mod db;

pub use db::{
    InMemoryVideoRepository, PgVideoRepository, RepositoryError, RepositoryResult,
    VideoRepository,
};

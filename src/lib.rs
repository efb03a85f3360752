pub mod error;
pub mod filtering;
pub mod io;
pub mod pipelines;
pub mod scoring;
pub mod urls;

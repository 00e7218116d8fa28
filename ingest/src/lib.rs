//! Network ingestion pipeline: fetch a program page, follow curriculum PDF
//! links, and assemble one [`ProgramRecord`](advisor_core::ProgramRecord)
//! per program key.

pub mod fetch;
pub mod page;
pub mod pdf;
pub mod pipeline;

pub use fetch::http_client;
pub use pipeline::{build_program, default_sources, ingest, load_or_ingest, SourceMap};

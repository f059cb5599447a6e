//! CV ingestion: spool the upload, extract text by extension, scan for
//! skill keywords, store the original file, persist a summary record.

pub mod extract;
pub mod handlers;
pub mod ingest;
pub mod skills;

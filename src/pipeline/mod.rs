pub mod ingestion;
pub mod features;
pub mod prediction;
pub mod summary;
pub mod processor; // ingest → extract → predict (+ summary)

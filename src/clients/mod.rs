//! Inference server clients.

pub mod tei;

pub use tei::TeiClient;

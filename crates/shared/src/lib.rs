//! Wire types and error taxonomy shared by the RAG client crates.

pub mod domain;
pub mod error;
pub mod protocol;

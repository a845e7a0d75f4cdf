//! AiSensy campaign integration.
//!
//! `schema` turns a campaign's remote parameter list into form fields,
//! `assembler` turns filled-in form values back into a send request, and
//! `executor` runs sends over a batch of records.

pub mod assembler;
pub mod cache;
pub mod client;
pub mod credential;
pub mod executor;
pub mod fields;
pub mod schema;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

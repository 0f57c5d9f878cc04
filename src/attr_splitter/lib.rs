//! # attr_splitter Architecture
//!
//! attr_splitter lets one logical model attribute (a phone number) be edited as
//! several form inputs (area code, prefix, line number). It has two halves that
//! share naming rules but not state:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Declaration (schema.rs, model.rs)                          │
//! │  - Per-model SplitterSchema, built once at startup          │
//! │  - prefix mode: {segment}_{attribute}                       │
//! │  - suffix mode: {attribute}_{segment}                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Records (record.rs, store/)                                │
//! │  - Field values + combination state per split attribute     │
//! │  - save(): recombine changed splits, then DataStore write   │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Rendering (form.rs, naming.rs, formtags crate)             │
//! │  - One <input> per segment, sized by max length             │
//! │  - Optional focus jump and text obscuring                   │
//! │  - Pluggable id/name conventions                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The renderer never looks at schemas: it works from the segment → length
//! map it is given. [`api::SplitterApi`] and [`config::SplitterConfig`] tie
//! the two halves together for applications that declare both in one place.
//!
//! ## Key Principle: No I/O in the Core
//!
//! Everything except [`config`] file loading takes regular Rust values and
//! returns `Result`s. Nothing writes to stdout/stderr; the `attr-splitter`
//! binary is the only place that does.
//!
//! ## Module Overview
//!
//! - [`api`]: Facade over schemas, records, store and renderer
//! - [`config`]: JSON configuration of models and render defaults
//! - [`error`]: Error types
//! - [`form`]: Multi-field renderer
//! - [`model`]: Split attribute specifications
//! - [`naming`]: Element id/name conventions
//! - [`record`]: Model instances and combination
//! - [`schema`]: Per-model schemas and the schema registry
//! - [`store`]: Storage abstraction and the in-memory store

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod model;
pub mod naming;
pub mod record;
pub mod schema;
pub mod store;

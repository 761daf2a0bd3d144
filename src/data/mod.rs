//! Data layer: core types and the combine / select / filter / export pipeline.
//!
//! Architecture:
//! ```text
//!  .xlsx / .xls uploads
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  ingest   │  list sheets, read chosen sheet → Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ combine   │  stack sheets, union of columns
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  select   │  project to report columns
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  kind → control → predicates (AND)
//!   └──────────┘
//!        │
//!        ├──────────────┐
//!        ▼              ▼
//!   ┌──────────┐   ┌──────────┐
//!   │  chart    │   │  export   │  bar series / CSV bytes
//!   └──────────┘   └──────────┘
//! ```
//!
//! `pipeline::run` wires the stages together over a `Session` snapshot.

pub mod chart;
pub mod combine;
pub mod error;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod kind;
pub mod model;
pub mod pipeline;
pub mod select;

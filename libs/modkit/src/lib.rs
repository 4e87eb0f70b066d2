//! # ModKit
//!
//! Building blocks shared by every feature module of the server:
//!
//! - **Contracts**: `Module`, `DbModule`, `RestfulModule`, `RestHostModule`, `StatefulModule`
//! - **Registry**: explicit registration with dependency ordering
//! - **Runner**: phase-based lifecycle: init → DB → REST → start → wait → stop
//! - **API helpers**: RFC 9457 problem responses and paging envelopes

pub use anyhow::Result;
pub use async_trait::async_trait;

pub mod contracts;
pub use contracts::*;

pub mod context;
pub use context::{ConfigProvider, ModuleCtx, ModuleCtxBuilder};

pub mod client_hub;
pub use client_hub::{ClientHub, ClientHubError};

pub mod registry;
pub use registry::{ModuleEntry, ModuleRegistry, RegistryBuilder, RegistryError};

pub mod runtime;
pub use runtime::{run, DbOptions, RunOptions, ShutdownOptions};

pub mod api;
pub use api::{Page, Problem, ProblemResponse, ValidationError};

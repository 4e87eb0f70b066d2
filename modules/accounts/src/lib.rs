// === PUBLIC CONTRACT ===
pub mod contract;
pub use contract::{client, error, model};

// === MODULE DEFINITION ===
pub mod module;
pub use module::{Accounts, MODULE_NAME};

// === HTTP GUARDS ===
// Route layers for modules that serve authenticated endpoints.
pub mod api;
pub use api::auth::{authenticate_basic, require_authenticated, require_role};

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;

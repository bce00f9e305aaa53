//! Target configuration loaded from hoist.toml.
//!
//! Replaces the ambient environment a deployment script would mutate with an
//! explicit struct: the CLI loads one [`TargetConfig`] up front and passes it
//! by reference into everything that needs it.

mod schema;
mod store;

pub use schema::{HoistConfig, TargetConfig};
pub use store::ConfigStore;

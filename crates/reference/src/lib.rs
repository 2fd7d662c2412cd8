//! Registry references for index repositories.
//!
//! Index archives are distributed through OCI registries, and users point at
//! them with free-form locators such as `ghcr.io/aquasecurity/trivy-db`. This
//! crate parses those locators into a [`RepositoryReference`] and provides
//! [`normalize`], which tags untagged locators with the schema version the
//! caller understands.

mod consts;
pub mod error;
mod normalize;
mod reference;

pub use crate::consts::DEFAULT_REGISTRY;
pub use crate::normalize::{Normalized, normalize};
pub use crate::reference::{RepositoryReference, Target, parse};

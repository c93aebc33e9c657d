//! Cluster Profiles - profile-based cluster configuration resolution
//!
//! Callers pick named profiles from a catalog: an ordered list of cluster
//! features for the control plane and a list of node pool profiles. The
//! engine resolves them into complete configuration fragments by layering
//! defaults, catalog entries and caller overrides with a deep merge.
//!
//! The engine is pure: catalogs are passed in explicitly and every merge
//! yields a new fragment, so independent resolutions may run concurrently.

pub mod catalog;
pub mod compose;
pub mod error;
pub mod logging;
pub mod nodepool;
pub mod report;
pub mod request;
pub mod resolve;

pub use catalog::{Catalog, CatalogError, CatalogKind, CatalogSet, Lookup};
pub use compose::compose_cluster_config;
pub use error::{DigestError, ResolveError};
pub use nodepool::{resolve_nodepool, LayerOrigin, Overrides, ResolvedNodepool};
pub use profile_merge::{merge, Fragment, MergeConflict};
pub use report::ResolutionReport;
pub use request::RequestError;
pub use resolve::{resolve_all, ResolveRequest, ResolvedSet};

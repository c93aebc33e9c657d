//! Control plane feature composition
//!
//! Folds an ordered list of cluster feature profiles over the base defaults.
//! Later features win on conflicting keys, so the order of the list matters:
//! `["standard-prod-tier", "standard-dev"]` ends up on the dev SKU tier, the
//! reverse order on the prod one.
//!
//! Every feature must come from the catalog. An unknown name aborts the whole
//! composition; silently skipping a networking or security feature is never
//! acceptable. Semantic compatibility between features is not checked.

use profile_merge::{merge_owned, Fragment};
use tracing::debug;

use crate::catalog::{Catalog, Lookup};
use crate::error::ResolveError;

/// Compose the control plane configuration from `features`, in order.
pub fn compose_cluster_config<S: AsRef<str>>(
    features: &[S],
    catalog: &Catalog,
    base_defaults: &Fragment,
) -> Result<Fragment, ResolveError> {
    features
        .iter()
        .map(AsRef::<str>::as_ref)
        .try_fold(base_defaults.clone(), |acc, name| match catalog.lookup(name) {
            Lookup::Found(entry) => {
                debug!(feature = name, keys = entry.len(), "applying cluster feature");
                Ok(merge_owned(acc, entry))
            }
            Lookup::NotFound => Err(ResolveError::UnknownFeature {
                name: name.to_string(),
            }),
        })
}

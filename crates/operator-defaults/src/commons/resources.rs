//! Default resource profiles for containers.
//!
//! Every application kind has a configured resource profile (requests and limits per resource
//! name). Whether the profile is applied at all is controlled by the `useDefaultResources` flag,
//! which lets administrators opt applications out of automatic requests, e.g. for clusters with
//! tight admission quotas.

use std::collections::{BTreeMap, BTreeSet};

use k8s_openapi::{
    api::core::v1::ResourceRequirements, apimachinery::pkg::api::resource::Quantity,
};

/// Merges the user supplied `current` resources with the configured default `profile`.
///
/// A resource name is considered user supplied as soon as either a request or a limit exists for
/// it, in which case neither is touched. All other resource names of the profile are copied over
/// (requests and limits alike).
///
/// If `use_default` is `false`, `current` is returned as-is.
pub fn resolve(
    mut current: ResourceRequirements,
    profile: &ResourceRequirements,
    use_default: bool,
) -> ResourceRequirements {
    if !use_default {
        return current;
    }

    let names = [&profile.requests, &profile.limits]
        .into_iter()
        .flatten()
        .flat_map(BTreeMap::keys)
        .collect::<BTreeSet<_>>();

    for name in names {
        if is_specified(&current, name) {
            continue;
        }

        for (target, source) in [
            (&mut current.requests, &profile.requests),
            (&mut current.limits, &profile.limits),
        ] {
            if let Some(quantity) = lookup(source, name) {
                target
                    .get_or_insert_with(BTreeMap::new)
                    .insert(name.clone(), quantity.clone());
            }
        }
    }

    current
}

fn is_specified(resources: &ResourceRequirements, name: &str) -> bool {
    lookup(&resources.requests, name).is_some() || lookup(&resources.limits, name).is_some()
}

fn lookup<'a>(list: &'a Option<BTreeMap<String, Quantity>>, name: &str) -> Option<&'a Quantity> {
    list.as_ref()?
        .get(name)
        .filter(|quantity| !quantity.0.is_empty())
}

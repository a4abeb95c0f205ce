use std::collections::BTreeSet;

/// Role check for one route.
///
/// Admits when the route names no roles, or when the caller holds at least one
/// of them. A caller without role claims holds the empty set.
#[must_use]
pub fn is_role_permitted(allowed_roles: &BTreeSet<String>, caller_roles: &BTreeSet<String>) -> bool {
    allowed_roles.is_empty() || !allowed_roles.is_disjoint(caller_roles)
}

//! Well-known cache keys.
//!
//! These are naming conventions for callers; the provider treats every key
//! as an opaque string.

// Roles
pub const ROLE_TYPES: &str = "role-types";
pub const ROLE_CATEGORIES: &str = "role-categories";

// Skills
pub const ALL_SKILLS: &str = "all-skills";
/// Prefix for keys built by [`skills_by_ids_key`].
pub const SKILLS_BY_IDS: &str = "skills-by-ids";

// Ecosystem
pub const ECOSYSTEM_PARTNERS: &str = "ecosystem-partners";
pub const ECOSYSTEM_VENTURES: &str = "ecosystem-ventures";
pub const ECOSYSTEM_GRANTS: &str = "ecosystem-grants";
pub const ECOSYSTEM_LEGAL: &str = "ecosystem-legal";

// Projects
pub const ALL_PROJECTS: &str = "all-projects";
/// Prefix for keys built by [`user_projects_key`].
pub const USER_PROJECTS: &str = "user-projects";

/// Every static key, in declaration order.
pub const ALL: [&str; 10] = [
    ROLE_TYPES,
    ROLE_CATEGORIES,
    ALL_SKILLS,
    SKILLS_BY_IDS,
    ECOSYSTEM_PARTNERS,
    ECOSYSTEM_VENTURES,
    ECOSYSTEM_GRANTS,
    ECOSYSTEM_LEGAL,
    ALL_PROJECTS,
    USER_PROJECTS,
];

/// Key for a skills lookup by id.
///
/// Ids are sorted so the same set always maps to the same key. Returns
/// `None` for an empty id list, which should bypass the cache.
pub fn skills_by_ids_key<S: AsRef<str>>(ids: &[S]) -> Option<String> {
    if ids.is_empty() {
        return None;
    }

    let mut sorted: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    Some(format!("{SKILLS_BY_IDS}-{}", sorted.join("-")))
}

/// Key for the projects owned by one user.
pub fn user_projects_key(user_id: &str) -> String {
    format!("{USER_PROJECTS}-{user_id}")
}

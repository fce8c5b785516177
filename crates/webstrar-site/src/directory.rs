use std::collections::BTreeMap;

/// Lookup of which site a user is assigned to.
///
/// The authoritative store lives outside this crate; implementations adapt it.
pub trait SiteDirectory {
    fn site_for(&self, user: &str) -> Option<u32>;

    /// Every site with at least one user, users sorted.
    fn assignments(&self) -> BTreeMap<u32, Vec<String>>;
}

/// User identifiers are compared trimmed and lower-cased.
pub fn normalize_user(user: &str) -> String {
    user.trim().to_lowercase()
}

/// A fixed user-to-site table, typically loaded from configuration.
#[derive(Clone, Debug, Default)]
pub struct StaticDirectory {
    users: BTreeMap<String, u32>,
}

impl StaticDirectory {
    pub fn new<I, S>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: AsRef<str>,
    {
        let users = assignments
            .into_iter()
            .map(|(user, site)| (normalize_user(user.as_ref()), site))
            .filter(|(user, _)| !user.is_empty())
            .collect();
        Self { users }
    }
}

impl SiteDirectory for StaticDirectory {
    fn site_for(&self, user: &str) -> Option<u32> {
        self.users.get(&normalize_user(user)).copied()
    }

    fn assignments(&self) -> BTreeMap<u32, Vec<String>> {
        let mut sites: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for (user, site) in &self.users {
            sites.entry(*site).or_default().push(user.clone());
        }
        sites
    }
}

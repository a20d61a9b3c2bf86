use std::fmt;

use ahash::AHashSet;

/// Identity of one administrative unit: prefecture name plus optional
/// city and district names. Absent components are `None`, which keeps a
/// unit with no city column distinct from one whose city is literally
/// named "NULL".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdminKey {
    pub prefecture: String,
    pub city: Option<String>,
    pub district: Option<String>,
}

impl AdminKey {
    pub fn new(
        prefecture: impl Into<String>,
        city: Option<String>,
        district: Option<String>,
    ) -> Self {
        Self { prefecture: prefecture.into(), city, district }
    }
}

impl fmt::Display for AdminKey {
    /// `pref-city-district` with `NULL` placeholders, matching the
    /// audit output format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.prefecture,
            self.city.as_deref().unwrap_or("NULL"),
            self.district.as_deref().unwrap_or("NULL"),
        )
    }
}

/// Keys already persisted in the store, loaded once per run and used
/// strictly as a skip filter.
pub type ExistingKeySet = AHashSet<AdminKey>;

#[cfg(test)]
mod tests {
    use super::AdminKey;

    #[test]
    fn absent_components_group_together() {
        let a = AdminKey::new("東京都", Some("A市".into()), None);
        let b = AdminKey::new("東京都", Some("A市".into()), None);
        assert_eq!(a, b);
    }

    #[test]
    fn absent_is_not_the_literal_sentinel() {
        let absent = AdminKey::new("東京都", None, None);
        let literal = AdminKey::new("東京都", Some("NULL".into()), None);
        assert_ne!(absent, literal);
    }

    #[test]
    fn display_uses_null_placeholders() {
        let key = AdminKey::new("東京都", Some("A市".into()), None);
        assert_eq!(key.to_string(), "東京都-A市-NULL");
    }
}

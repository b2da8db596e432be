/// Favorite display identities, in insertion order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesList {
    items: Vec<String>,
}

impl FavoritesList {
    /// Build from persisted entries, dropping later duplicates.
    pub fn from_entries(entries: impl IntoIterator<Item = String>) -> Self {
        let mut list = Self::default();
        for entry in entries {
            list.add(&entry);
        }
        list
    }

    /// Returns `false` if `identity` was already present.
    pub fn add(&mut self, identity: &str) -> bool {
        if self.contains(identity) {
            return false;
        }
        self.items.push(identity.to_string());
        true
    }

    /// Returns `false` if `identity` was not present.
    pub fn remove(&mut self, identity: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item != identity);
        self.items.len() != before
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.items.iter().any(|item| item == identity)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_add_is_a_no_op() {
        let mut favorites = FavoritesList::default();

        assert!(favorites.add("Paris, France"));
        assert!(!favorites.add("Paris, France"));
        assert_eq!(favorites.len(), 1);

        assert!(favorites.remove("Paris, France"));
        assert!(favorites.is_empty());
        assert!(!favorites.remove("Paris, France"));
    }

    #[test]
    fn insertion_order_is_kept() {
        let favorites = FavoritesList::from_entries(
            ["Oslo, Norway", "Paris, France", "Oslo, Norway", "Lima, Peru"].map(String::from),
        );

        assert_eq!(favorites.as_slice(), ["Oslo, Norway", "Paris, France", "Lima, Peru"]);
    }
}

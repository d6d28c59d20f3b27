use std::sync::Arc;

/// Sorted, deduplicated zone names. Tiles refer to zones by index into this table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionTable {
    names: Vec<Arc<str>>,
}

impl RegionTable {
    /// Build a table from any collection of names; order and duplicates don't matter.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<Arc<str>> = names.into_iter().map(|name| Arc::from(name.as_ref())).collect();
        names.sort_unstable();
        names.dedup();
        Self { names }
    }

    #[inline] pub fn len(&self) -> usize { self.names.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.names.is_empty() }

    /// Index of `name`, if present.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.names
            .binary_search_by(|probe| (**probe).cmp(name))
            .ok()
            .map(|idx| idx as u16)
    }

    /// Name at `index`, if in range.
    #[inline]
    pub fn name(&self, index: u16) -> Option<&str> {
        self.names.get(usize::from(index)).map(|name| &**name)
    }

    /// All names in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(|name| &**name)
    }
}

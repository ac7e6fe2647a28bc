use std::{
    collections::{BTreeMap, HashMap, HashSet},
    hash::Hash,
};

/// Identity-memoized name assignment for one resource namespace.
///
/// The first `add` of a reference binds it to its preferred name, or to the preferred name
/// with the smallest free positive suffix (`fx`, `fx1`, `fx2`, ...). Later `add`s of the same
/// reference return the name it already has, whatever hint they carry.
#[derive(Clone, Debug)]
pub struct Deduplicator<R> {
    names: HashMap<R, String>,
    table: BTreeMap<String, R>,
    next_suffix: HashMap<String, u64>,
    reserved: HashSet<String>,
}

impl<R> Default for Deduplicator<R> {
    fn default() -> Self {
        Self {
            names: HashMap::new(),
            table: BTreeMap::new(),
            next_suffix: HashMap::new(),
            reserved: HashSet::new(),
        }
    }
}

impl<R: Clone + Eq + Hash> Deduplicator<R> {
    /// An empty deduplicator.
    pub fn new() -> Self {
        Self::default()
    }

    /// A deduplicator that never hands out `names` from [`Deduplicator::add`]. They can only
    /// be bound through [`Deduplicator::reserve`].
    pub fn with_reserved<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reserved: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Name for `reference`, assigning one from `preferred` on first sight.
    pub fn add(&mut self, reference: &R, preferred: &str) -> String {
        if let Some(name) = self.names.get(reference) {
            return name.clone();
        }
        let name = self.fresh_name(preferred);
        self.bind(reference, name.clone());
        name
    }

    /// Bind `reference` to the fixed `name`.
    ///
    /// When `name` is already taken the reference becomes an alias of the existing entry, so
    /// any number of distinct references can share it. A reference that already has a name
    /// keeps it.
    pub fn reserve(&mut self, name: &str, reference: &R) -> String {
        if let Some(existing) = self.names.get(reference) {
            return existing.clone();
        }
        if !self.table.contains_key(name) {
            self.table.insert(name.to_owned(), reference.clone());
        }
        self.names.insert(reference.clone(), name.to_owned());
        name.to_owned()
    }

    /// Reference bound to `name`.
    pub fn get(&self, name: &str) -> Option<&R> {
        self.table.get(name)
    }

    /// Name assigned to `reference`, if any.
    pub fn name_of(&self, reference: &R) -> Option<&str> {
        self.names.get(reference).map(String::as_str)
    }

    /// Number of table entries (aliases do not count).
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether nothing has been named yet.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Final `name -> reference` table.
    pub fn into_table(self) -> BTreeMap<String, R> {
        self.table
    }

    fn is_taken(&self, name: &str) -> bool {
        self.table.contains_key(name) || self.reserved.contains(name)
    }

    fn fresh_name(&mut self, base: &str) -> String {
        if !base.is_empty() && !self.is_taken(base) {
            return base.to_owned();
        }

        let first = if base.is_empty() { 0 } else { 1 };
        let mut n = self.next_suffix.get(base).copied().unwrap_or(first);
        loop {
            let candidate = format!("{base}{n}");
            n += 1;
            if !self.is_taken(&candidate) {
                self.next_suffix.insert(base.to_owned(), n);
                return candidate;
            }
        }
    }

    fn bind(&mut self, reference: &R, name: String) {
        self.table.insert(name.clone(), reference.clone());
        self.names.insert(reference.clone(), name);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/dedup.rs"]
mod tests;

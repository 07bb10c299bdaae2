//! Key-value stores with two lookup strategies and a numbered store of polynomials.

use std::fmt;

use tracing::debug;

use crate::poly::Polynomial;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TableError {
    DuplicateKey,
    MissingKey,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TableError::DuplicateKey => write!(f, "the key already exists"),
            TableError::MissingKey => write!(f, "the key does not exist"),
        }
    }
}

impl std::error::Error for TableError {}

/// A map from keys to values in which each key occurs at most once.
pub trait Table<K, V> {
    /// Insert a new entry. An existing key is never overwritten.
    fn insert(&mut self, key: K, value: V) -> Result<(), TableError>;
    fn find(&self, key: &K) -> Option<&V>;
    fn find_mut(&mut self, key: &K) -> Option<&mut V>;
    /// Remove the entry of `key` and return its value.
    fn erase(&mut self, key: &K) -> Result<V, TableError>;
    /// Iterate over the entries in the table's order.
    fn iter(&self) -> std::slice::Iter<'_, (K, V)>;
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A table that keeps its entries sorted by key. Lookups use binary search.
#[derive(Debug, Clone)]
pub struct SortedTable<K: Ord, V> {
    entries: Vec<(K, V)>,
}

impl<K: Ord, V> Default for SortedTable<K, V> {
    fn default() -> Self {
        SortedTable::new()
    }
}

impl<K: Ord, V> SortedTable<K, V> {
    pub fn new() -> SortedTable<K, V> {
        SortedTable {
            entries: Vec::new(),
        }
    }

    #[inline]
    fn search(&self, key: &K) -> Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| k.cmp(key))
    }
}

impl<K: Ord, V> Table<K, V> for SortedTable<K, V> {
    fn insert(&mut self, key: K, value: V) -> Result<(), TableError> {
        match self.search(&key) {
            Ok(_) => Err(TableError::DuplicateKey),
            Err(i) => {
                self.entries.insert(i, (key, value));
                Ok(())
            }
        }
    }

    fn find(&self, key: &K) -> Option<&V> {
        self.search(key).ok().map(|i| &self.entries[i].1)
    }

    fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.search(key) {
            Ok(i) => Some(&mut self.entries[i].1),
            Err(_) => None,
        }
    }

    fn erase(&mut self, key: &K) -> Result<V, TableError> {
        match self.search(key) {
            Ok(i) => Ok(self.entries.remove(i).1),
            Err(_) => Err(TableError::MissingKey),
        }
    }

    #[inline]
    fn iter(&self) -> std::slice::Iter<'_, (K, V)> {
        self.entries.iter()
    }

    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A table that keeps its entries in insertion order. Lookups scan linearly.
#[derive(Debug, Clone)]
pub struct UnsortedTable<K: PartialEq, V> {
    entries: Vec<(K, V)>,
}

impl<K: PartialEq, V> Default for UnsortedTable<K, V> {
    fn default() -> Self {
        UnsortedTable::new()
    }
}

impl<K: PartialEq, V> UnsortedTable<K, V> {
    pub fn new() -> UnsortedTable<K, V> {
        UnsortedTable {
            entries: Vec::new(),
        }
    }

    #[inline]
    fn position(&self, key: &K) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

impl<K: PartialEq, V> Table<K, V> for UnsortedTable<K, V> {
    fn insert(&mut self, key: K, value: V) -> Result<(), TableError> {
        if self.position(&key).is_some() {
            return Err(TableError::DuplicateKey);
        }

        self.entries.push((key, value));
        Ok(())
    }

    fn find(&self, key: &K) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    fn erase(&mut self, key: &K) -> Result<V, TableError> {
        // keep the order of the remaining entries
        match self.position(key) {
            Some(i) => Ok(self.entries.remove(i).1),
            None => Err(TableError::MissingKey),
        }
    }

    #[inline]
    fn iter(&self) -> std::slice::Iter<'_, (K, V)> {
        self.entries.iter()
    }

    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Polynomials saved under consecutive numbers, starting at 1.
/// A number is never handed out twice, even after its polynomial is removed.
#[derive(Debug, Clone)]
pub struct Repository<T: Table<usize, Polynomial>> {
    table: T,
    next_key: usize,
}

impl<T: Table<usize, Polynomial> + Default> Default for Repository<T> {
    fn default() -> Self {
        Repository::new(T::default())
    }
}

impl<T: Table<usize, Polynomial>> Repository<T> {
    pub fn new(table: T) -> Repository<T> {
        Repository { table, next_key: 1 }
    }

    /// Save a polynomial and return its key.
    pub fn add(&mut self, poly: Polynomial) -> Result<usize, TableError> {
        let key = self.next_key;
        self.table.insert(key, poly)?;
        self.next_key += 1;

        debug!("saved polynomial {}", key);
        Ok(key)
    }

    pub fn get(&self, key: usize) -> Option<&Polynomial> {
        self.table.find(&key)
    }

    pub fn remove(&mut self, key: usize) -> Result<Polynomial, TableError> {
        let p = self.table.erase(&key)?;
        debug!("removed polynomial {}", key);
        Ok(p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Polynomial)> {
        self.table.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// A combination of catalog properties, by catalog index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PropertySet(BTreeSet<usize>);

impl PropertySet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn singleton(index: usize) -> Self {
        PropertySet(BTreeSet::from([index]))
    }

    pub fn with(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.0.insert(index);
        next
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Stable 64-bit digest of the member indices (FNV-1a).
    pub fn fingerprint(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;
        self.0.iter().fold(OFFSET, |hash, &index| {
            (hash ^ (index as u64 + 1)).wrapping_mul(PRIME)
        })
    }
}

impl FromIterator<usize> for PropertySet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        PropertySet(iter.into_iter().collect())
    }
}

impl fmt::Display for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "}}")
    }
}

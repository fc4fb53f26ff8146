use ahash::AHashMap;

/// The raw column values of one stored row: column key bytes mapped to the
/// encoded value bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawColumns {
    columns: AHashMap<Vec<u8>, Vec<u8>>,
}

impl RawColumns {
    pub fn new() -> RawColumns {
        Default::default()
    }

    /// Inserts a column, returning the previous value stored under `key`.
    pub fn insert(
        &mut self,
        key: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> Option<Vec<u8>> {
        self.columns.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.columns.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.columns.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.columns
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }
}

impl<K, V> FromIterator<(K, V)> for RawColumns
where
    K: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RawColumns {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

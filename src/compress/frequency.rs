//! Per-block byte frequency counting.

/// One row of the frequency table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrequencyEntry {
    /// Byte value.
    pub byte: u8,
    /// Occurrences of `byte` in the block.
    pub count: u32,
}

/// A 256-entry byte frequency table, reusable across blocks.
///
/// After [`FrequencyTable::count`] the entries are sorted by descending
/// count, ties broken by ascending byte value, and only the leading
/// [`FrequencyTable::len`] entries (the nonzero ones) are meaningful.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    entries: [FrequencyEntry; 256],
    len: usize,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: [FrequencyEntry::default(); 256],
            len: 0,
        }
    }

    /// Reset the table, count `data`, sort it, and return the effective length.
    pub fn count(&mut self, data: &[u8]) -> usize {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            *entry = FrequencyEntry {
                byte: i as u8,
                count: 0,
            };
        }
        for &byte in data {
            self.entries[byte as usize].count += 1;
        }

        // Entries start in byte order, so a stable sort on count alone keeps
        // equal counts in ascending byte order.
        self.entries.sort_by(|a, b| b.count.cmp(&a.count));

        self.len = self.entries.iter().take_while(|e| e.count > 0).count();
        self.len
    }

    /// The nonzero prefix of the sorted table.
    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries[..self.len]
    }

    /// Effective length: number of distinct bytes in the last counted block.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the last counted block was empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Count `data` into a fresh table and return its nonzero prefix.
pub fn compute_frequencies(data: &[u8]) -> Vec<FrequencyEntry> {
    let mut table = FrequencyTable::new();
    table.count(data);
    table.entries().to_vec()
}

//! Huffman tree construction and code dictionary generation.
//!
//! The tree is rebuilt by the decoder from the stored frequency table, so
//! construction must be fully deterministic: queue entries are ordered by
//! `(weight, serial)` where the serial is assigned at creation time.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::compress::frequency::FrequencyEntry;
use crate::error::{Error, Result};

/// A node of the Huffman tree. Each node is owned by its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    /// Terminal node carrying a byte value.
    Leaf(u8),
    /// Interior node; a 0 bit selects `left`, a 1 bit selects `right`.
    Internal {
        /// Subtree for a 0 bit.
        left: Box<HuffmanNode>,
        /// Subtree for a 1 bit.
        right: Box<HuffmanNode>,
    },
}

/// Priority queue entry for tree construction.
#[derive(Debug)]
struct QueueItem {
    weight: u64,
    serial: u32,
    node: HuffmanNode,
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Serials are unique, so this is a total order over live entries
        self.weight
            .cmp(&other.weight)
            .then_with(|| self.serial.cmp(&other.serial))
    }
}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueItem {}

/// A Huffman code tree for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffmanNode,
}

impl HuffmanTree {
    /// Build the tree for a sorted, nonzero frequency table.
    ///
    /// Leaves get serials `0..k` in table order, merged nodes the following
    /// serials in merge order. The first node popped becomes the left child.
    /// Returns `None` for an empty table.
    pub fn build(freq: &[FrequencyEntry]) -> Option<Self> {
        let mut heap: BinaryHeap<Reverse<QueueItem>> = freq
            .iter()
            .enumerate()
            .map(|(serial, entry)| {
                Reverse(QueueItem {
                    weight: entry.count as u64,
                    serial: serial as u32,
                    node: HuffmanNode::Leaf(entry.byte),
                })
            })
            .collect();
        let mut next_serial = freq.len() as u32;

        while heap.len() > 1 {
            let (Some(Reverse(left)), Some(Reverse(right))) = (heap.pop(), heap.pop()) else {
                break;
            };

            heap.push(Reverse(QueueItem {
                weight: left.weight + right.weight,
                serial: next_serial,
                node: HuffmanNode::Internal {
                    left: Box::new(left.node),
                    right: Box::new(right.node),
                },
            }));
            next_serial += 1;
        }

        heap.pop().map(|Reverse(item)| HuffmanTree { root: item.node })
    }

    /// Root node of the tree.
    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    /// Depth of the deepest leaf; 0 for a single-leaf tree.
    pub fn max_depth(&self) -> u32 {
        fn depth(node: &HuffmanNode) -> u32 {
            match node {
                HuffmanNode::Leaf(_) => 0,
                HuffmanNode::Internal { left, right } => 1 + depth(left).max(depth(right)),
            }
        }
        depth(&self.root)
    }
}

/// Code for one byte value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DictionaryEntry {
    /// Code bits, first emitted bit in bit 0.
    pub bits: u64,
    /// Number of bits in the code; 0 for bytes absent from the block.
    pub width: u8,
}

/// Byte-indexed code dictionary, reusable across blocks.
#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: [DictionaryEntry; 256],
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary {
    /// Create a dictionary with every entry empty.
    pub fn new() -> Self {
        Self {
            entries: [DictionaryEntry::default(); 256],
        }
    }

    /// Assign a code to every leaf of `tree`.
    ///
    /// Fails with [`Error::DictionaryOverflow`] if any leaf is deeper than
    /// `max_width`; the dictionary contents are then unspecified and must not
    /// be used. A single-leaf tree gets the one-bit code `0`.
    pub fn build(&mut self, tree: &HuffmanTree, max_width: u8) -> Result<()> {
        self.entries = [DictionaryEntry::default(); 256];
        match tree.root() {
            HuffmanNode::Leaf(byte) => {
                self.entries[*byte as usize] = DictionaryEntry { bits: 0, width: 1 };
                Ok(())
            }
            root => self.assign(root, 0, 0, max_width),
        }
    }

    fn assign(&mut self, node: &HuffmanNode, bits: u64, width: u32, max_width: u8) -> Result<()> {
        match node {
            HuffmanNode::Leaf(byte) => {
                if width > max_width as u32 {
                    return Err(Error::DictionaryOverflow {
                        width,
                        max: max_width,
                    });
                }
                self.entries[*byte as usize] = DictionaryEntry {
                    bits,
                    width: width as u8,
                };
                Ok(())
            }
            HuffmanNode::Internal { left, right } => {
                // Past the limit every leaf below fails too; stop before the
                // shift below would run off the end of a u64.
                if width >= max_width as u32 {
                    return Err(Error::DictionaryOverflow {
                        width: width + 1,
                        max: max_width,
                    });
                }
                self.assign(left, bits, width + 1, max_width)?;
                self.assign(right, bits | (1u64 << width), width + 1, max_width)
            }
        }
    }

    /// Code for `byte`.
    #[inline]
    pub fn get(&self, byte: u8) -> DictionaryEntry {
        self.entries[byte as usize]
    }

    /// All 256 entries, indexed by byte value.
    pub fn entries(&self) -> &[DictionaryEntry; 256] {
        &self.entries
    }
}

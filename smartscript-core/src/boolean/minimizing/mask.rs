//! Implicant masks
//!
//! A mask is a product term written as one trit per variable (most significant variable first)
//! together with the set of indices it covers. `1` keeps the variable, `0` keeps its negation
//! and `D` drops it.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MaskBit {
    Zero,
    One,
    DontCare,
}

impl MaskBit {
    fn as_char(self) -> char {
        match self {
            MaskBit::Zero => '0',
            MaskBit::One => '1',
            MaskBit::DontCare => 'D',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mask {
    bits: Vec<MaskBit>,
    covered: BTreeSet<u32>,
    /// Merged into a larger mask, so not prime
    combined: bool,
    /// Covers only don't-care indices
    dont_care: bool,
}

impl Mask {
    /// The single-index mask of `index` over `width` variables
    pub fn from_index(index: u32, width: usize, dont_care: bool) -> Self {
        let bits = (0..width)
            .map(|i| {
                if (index >> (width - 1 - i)) & 1 == 1 {
                    MaskBit::One
                } else {
                    MaskBit::Zero
                }
            })
            .collect();
        Self {
            bits,
            covered: BTreeSet::from([index]),
            combined: false,
            dont_care,
        }
    }

    /// Build a mask from `0`, `1` and `D`/`-` characters, covering every index it matches
    #[cfg(test)]
    pub(crate) fn parse(pattern: &str) -> Option<Self> {
        let bits: Vec<MaskBit> = pattern
            .chars()
            .map(|c| match c {
                '0' => Some(MaskBit::Zero),
                '1' => Some(MaskBit::One),
                'D' | 'd' | '-' => Some(MaskBit::DontCare),
                _ => None,
            })
            .collect::<Option<_>>()?;
        if bits.len() > crate::boolean::MAX_VARIABLES {
            return None;
        }

        let mut covered = BTreeSet::from([0u32]);
        for bit in &bits {
            covered = covered
                .into_iter()
                .flat_map(|prefix| {
                    let shifted = prefix << 1;
                    match bit {
                        MaskBit::Zero => vec![shifted],
                        MaskBit::One => vec![shifted | 1],
                        MaskBit::DontCare => vec![shifted, shifted | 1],
                    }
                })
                .collect();
        }
        Some(Self {
            bits,
            covered,
            combined: false,
            dont_care: false,
        })
    }

    pub fn bits(&self) -> &[MaskBit] {
        &self.bits
    }

    pub fn covered(&self) -> &BTreeSet<u32> {
        &self.covered
    }

    pub fn covers(&self, index: u32) -> bool {
        self.covered.contains(&index)
    }

    pub fn is_combined(&self) -> bool {
        self.combined
    }

    pub fn set_combined(&mut self) {
        self.combined = true;
    }

    pub fn is_dont_care(&self) -> bool {
        self.dont_care
    }

    /// Number of `1` bits, used to group masks
    pub fn ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b == MaskBit::One).count()
    }

    /// Number of variables the product term mentions
    pub fn literal_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b != MaskBit::DontCare).count()
    }

    /// Two masks combine when they have the same width and the same don't-care positions and
    /// differ in exactly one other position
    pub fn combine_with(&self, other: &Mask) -> Option<Mask> {
        if self.bits.len() != other.bits.len() {
            return None;
        }

        let mut differing = None;
        for (i, (a, b)) in self.bits.iter().zip(&other.bits).enumerate() {
            if a == b {
                continue;
            }
            if *a == MaskBit::DontCare || *b == MaskBit::DontCare || differing.is_some() {
                return None;
            }
            differing = Some(i);
        }

        let position = differing?;
        let mut bits = self.bits.clone();
        bits[position] = MaskBit::DontCare;
        Some(Mask {
            bits,
            covered: self.covered.union(&other.covered).copied().collect(),
            combined: false,
            dont_care: self.dont_care && other.dont_care,
        })
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            write!(f, "{}", bit.as_char())?;
        }
        Ok(())
    }
}

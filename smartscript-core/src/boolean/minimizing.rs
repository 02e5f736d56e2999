//! Quine-McCluskey minimization
//!
//! Prime implicants
//!
//!     Every minterm and don't-care starts as a single-index [Mask]. Each round groups the
//!     current masks by their number of `1` bits and tries to combine every mask with every
//!     mask of the next group. Both sides of a successful combination are marked as combined;
//!     the results (deduplicated) form the next round. Masks that were never combined in their
//!     round are prime. Rounds stop when nothing combines. Primes that cover only don't-cares
//!     are dropped since they never help a cover.
//!
//! Covers
//!
//!     A minterm covered by exactly one prime makes that prime essential. The minterms left
//!     after taking all essentials are covered by Petrick's method: the product of, for each
//!     minterm, the sum of primes covering it is expanded into a sum of prime sets, with
//!     absorption after every step. The sets with the fewest primes, and among those the
//!     fewest literals, are the minimal forms. All of them are kept, sorted by their primes in
//!     canonical bit order.
//!
//! No minterms at all gives a single empty cover, which reads as the constant false.

pub mod mask;

pub use mask::{Mask, MaskBit};

use crate::boolean::assignments::MAX_VARIABLES;
use crate::boolean::ast::{BoolNode, OperatorStyle};
use crate::boolean::error::MinimizerError;
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(Debug, Clone)]
pub struct Minimizer {
    variables: Vec<String>,
    minterms: BTreeSet<u32>,
    dont_cares: BTreeSet<u32>,
    primes: Vec<Mask>,
    /// Each form is a list of indices into `primes`
    forms: Vec<Vec<usize>>,
}

impl Minimizer {
    pub fn new(
        minterms: &BTreeSet<u32>,
        dont_cares: &BTreeSet<u32>,
        variables: Vec<String>,
    ) -> Result<Self, MinimizerError> {
        validate(minterms, dont_cares, &variables)?;

        let primes = find_primes(minterms, dont_cares, variables.len());
        info!(
            "{} prime implicant(s): {}",
            primes.len(),
            primes
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let forms = select_covers(minterms, &primes);
        info!("{} minimal form(s)", forms.len());

        Ok(Self {
            variables,
            minterms: minterms.clone(),
            dont_cares: dont_cares.clone(),
            primes,
            forms,
        })
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn minterms(&self) -> &BTreeSet<u32> {
        &self.minterms
    }

    pub fn dont_cares(&self) -> &BTreeSet<u32> {
        &self.dont_cares
    }

    /// Prime implicants in canonical bit order
    pub fn prime_implicants(&self) -> &[Mask] {
        &self.primes
    }

    /// Every minimal cover as a list of masks
    pub fn minimal_forms(&self) -> Vec<Vec<&Mask>> {
        self.forms
            .iter()
            .map(|form| form.iter().map(|&i| &self.primes[i]).collect())
            .collect()
    }

    pub fn minimal_forms_as_expressions(&self) -> Vec<BoolNode> {
        self.minimal_forms()
            .into_iter()
            .map(|form| self.form_to_expression(&form))
            .collect()
    }

    pub fn minimal_forms_as_strings(&self, style: OperatorStyle) -> Vec<String> {
        self.minimal_forms_as_expressions()
            .iter()
            .map(|expr| expr.to_styled_string(style))
            .collect()
    }

    /// The product term of a mask; all don't-cares is the constant true
    pub fn mask_to_expression(&self, mask: &Mask) -> BoolNode {
        let literals: Vec<BoolNode> = mask
            .bits()
            .iter()
            .zip(&self.variables)
            .filter_map(|(bit, name)| match bit {
                MaskBit::One => Some(BoolNode::variable(name.clone())),
                MaskBit::Zero => Some(BoolNode::not(BoolNode::variable(name.clone()))),
                MaskBit::DontCare => None,
            })
            .collect();
        if literals.is_empty() {
            BoolNode::constant(true)
        } else {
            BoolNode::and(literals)
        }
    }

    fn form_to_expression(&self, form: &[&Mask]) -> BoolNode {
        if form.is_empty() {
            return BoolNode::constant(false);
        }
        BoolNode::or(form.iter().map(|m| self.mask_to_expression(m)).collect())
    }
}

fn validate(
    minterms: &BTreeSet<u32>,
    dont_cares: &BTreeSet<u32>,
    variables: &[String],
) -> Result<(), MinimizerError> {
    let count = variables.len();
    if count > MAX_VARIABLES {
        return Err(MinimizerError::TooManyVariables {
            count,
            max: MAX_VARIABLES,
        });
    }

    let mut seen = HashSet::new();
    for name in variables {
        if !seen.insert(name) {
            return Err(MinimizerError::DuplicateVariable(name.clone()));
        }
    }

    if let Some(&index) = minterms.intersection(dont_cares).next() {
        return Err(MinimizerError::Overlap { index });
    }

    let limit = 1u64 << count;
    if let Some(&index) = minterms
        .iter()
        .chain(dont_cares)
        .find(|&&i| u64::from(i) >= limit)
    {
        return Err(MinimizerError::IndexOutOfRange { index, count });
    }
    Ok(())
}

fn find_primes(minterms: &BTreeSet<u32>, dont_cares: &BTreeSet<u32>, width: usize) -> Vec<Mask> {
    let mut current: Vec<Mask> = minterms
        .iter()
        .map(|&i| Mask::from_index(i, width, false))
        .chain(dont_cares.iter().map(|&i| Mask::from_index(i, width, true)))
        .collect();
    let mut primes = Vec::new();
    let mut round = 0;

    while !current.is_empty() {
        round += 1;
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, mask) in current.iter().enumerate() {
            groups.entry(mask.ones()).or_default().push(i);
        }

        let mut next: Vec<Mask> = Vec::new();
        let mut seen: HashSet<Vec<MaskBit>> = HashSet::new();
        let mut combined = vec![false; current.len()];
        for (&ones, lower) in &groups {
            let Some(upper) = groups.get(&(ones + 1)) else {
                continue;
            };
            for &a in lower {
                for &b in upper {
                    if let Some(mask) = current[a].combine_with(&current[b]) {
                        combined[a] = true;
                        combined[b] = true;
                        if seen.insert(mask.bits().to_vec()) {
                            next.push(mask);
                        }
                    }
                }
            }
        }

        debug!(
            "round {}: {} mask(s), {} combined into {}",
            round,
            current.len(),
            combined.iter().filter(|&&c| c).count(),
            next.len()
        );
        for (mask, &was_combined) in current.iter_mut().zip(&combined) {
            if was_combined {
                mask.set_combined();
            }
        }
        primes.extend(
            current
                .into_iter()
                .filter(|m| !m.is_combined() && !m.is_dont_care()),
        );
        current = next;
    }

    primes.sort_by(|a, b| a.bits().cmp(b.bits()));
    primes
}

fn select_covers(minterms: &BTreeSet<u32>, primes: &[Mask]) -> Vec<Vec<usize>> {
    if minterms.is_empty() {
        return vec![Vec::new()];
    }

    let mut essential = BTreeSet::new();
    for &minterm in minterms {
        let mut covering = primes.iter().enumerate().filter(|(_, p)| p.covers(minterm));
        if let (Some((only, _)), None) = (covering.next(), covering.next()) {
            essential.insert(only);
        }
    }
    debug!("{} essential prime implicant(s)", essential.len());

    let remaining: Vec<u32> = minterms
        .iter()
        .copied()
        .filter(|&m| !essential.iter().any(|&p| primes[p].covers(m)))
        .collect();

    let mut forms: Vec<BTreeSet<usize>> = if remaining.is_empty() {
        vec![essential]
    } else {
        petrick(&remaining, primes)
            .into_iter()
            .map(|choice| essential.union(&choice).copied().collect())
            .collect()
    };

    let cost = |form: &BTreeSet<usize>| {
        let literals: usize = form.iter().map(|&p| primes[p].literal_count()).sum();
        (form.len(), literals)
    };
    let Some(best) = forms.iter().map(cost).min() else {
        return Vec::new();
    };
    forms.retain(|form| cost(form) == best);

    let mut forms: Vec<Vec<usize>> = forms.into_iter().map(|f| f.into_iter().collect()).collect();
    forms.sort();
    forms.dedup();
    forms
}

/// Expand the product of sums over the remaining minterms into absorbed prime sets
fn petrick(remaining: &[u32], primes: &[Mask]) -> Vec<BTreeSet<usize>> {
    let mut products: Vec<BTreeSet<usize>> = vec![BTreeSet::new()];
    for &minterm in remaining {
        let covering: Vec<usize> = (0..primes.len())
            .filter(|&p| primes[p].covers(minterm))
            .collect();

        let mut expanded: Vec<BTreeSet<usize>> = Vec::new();
        for product in &products {
            if covering.iter().any(|p| product.contains(p)) {
                expanded.push(product.clone());
                continue;
            }
            for &p in &covering {
                let mut extended = product.clone();
                extended.insert(p);
                expanded.push(extended);
            }
        }
        products = absorb(expanded);
    }
    products
}

/// Drop duplicates and every set that contains another set
fn absorb(mut sets: Vec<BTreeSet<usize>>) -> Vec<BTreeSet<usize>> {
    sets.sort_by_key(|s| s.len());
    sets.dedup();
    let mut kept: Vec<BTreeSet<usize>> = Vec::new();
    for set in sets {
        if !kept.iter().any(|k| k.is_subset(&set)) {
            kept.push(set);
        }
    }
    kept
}

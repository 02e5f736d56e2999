//! Truth assignments over an ordered list of variables
//!
//! An assignment is identified by its index. The first variable is the most significant bit,
//! so over `[A, B, C]` the index 6 (`110`) means `A = 1, B = 1, C = 0`. The same convention is
//! used by the minimizer when it turns masks back into product terms.

use crate::boolean::ast::BoolNode;
use crate::boolean::error::AssignmentError;
use std::collections::BTreeSet;

/// Upper bound on the number of variables of a table or minimizer
pub const MAX_VARIABLES: usize = 31;

/// Bits of `index`, most significant first
pub fn index_to_bits(index: u32, width: usize) -> Vec<bool> {
    (0..width)
        .map(|i| (index >> (width - 1 - i)) & 1 == 1)
        .collect()
}

pub fn bits_to_index(bits: &[bool]) -> u32 {
    bits.iter().fold(0, |acc, &bit| (acc << 1) | u32::from(bit))
}

/// Number of assignments over `count` variables
pub fn assignment_count(count: usize) -> Result<u32, AssignmentError> {
    check_width(count)?;
    Ok(1u32 << count)
}

fn check_width(count: usize) -> Result<(), AssignmentError> {
    if count > MAX_VARIABLES {
        return Err(AssignmentError::TooManyVariables {
            count,
            max: MAX_VARIABLES,
        });
    }
    Ok(())
}

/// Values for an ordered list of variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<'a> {
    variables: &'a [String],
    index: u32,
    values: Vec<bool>,
}

impl<'a> Assignment<'a> {
    pub fn from_index(variables: &'a [String], index: u32) -> Self {
        Self {
            variables,
            index,
            values: index_to_bits(index, variables.len()),
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn values(&self) -> &[bool] {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<bool> {
        self.variables
            .iter()
            .position(|v| v == name)
            .map(|i| self.values[i])
    }

    pub fn evaluate(&self, expression: &BoolNode) -> Result<bool, AssignmentError> {
        expression.evaluate(&|name: &str| self.value(name))
    }
}

/// Every assignment over `variables`, in index order
pub fn all_assignments(
    variables: &[String],
) -> Result<impl Iterator<Item = Assignment<'_>>, AssignmentError> {
    let count = assignment_count(variables.len())?;
    Ok((0..count).map(move |index| Assignment::from_index(variables, index)))
}

/// Indices of the assignments for which `expression` is true
pub fn minterms(
    expression: &BoolNode,
    variables: &[String],
) -> Result<BTreeSet<u32>, AssignmentError> {
    indices_where(expression, variables, true)
}

/// Indices of the assignments for which `expression` is false
pub fn maxterms(
    expression: &BoolNode,
    variables: &[String],
) -> Result<BTreeSet<u32>, AssignmentError> {
    indices_where(expression, variables, false)
}

fn indices_where(
    expression: &BoolNode,
    variables: &[String],
    wanted: bool,
) -> Result<BTreeSet<u32>, AssignmentError> {
    let mut indices = BTreeSet::new();
    for assignment in all_assignments(variables)? {
        if assignment.evaluate(expression)? == wanted {
            indices.insert(assignment.index());
        }
    }
    Ok(indices)
}

/// The sorted variables of an expression together with its value under every assignment
pub fn truth_table(expression: &BoolNode) -> Result<(Vec<String>, Vec<bool>), AssignmentError> {
    let variables: Vec<String> = expression.variables().into_iter().collect();
    let mut rows = Vec::new();
    for assignment in all_assignments(&variables)? {
        rows.push(assignment.evaluate(expression)?);
    }
    Ok((variables, rows))
}

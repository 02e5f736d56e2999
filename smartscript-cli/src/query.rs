//! Minimizer queries
//!
//!     name(v1, v2, ...) = <minterms> [| <dont-cares>]
//!
//! Each side is either a boolean expression over the declared variables or an index list such
//! as `[0, 3, 5]`. Variables are case-insensitive and stored upper-cased; the first declared
//! variable is the most significant bit of an index.

use once_cell::sync::Lazy;
use regex::Regex;
use smartscript_config::MinimizerConfig;
use smartscript_core::boolean::{self, AssignmentError, MinimizerError, Minimizer, ParseError};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

static QUERY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*\(([^()]*)\)\s*=(.*)$")
        .expect("valid query regex")
});

static VARIABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid variable regex"));

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("expected `name(A, B, ...) = expression [| expression]`, got {0:?}")]
    Syntax(String),

    #[error("invalid variable name {0:?}")]
    InvalidVariable(String),

    #[error("missing expression after `{0}`")]
    EmptySide(&'static str),

    #[error("invalid index {0:?} in index list")]
    InvalidIndex(String),

    #[error("variable {name} is not declared in {function}")]
    UndeclaredVariable { name: String, function: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    #[error(transparent)]
    Minimizer(#[from] MinimizerError),
}

/// A parsed query, ready for the minimizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub name: String,
    pub variables: Vec<String>,
    pub minterms: BTreeSet<u32>,
    pub dont_cares: BTreeSet<u32>,
}

impl Query {
    pub fn parse(line: &str) -> Result<Self, QueryError> {
        let captures = QUERY_RE
            .captures(line)
            .ok_or_else(|| QueryError::Syntax(line.trim().to_string()))?;
        let name = captures[1].to_string();
        let variables = parse_variables(&captures[2])?;

        let (minterm_side, dont_care_side) = match captures[3].split_once('|') {
            Some((minterms, dont_cares)) => (minterms, Some(dont_cares)),
            None => (&captures[3], None),
        };

        let minterms = parse_side(minterm_side, "=", &name, &variables)?;
        let dont_cares = match dont_care_side {
            Some(side) => parse_side(side, "|", &name, &variables)?,
            None => BTreeSet::new(),
        };

        Ok(Self {
            name,
            variables,
            minterms,
            dont_cares,
        })
    }

    pub fn minimize(&self) -> Result<Minimizer, QueryError> {
        Ok(Minimizer::new(
            &self.minterms,
            &self.dont_cares,
            self.variables.clone(),
        )?)
    }

    /// Minimize and render the result as printable lines
    pub fn answer(&self, config: &MinimizerConfig) -> Result<Vec<String>, QueryError> {
        let minimizer = self.minimize()?;
        let mut lines = Vec::new();

        if config.show_primes {
            let primes: Vec<String> = minimizer
                .prime_implicants()
                .iter()
                .map(|p| p.to_string())
                .collect();
            lines.push(format!("{}: prime implicants {}", self, primes.join(", ")));
        }

        let forms = config.limit_forms(minimizer.minimal_forms_as_strings(config.operator_style));
        for form in forms {
            lines.push(format!("{} = {}", self, form));
        }
        Ok(lines)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.variables.join(", "))
    }
}

fn parse_variables(list: &str) -> Result<Vec<String>, QueryError> {
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }
    list.split(',')
        .map(|v| {
            let v = v.trim();
            if VARIABLE_RE.is_match(v) {
                Ok(v.to_uppercase())
            } else {
                Err(QueryError::InvalidVariable(v.to_string()))
            }
        })
        .collect()
}

fn parse_side(
    side: &str,
    after: &'static str,
    function: &str,
    variables: &[String],
) -> Result<BTreeSet<u32>, QueryError> {
    let side = side.trim();
    if side.is_empty() {
        return Err(QueryError::EmptySide(after));
    }

    if let Some(list) = side.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return parse_index_list(list);
    }

    let expression = boolean::parse_expression(side)?;
    if let Some(name) = expression
        .variables()
        .into_iter()
        .find(|name| !variables.contains(name))
    {
        return Err(QueryError::UndeclaredVariable {
            name,
            function: function.to_string(),
        });
    }
    Ok(boolean::assignments::minterms(&expression, variables)?)
}

fn parse_index_list(list: &str) -> Result<BTreeSet<u32>, QueryError> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<u32>()
                .map_err(|_| QueryError::InvalidIndex(item.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use smartscript_core::boolean::OperatorStyle;

    fn config(style: OperatorStyle, show_primes: bool) -> MinimizerConfig {
        MinimizerConfig {
            operator_style: style,
            max_forms: 0,
            show_primes,
        }
    }

    #[test]
    fn test_index_lists() {
        let query = Query::parse("g(a, b, c) = [1, 3] | [5, 7]").unwrap();
        assert_eq!(query.name, "g");
        assert_eq!(query.variables, vec!["A", "B", "C"]);
        assert_eq!(query.minterms, BTreeSet::from([1, 3]));
        assert_eq!(query.dont_cares, BTreeSet::from([5, 7]));
        assert_eq!(query.to_string(), "g(A, B, C)");
    }

    #[test]
    fn test_expression_side_uses_declared_order() {
        let query = Query::parse("f(B, A) = a and not b").unwrap();
        // B is the high bit: B=0, A=1 is index 1
        assert_eq!(query.minterms, BTreeSet::from([1]));
    }

    #[test]
    fn test_mixed_sides() {
        let query = Query::parse("h(A, B) = a xor b | [3]").unwrap();
        assert_eq!(query.minterms, BTreeSet::from([1, 2]));
        assert_eq!(query.dont_cares, BTreeSet::from([3]));
    }

    #[test]
    fn test_empty_index_list() {
        let query = Query::parse("z(A) = []").unwrap();
        assert!(query.minterms.is_empty());
        let lines = query.answer(&config(OperatorStyle::Word, false)).unwrap();
        assert_eq!(lines, vec!["z(A) = FALSE"]);
    }

    #[test]
    fn test_answer_lists_every_minimal_form() {
        let query = Query::parse("cyclic(A, B, C) = [0, 1, 2, 5, 6, 7]").unwrap();
        let lines = query.answer(&config(OperatorStyle::Symbolic, false)).unwrap();
        assert_eq!(
            lines,
            vec![
                "cyclic(A, B, C) = !A * !B + A * C + B * !C",
                "cyclic(A, B, C) = !A * !C + A * B + !B * C",
            ]
        );
    }

    #[test]
    fn test_answer_with_primes_and_dont_cares() {
        let query = Query::parse("g(A, B, C) = [1, 3] | [5, 7]").unwrap();
        let lines = query.answer(&config(OperatorStyle::Word, true)).unwrap();
        assert_eq!(lines, vec!["g(A, B, C): prime implicants DD1", "g(A, B, C) = C"]);
    }

    #[test]
    fn test_max_forms() {
        let query = Query::parse("cyclic(A, B, C) = [0, 1, 2, 5, 6, 7]").unwrap();
        let mut limited = config(OperatorStyle::Word, false);
        limited.max_forms = 1;
        assert_eq!(query.answer(&limited).unwrap().len(), 1);
    }

    #[rstest]
    #[case("f(A, B)")]
    #[case("f A, B = [0]")]
    #[case("(A, B) = [0]")]
    #[case("f(A, 1B) = [0]")]
    #[case("f(A, B) =")]
    #[case("f(A, B) = [0] |")]
    #[case("f(A, B) = [0, x]")]
    #[case("f(A, B) = a and c")]
    #[case("f(A, B) = a and")]
    #[case("f(A, B) = [4]")]
    #[case("f(A, B) = [0, 1] | [1]")]
    #[case("f(A, A) = [0]")]
    fn test_rejected_queries(#[case] line: &str) {
        let result = Query::parse(line).and_then(|q| q.minimize());
        assert!(result.is_err(), "{:?} should be rejected", line);
    }

    #[test]
    fn test_undeclared_variable_names_the_function() {
        let err = Query::parse("f(A, B) = a and c").unwrap_err();
        assert_eq!(err.to_string(), "variable C is not declared in f");
    }
}

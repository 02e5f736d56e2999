//! Runtime values and numeric coercion
//!
//! The engine moves [Value]s around: on the echo operand stack, on the multistack and in and
//! out of the execution context. Arithmetic never looks at a value directly. Both sides are
//! first normalized to a [Number]:
//!
//!     Null                  -> Integer 0
//!     Integer / Double      -> themselves
//!     String with . e E     -> Double, if it parses
//!     other String          -> Integer, if it parses
//!     anything else         -> ValueError::NotNumeric
//!
//! Integer op Integer stays Integer; as soon as one side is a Double the result is a Double.

use crate::script::error::ValueError;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A dynamically typed scalar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Double(f64),
    String(String),
}

impl Value {
    /// Read the value as a number, following the coercion table above
    pub fn to_number(&self) -> Result<Number, ValueError> {
        match self {
            Value::Null => Ok(Number::Integer(0)),
            Value::Integer(i) => Ok(Number::Integer(*i)),
            Value::Double(d) => Ok(Number::Double(*d)),
            Value::String(s) => Number::parse(s),
        }
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Integer(i) => Value::Integer(i),
            Number::Double(d) => Value::Double(d),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Double(d) => write!(f, "{}", format_double(*d)),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

/// Doubles always show a fractional part, so `2.0` does not print like the integer `2`
pub(crate) fn format_double(d: f64) -> String {
    if d.is_finite() && d.fract() == 0.0 && d.abs() < 1e16 {
        format!("{:.1}", d)
    } else {
        format!("{}", d)
    }
}

/// The numeric view of a [Value]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Double(f64),
}

impl Number {
    pub fn parse(s: &str) -> Result<Number, ValueError> {
        let not_numeric = || ValueError::NotNumeric {
            found: format!("string {:?}", s),
        };
        if s.contains(['.', 'e', 'E']) {
            s.parse::<f64>().map(Number::Double).map_err(|_| not_numeric())
        } else {
            s.parse::<i64>().map(Number::Integer).map_err(|_| not_numeric())
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(i) => i as f64,
            Number::Double(d) => d,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Integer(i) => i == 0,
            Number::Double(d) => d == 0.0,
        }
    }

    /// -1, 0 or 1
    pub fn signum(self) -> i32 {
        match self {
            Number::Integer(i) => i.signum() as i32,
            Number::Double(d) if d > 0.0 => 1,
            Number::Double(d) if d < 0.0 => -1,
            Number::Double(_) => 0,
        }
    }

    pub fn compare(self, other: Number) -> Ordering {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a.cmp(&b),
            (a, b) => a.as_f64().total_cmp(&b.as_f64()),
        }
    }
}

/// The arithmetic operations a wrapper supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operation {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Operation::Add),
            "-" => Some(Operation::Subtract),
            "*" => Some(Operation::Multiply),
            "/" => Some(Operation::Divide),
            "^" => Some(Operation::Power),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Operation::Add => "addition",
            Operation::Subtract => "subtraction",
            Operation::Multiply => "multiplication",
            Operation::Divide => "division",
            Operation::Power => "exponentiation",
        }
    }

    /// Apply the operation to two normalized operands
    pub fn apply(self, left: Number, right: Number) -> Result<Number, ValueError> {
        if self == Operation::Divide && right.is_zero() {
            return Err(ValueError::DivisionByZero);
        }
        let overflow = || ValueError::Overflow {
            operation: self.name(),
        };

        match (left, right) {
            (Number::Integer(a), Number::Integer(b)) => {
                let result = match self {
                    Operation::Add => a.checked_add(b),
                    Operation::Subtract => a.checked_sub(b),
                    Operation::Multiply => a.checked_mul(b),
                    Operation::Divide => a.checked_div(b),
                    Operation::Power if b < 0 => {
                        return Ok(Number::Double((a as f64).powf(b as f64)))
                    }
                    Operation::Power => u32::try_from(b).ok().and_then(|b| a.checked_pow(b)),
                };
                result.map(Number::Integer).ok_or_else(overflow)
            }
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                Ok(Number::Double(match self {
                    Operation::Add => a + b,
                    Operation::Subtract => a - b,
                    Operation::Multiply => a * b,
                    Operation::Divide => a / b,
                    Operation::Power => a.powf(b),
                }))
            }
        }
    }
}

/// A mutable cell holding one [Value]
///
/// The arithmetic methods replace the held value with the result; the operand passed in is
/// only read.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueWrapper {
    value: Value,
}

impl ValueWrapper {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn null() -> Self {
        Self { value: Value::Null }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn add(&mut self, operand: &Value) -> Result<(), ValueError> {
        self.apply(Operation::Add, operand)
    }

    pub fn subtract(&mut self, operand: &Value) -> Result<(), ValueError> {
        self.apply(Operation::Subtract, operand)
    }

    pub fn multiply(&mut self, operand: &Value) -> Result<(), ValueError> {
        self.apply(Operation::Multiply, operand)
    }

    pub fn divide(&mut self, operand: &Value) -> Result<(), ValueError> {
        self.apply(Operation::Divide, operand)
    }

    pub fn power(&mut self, operand: &Value) -> Result<(), ValueError> {
        self.apply(Operation::Power, operand)
    }

    /// Apply any operation; the held value is left untouched when it fails
    pub fn apply(&mut self, operation: Operation, operand: &Value) -> Result<(), ValueError> {
        let left = self.value.to_number()?;
        let right = operand.to_number()?;
        self.value = operation.apply(left, right)?.into();
        Ok(())
    }

    /// Compare numerically without changing either side
    pub fn num_compare(&self, operand: &Value) -> Result<Ordering, ValueError> {
        let left = self.value.to_number()?;
        let right = operand.to_number()?;
        Ok(left.compare(right))
    }
}

impl Default for ValueWrapper {
    fn default() -> Self {
        Self::null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_null_plus_numeric_string_is_integer() {
        let mut w = ValueWrapper::null();
        w.add(&Value::from("5")).unwrap();
        assert_eq!(w.value(), &Value::Integer(5));
    }

    #[test]
    fn test_integer_plus_double_is_double() {
        let mut w = ValueWrapper::new(Value::Integer(3));
        w.add(&Value::Double(2.5)).unwrap();
        assert_eq!(w.value(), &Value::Double(5.5));
    }

    #[rstest]
    #[case(Value::Integer(0))]
    #[case(Value::Double(0.0))]
    #[case(Value::from("0.0"))]
    #[case(Value::from("0"))]
    #[case(Value::Null)]
    fn test_division_by_zero(#[case] zero: Value) {
        let mut w = ValueWrapper::new(Value::Integer(7));
        assert_eq!(w.divide(&zero), Err(ValueError::DivisionByZero));
        assert_eq!(w.value(), &Value::Integer(7));
    }

    #[rstest]
    #[case(Value::Integer(7), Value::Integer(2), Value::Integer(3))]
    #[case(Value::Integer(-7), Value::Integer(2), Value::Integer(-3))]
    #[case(Value::Double(7.0), Value::Integer(2), Value::Double(3.5))]
    #[case(Value::from("1e1"), Value::from("4"), Value::Double(2.5))]
    fn test_division(#[case] left: Value, #[case] right: Value, #[case] expected: Value) {
        let mut w = ValueWrapper::new(left);
        w.divide(&right).unwrap();
        assert_eq!(w.into_value(), expected);
    }

    #[test]
    fn test_operand_is_not_mutated() {
        let operand = Value::from("12");
        let mut w = ValueWrapper::new(Value::Integer(1));
        w.multiply(&operand).unwrap();
        assert_eq!(operand, Value::from("12"));
        assert_eq!(w.value(), &Value::Integer(12));
    }

    #[test]
    fn test_non_numeric_string_is_type_error() {
        let mut w = ValueWrapper::new(Value::Integer(1));
        assert!(matches!(
            w.subtract(&Value::from("abc")),
            Err(ValueError::NotNumeric { .. })
        ));
        let mut w = ValueWrapper::new("x1");
        assert!(matches!(
            w.add(&Value::Integer(1)),
            Err(ValueError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_num_compare_does_not_mutate() {
        let w = ValueWrapper::new("2.5");
        assert_eq!(w.num_compare(&Value::Integer(3)).unwrap(), Ordering::Less);
        assert_eq!(w.num_compare(&Value::Null).unwrap(), Ordering::Greater);
        assert_eq!(w.num_compare(&Value::from("2.5")).unwrap(), Ordering::Equal);
        assert_eq!(w.value(), &Value::from("2.5"));
    }

    #[test]
    fn test_integer_overflow_is_reported() {
        let mut w = ValueWrapper::new(i64::MAX);
        assert!(matches!(
            w.add(&Value::Integer(1)),
            Err(ValueError::Overflow { .. })
        ));
    }

    #[rstest]
    #[case(Value::Integer(2), Value::Integer(10), Value::Integer(1024))]
    #[case(Value::Integer(2), Value::Integer(-1), Value::Double(0.5))]
    #[case(Value::Double(4.0), Value::Double(0.5), Value::Double(2.0))]
    fn test_power(#[case] left: Value, #[case] right: Value, #[case] expected: Value) {
        let mut w = ValueWrapper::new(left);
        w.power(&right).unwrap();
        assert_eq!(w.into_value(), expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Double(2.0).to_string(), "2.0");
        assert_eq!(Value::Double(0.25).to_string(), "0.25");
        assert_eq!(Value::Integer(-4).to_string(), "-4");
        assert_eq!(Value::from("txt").to_string(), "txt");
    }
}

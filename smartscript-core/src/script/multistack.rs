//! Named stacks of values
//!
//! The engine keeps loop variables here. Each name owns its own LIFO stack, so a nested loop
//! over the same name shadows the outer binding and restores it when it pops. Keys appear on
//! the first push and disappear when their stack empties.

use crate::script::error::MultistackError;
use crate::script::value::ValueWrapper;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Multistack {
    stacks: HashMap<String, Vec<ValueWrapper>>,
}

impl Multistack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, value: ValueWrapper) {
        self.stacks.entry(name.to_string()).or_default().push(value);
    }

    pub fn pop(&mut self, name: &str) -> Result<ValueWrapper, MultistackError> {
        let stack = self
            .stacks
            .get_mut(name)
            .ok_or_else(|| MultistackError::EmptyStack(name.to_string()))?;
        let value = stack
            .pop()
            .ok_or_else(|| MultistackError::EmptyStack(name.to_string()))?;
        if stack.is_empty() {
            self.stacks.remove(name);
        }
        Ok(value)
    }

    pub fn peek(&self, name: &str) -> Result<&ValueWrapper, MultistackError> {
        self.stacks
            .get(name)
            .and_then(|stack| stack.last())
            .ok_or_else(|| MultistackError::EmptyStack(name.to_string()))
    }

    pub fn peek_mut(&mut self, name: &str) -> Result<&mut ValueWrapper, MultistackError> {
        self.stacks
            .get_mut(name)
            .and_then(|stack| stack.last_mut())
            .ok_or_else(|| MultistackError::EmptyStack(name.to_string()))
    }

    pub fn is_empty(&self, name: &str) -> bool {
        !self.stacks.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::value::Value;

    #[test]
    fn test_push_peek_pop() {
        let mut stack = Multistack::new();
        stack.push("i", ValueWrapper::new(Value::Integer(1)));
        stack.push("i", ValueWrapper::new(Value::Integer(2)));
        assert_eq!(stack.peek("i").unwrap().value(), &Value::Integer(2));
        assert_eq!(stack.pop("i").unwrap().into_value(), Value::Integer(2));
        assert_eq!(stack.pop("i").unwrap().into_value(), Value::Integer(1));
        assert!(stack.is_empty("i"));
        assert!(stack.stacks.is_empty());
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let mut stack = Multistack::new();
        assert_eq!(
            stack.pop("x").unwrap_err(),
            MultistackError::EmptyStack("x".into())
        );
        assert!(stack.peek("x").is_err());
        assert!(stack.peek_mut("x").is_err());
    }

    #[test]
    fn test_names_are_independent() {
        let mut stack = Multistack::new();
        stack.push("a", ValueWrapper::new("1"));
        stack.push("b", ValueWrapper::new("2"));
        stack.peek_mut("a").unwrap().add(&Value::Integer(10)).unwrap();
        assert_eq!(stack.peek("a").unwrap().value(), &Value::Integer(11));
        assert_eq!(stack.peek("b").unwrap().value(), &Value::from("2"));
    }
}

//! SmartScript execution
//!
//!     The engine walks a parsed document in document order:
//!
//!         Text      written verbatim to the context
//!         ForLoop   binds the loop variable on the multistack, runs the body while the
//!                   variable has not passed the end value, then unbinds it
//!         Echo      runs the elements as a stack program and writes what is left on the stack
//!
//!     Loop direction follows the sign of the step: the body runs while
//!     `compare(current, end) * sign(step) <= 0`. A zero step is rejected before the first
//!     iteration.
//!
//!     Variable references resolve against, in order: the innermost loop binding, temporary
//!     parameters, persistent parameters and request parameters.
//!
//! Every error aborts the whole execution. Output written before the error stays written.

pub mod context;
pub mod decfmt;
pub mod functions;

pub use context::{ExecutionContext, RequestContext, DEFAULT_MIME_TYPE};

use crate::script::ast::{Element, ForLoopNode, Node};
use crate::script::error::{ExecError, ValueError};
use crate::script::multistack::Multistack;
use crate::script::value::{Operation, Value, ValueWrapper};
use log::debug;

/// Engine limits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Abort a single FOR loop after this many iterations
    pub max_loop_iterations: Option<u64>,
}

impl EngineOptions {
    pub fn with_max_loop_iterations(limit: u64) -> Self {
        Self {
            max_loop_iterations: Some(limit),
        }
    }
}

/// The operand stack of one echo tag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperandStack {
    values: Vec<Value>,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pop the top `N` values, returned in push order
    ///
    /// Nothing is popped when fewer than `N` values are available.
    pub fn pop_args<const N: usize>(&mut self, symbol: &str) -> Result<[Value; N], ExecError> {
        let available = self.values.len();
        if available < N {
            return Err(ExecError::StackUnderflow {
                symbol: symbol.to_string(),
                needed: N,
                available,
            });
        }
        let args = self.values.split_off(available - N);
        args.try_into().map_err(|_| ExecError::StackUnderflow {
            symbol: symbol.to_string(),
            needed: N,
            available,
        })
    }

    /// Remaining values, bottom first
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl From<Vec<Value>> for OperandStack {
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}

/// Executes one document against one context
pub struct ScriptEngine<'a> {
    document: &'a Node,
    ctx: &'a mut dyn ExecutionContext,
    multistack: Multistack,
    options: EngineOptions,
}

impl<'a> ScriptEngine<'a> {
    pub fn new(document: &'a Node, ctx: &'a mut dyn ExecutionContext) -> Self {
        Self::with_options(document, ctx, EngineOptions::default())
    }

    pub fn with_options(
        document: &'a Node,
        ctx: &'a mut dyn ExecutionContext,
        options: EngineOptions,
    ) -> Self {
        Self {
            document,
            ctx,
            multistack: Multistack::new(),
            options,
        }
    }

    pub fn execute(&mut self) -> Result<(), ExecError> {
        let document = self.document;
        self.visit(document)
    }

    fn visit(&mut self, node: &Node) -> Result<(), ExecError> {
        match node {
            Node::Document { children } => {
                for child in children {
                    self.visit(child)?;
                }
                Ok(())
            }
            Node::Text { content } => Ok(self.ctx.write(content.as_bytes())?),
            Node::ForLoop(for_loop) => self.visit_for(for_loop),
            Node::Echo { elements } => self.visit_echo(elements),
        }
    }

    fn visit_for(&mut self, node: &ForLoopNode) -> Result<(), ExecError> {
        let start = self.loop_argument(&node.start)?;
        let end = self.loop_argument(&node.end)?;
        let step = match &node.step {
            Some(step) => self.loop_argument(step)?,
            None => Value::Integer(1),
        };

        let direction = step.to_number()?.signum();
        if direction == 0 {
            return Err(ExecError::ZeroStep {
                variable: node.variable.clone(),
            });
        }

        self.multistack.push(&node.variable, ValueWrapper::new(start));
        let result = self.run_loop(node, &end, &step, direction);
        self.multistack.pop(&node.variable)?;
        result
    }

    fn run_loop(
        &mut self,
        node: &ForLoopNode,
        end: &Value,
        step: &Value,
        direction: i32,
    ) -> Result<(), ExecError> {
        let mut iterations: u64 = 0;
        loop {
            let ordering = self.multistack.peek(&node.variable)?.num_compare(end)?;
            if (ordering as i32) * direction > 0 {
                break;
            }
            if let Some(limit) = self.options.max_loop_iterations {
                if iterations >= limit {
                    return Err(ExecError::IterationLimit {
                        variable: node.variable.clone(),
                        limit,
                    });
                }
            }
            iterations += 1;

            for child in &node.children {
                self.visit(child)?;
            }
            match self.multistack.peek_mut(&node.variable)?.add(step) {
                Ok(()) => {}
                // An unrepresentable next value lies past every integer end
                Err(ValueError::Overflow { .. }) => break,
                Err(error) => return Err(error.into()),
            }
        }
        debug!(
            "FOR loop over '{}' finished after {} iterations",
            node.variable, iterations
        );
        Ok(())
    }

    fn visit_echo(&mut self, elements: &[Element]) -> Result<(), ExecError> {
        let mut stack = OperandStack::new();
        for element in elements {
            match element {
                Element::Variable(name) => stack.push(self.resolve_variable(name)?),
                Element::ConstantInteger(i) => stack.push(Value::Integer(*i)),
                Element::ConstantDouble(d) => stack.push(Value::Double(*d)),
                Element::StringLiteral(s) => stack.push(Value::String(s.clone())),
                Element::Operator(symbol) => {
                    let operation = Operation::from_symbol(symbol)
                        .ok_or_else(|| ExecError::UnknownOperator(symbol.clone()))?;
                    let [left, right] = stack.pop_args::<2>(symbol)?;
                    let mut result = ValueWrapper::new(left);
                    result.apply(operation, &right)?;
                    stack.push(result.into_value());
                }
                Element::Function(name) => {
                    let builtin = functions::lookup(name)
                        .ok_or_else(|| ExecError::UnknownFunction(name.clone()))?;
                    builtin(&mut stack, &mut *self.ctx)?;
                }
            }
        }

        for value in stack.into_values() {
            self.ctx.write(value.to_string().as_bytes())?;
        }
        Ok(())
    }

    fn resolve_variable(&self, name: &str) -> Result<Value, ExecError> {
        if let Ok(binding) = self.multistack.peek(name) {
            return Ok(binding.value().clone());
        }
        self.ctx
            .get_temporary(name)
            .or_else(|| self.ctx.get_persistent(name))
            .or_else(|| self.ctx.get_parameter(name))
            .map(Value::String)
            .ok_or_else(|| ExecError::MissingVariable(name.to_string()))
    }

    fn loop_argument(&self, element: &Element) -> Result<Value, ExecError> {
        match element {
            Element::Variable(name) => self.resolve_variable(name),
            Element::ConstantInteger(i) => Ok(Value::Integer(*i)),
            Element::ConstantDouble(d) => Ok(Value::Double(*d)),
            Element::StringLiteral(s) => Ok(Value::String(s.clone())),
            Element::Operator(symbol) => Err(ExecError::UnknownOperator(symbol.clone())),
            Element::Function(name) => Err(ExecError::UnknownFunction(name.clone())),
        }
    }
}

/// Execute a document against a context with default options
pub fn execute(document: &Node, ctx: &mut dyn ExecutionContext) -> Result<(), ExecError> {
    ScriptEngine::new(document, ctx).execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parsing::parse_document;
    use std::collections::HashMap;
    use std::io;

    fn run(source: &str) -> Result<String, ExecError> {
        run_with(source, RequestContext::new(Vec::new())).map(|(out, _)| out)
    }

    fn run_with(
        source: &str,
        mut ctx: RequestContext<Vec<u8>>,
    ) -> Result<(String, RequestContext<Vec<u8>>), ExecError> {
        let document = parse_document(source).expect("source parses");
        execute(&document, &mut ctx)?;
        let out = String::from_utf8(ctx.output().clone()).expect("utf-8 output");
        Ok((out, ctx))
    }

    #[test]
    fn test_text_is_written_verbatim() {
        assert_eq!(run("plain \\{$ text").unwrap(), "plain {$ text");
    }

    #[test]
    fn test_simple_loop() {
        assert_eq!(run("{$FOR i 1 3$}{$= i $},{$END$}").unwrap(), "1,2,3,");
    }

    #[test]
    fn test_loop_with_step_and_double_end() {
        assert_eq!(run("{$FOR i 0 1.0 \"0.5\"$}{$= i $} {$END$}").unwrap(), "0 0.5 1.0 ");
    }

    #[test]
    fn test_negative_step_counts_down() {
        assert_eq!(run("{$FOR i 3 1 -1$}{$= i $}{$END$}").unwrap(), "321");
    }

    #[test]
    fn test_loop_that_never_starts() {
        assert_eq!(run("a{$FOR i 5 1$}x{$END$}b").unwrap(), "ab");
        assert_eq!(run("a{$FOR i 1 5 -1$}x{$END$}b").unwrap(), "ab");
    }

    #[test]
    fn test_loop_ending_at_integer_limits() {
        assert_eq!(
            run("{$FOR i 9223372036854775806 9223372036854775807$}{$= i $};{$END$}").unwrap(),
            "9223372036854775806;9223372036854775807;"
        );
        assert_eq!(
            run("{$FOR i -9223372036854775807 -9223372036854775808 -1$}{$= i $};{$END$}")
                .unwrap(),
            "-9223372036854775807;-9223372036854775808;"
        );
    }

    #[test]
    fn test_zero_step_is_rejected() {
        assert!(matches!(
            run("{$FOR i 1 3 0$}{$END$}"),
            Err(ExecError::ZeroStep { .. })
        ));
    }

    #[test]
    fn test_nested_loops_shadow_and_restore() {
        let source = "{$FOR i 1 2$}[{$FOR i 10 11$}{$= i $}{$END$}{$= i $}]{$END$}";
        assert_eq!(run(source).unwrap(), "[10111][10112]");
    }

    #[test]
    fn test_inner_loop_uses_outer_variable() {
        let source = "{$FOR i 1 3$}{$FOR j i 3$}{$= j $}{$END$};{$END$}";
        assert_eq!(run(source).unwrap(), "123;23;3;");
    }

    #[test]
    fn test_loop_variable_is_unbound_after_loop() {
        assert!(matches!(
            run("{$FOR i 1 1$}{$END$}{$= i $}"),
            Err(ExecError::MissingVariable(name)) if name == "i"
        ));
    }

    #[test]
    fn test_echo_arithmetic() {
        assert_eq!(run("{$= 1 2 + 3 * $}").unwrap(), "9");
        assert_eq!(run("{$= 2 10 ^ $}").unwrap(), "1024");
        assert_eq!(run("{$= \"1.5\" 2 * $}").unwrap(), "3.0");
    }

    #[test]
    fn test_echo_writes_remaining_values_bottom_to_top() {
        assert_eq!(run("{$= \"a\" 1 2.5 $}").unwrap(), "a12.5");
        assert_eq!(run("{$=$}").unwrap(), "");
    }

    #[test]
    fn test_operator_underflow() {
        assert!(matches!(
            run("{$= 1 + $}"),
            Err(ExecError::StackUnderflow {
                needed: 2,
                available: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_division_by_zero_aborts() {
        let err = run("before{$= 1 0 / $}after").unwrap_err();
        assert!(matches!(err, ExecError::Value(ValueError::DivisionByZero)));
    }

    #[test]
    fn test_unknown_function() {
        assert!(matches!(
            run("{$= 1 @cos $}"),
            Err(ExecError::UnknownFunction(name)) if name == "cos"
        ));
    }

    #[test]
    fn test_variable_resolution_order() {
        let mut params = HashMap::new();
        params.insert("a".to_string(), "request".to_string());
        params.insert("b".to_string(), "request".to_string());
        let mut persistent = HashMap::new();
        persistent.insert("a".to_string(), "persistent".to_string());
        let ctx = RequestContext::new(Vec::new())
            .with_parameters(params)
            .with_persistent(persistent);

        let (out, _) = run_with("{$= a $} {$= b $}", ctx).unwrap();
        assert_eq!(out, "persistent request");
    }

    #[test]
    fn test_request_parameters_drive_loops() {
        let mut params = HashMap::new();
        params.insert("n".to_string(), "3".to_string());
        let ctx = RequestContext::new(Vec::new()).with_parameters(params);
        let (out, _) = run_with("{$FOR i 1 n$}*{$END$}", ctx).unwrap();
        assert_eq!(out, "***");
    }

    #[test]
    fn test_persistent_counter() {
        let source = "{$= \"calls\" \"0\" @pparamGet 1 + \"calls\" @pparamSet $}\
                      {$= \"calls\" \"0\" @pparamGet $}";
        let (out, ctx) = run_with(source, RequestContext::new(Vec::new())).unwrap();
        assert_eq!(out, "1");
        assert_eq!(ctx.persistent().get("calls").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_fibonacci_with_temporary_parameters() {
        let source = "{$= \"0\" \"a\" @tparamSet \"1\" \"b\" @tparamSet $}\
                      {$FOR i 1 6$}{$= a \" \" $}\
                      {$= a b + b \"a\" @tparamSet \"b\" @tparamSet $}{$END$}";
        assert_eq!(run(source).unwrap(), "0 1 1 2 3 5 ");
    }

    #[test]
    fn test_iteration_limit() {
        let document = parse_document("{$FOR i 1 100$}{$END$}").unwrap();
        let mut ctx = RequestContext::new(Vec::new());
        let mut engine = ScriptEngine::with_options(
            &document,
            &mut ctx,
            EngineOptions::with_max_loop_iterations(10),
        );
        assert!(matches!(
            engine.execute(),
            Err(ExecError::IterationLimit { limit: 10, .. })
        ));
    }

    struct FailingWriter;

    impl io::Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_aborts() {
        let document = parse_document("text").unwrap();
        let mut ctx = RequestContext::new(FailingWriter);
        assert!(matches!(
            execute(&document, &mut ctx),
            Err(ExecError::Io(_))
        ));
    }

    #[test]
    fn test_pop_args_order() {
        let mut stack = OperandStack::from(vec![Value::Integer(1), Value::Integer(2)]);
        let [a, b] = stack.pop_args::<2>("-").unwrap();
        assert_eq!((a, b), (Value::Integer(1), Value::Integer(2)));
        assert!(stack.is_empty());
    }
}

//! Built-in functions callable from echo tags as `@name`
//!
//! A function pops its arguments from the operand stack (the last argument is on top) and may
//! push results. Arity is checked before anything is popped, so a failing call leaves the
//! stack as it was.

use super::context::ExecutionContext;
use super::decfmt::format_decimal;
use super::OperandStack;
use crate::script::error::ExecError;
use crate::script::value::Value;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub type Builtin = fn(&mut OperandStack, &mut dyn ExecutionContext) -> Result<(), ExecError>;

static BUILTINS: Lazy<HashMap<&'static str, Builtin>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, Builtin> = HashMap::new();
    table.insert("sin", sin);
    table.insert("decfmt", decfmt);
    table.insert("dup", dup);
    table.insert("swap", swap);
    table.insert("setMimeType", set_mime_type);
    table.insert("paramGet", param_get);
    table.insert("pparamGet", pparam_get);
    table.insert("pparamSet", pparam_set);
    table.insert("pparamDel", pparam_del);
    table.insert("tparamGet", tparam_get);
    table.insert("tparamSet", tparam_set);
    table.insert("tparamDel", tparam_del);
    table
});

pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.get(name).copied()
}

/// Names of all built-in functions, sorted
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<_> = BUILTINS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// sin(x), x in degrees
fn sin(stack: &mut OperandStack, _: &mut dyn ExecutionContext) -> Result<(), ExecError> {
    let [x] = stack.pop_args::<1>("@sin")?;
    let x = x.to_number()?.as_f64();
    stack.push(Value::Double(x.to_radians().sin()));
    Ok(())
}

/// decfmt(x, pattern)
fn decfmt(stack: &mut OperandStack, _: &mut dyn ExecutionContext) -> Result<(), ExecError> {
    let [x, pattern] = stack.pop_args::<2>("@decfmt")?;
    let x = x.to_number()?.as_f64();
    let pattern = pattern.to_string();
    let formatted =
        format_decimal(x, &pattern).ok_or_else(|| ExecError::InvalidPattern(pattern.clone()))?;
    stack.push(Value::String(formatted));
    Ok(())
}

fn dup(stack: &mut OperandStack, _: &mut dyn ExecutionContext) -> Result<(), ExecError> {
    let [x] = stack.pop_args::<1>("@dup")?;
    stack.push(x.clone());
    stack.push(x);
    Ok(())
}

fn swap(stack: &mut OperandStack, _: &mut dyn ExecutionContext) -> Result<(), ExecError> {
    let [a, b] = stack.pop_args::<2>("@swap")?;
    stack.push(b);
    stack.push(a);
    Ok(())
}

fn set_mime_type(stack: &mut OperandStack, ctx: &mut dyn ExecutionContext) -> Result<(), ExecError> {
    let [mime_type] = stack.pop_args::<1>("@setMimeType")?;
    ctx.set_mime_type(&mime_type.to_string());
    Ok(())
}

/// paramGet(name, default)
fn param_get(stack: &mut OperandStack, ctx: &mut dyn ExecutionContext) -> Result<(), ExecError> {
    let [name, default] = stack.pop_args::<2>("@paramGet")?;
    let value = ctx.get_parameter(&name.to_string());
    stack.push(value.map(Value::String).unwrap_or(default));
    Ok(())
}

/// pparamGet(name, default)
fn pparam_get(stack: &mut OperandStack, ctx: &mut dyn ExecutionContext) -> Result<(), ExecError> {
    let [name, default] = stack.pop_args::<2>("@pparamGet")?;
    let value = ctx.get_persistent(&name.to_string());
    stack.push(value.map(Value::String).unwrap_or(default));
    Ok(())
}

/// pparamSet(value, name)
fn pparam_set(stack: &mut OperandStack, ctx: &mut dyn ExecutionContext) -> Result<(), ExecError> {
    let [value, name] = stack.pop_args::<2>("@pparamSet")?;
    ctx.set_persistent(&name.to_string(), value.to_string());
    Ok(())
}

fn pparam_del(stack: &mut OperandStack, ctx: &mut dyn ExecutionContext) -> Result<(), ExecError> {
    let [name] = stack.pop_args::<1>("@pparamDel")?;
    ctx.remove_persistent(&name.to_string());
    Ok(())
}

/// tparamGet(name, default)
fn tparam_get(stack: &mut OperandStack, ctx: &mut dyn ExecutionContext) -> Result<(), ExecError> {
    let [name, default] = stack.pop_args::<2>("@tparamGet")?;
    let value = ctx.get_temporary(&name.to_string());
    stack.push(value.map(Value::String).unwrap_or(default));
    Ok(())
}

/// tparamSet(value, name)
fn tparam_set(stack: &mut OperandStack, ctx: &mut dyn ExecutionContext) -> Result<(), ExecError> {
    let [value, name] = stack.pop_args::<2>("@tparamSet")?;
    ctx.set_temporary(&name.to_string(), value.to_string());
    Ok(())
}

fn tparam_del(stack: &mut OperandStack, ctx: &mut dyn ExecutionContext) -> Result<(), ExecError> {
    let [name] = stack.pop_args::<1>("@tparamDel")?;
    ctx.remove_temporary(&name.to_string());
    Ok(())
}

//! Execution context: everything a script can read from or write to
//!
//! The engine never owns its inputs or its output. A caller hands it an [ExecutionContext],
//! which supplies read-only request parameters, read/write persistent and temporary
//! parameters, and the output sink. [RequestContext] is the in-process implementation used by
//! the CLI and the tests.

use std::collections::HashMap;
use std::io::{self, Write};

pub const DEFAULT_MIME_TYPE: &str = "text/html";

pub trait ExecutionContext {
    /// Request parameters, never modified by a script
    fn get_parameter(&self, name: &str) -> Option<String>;

    fn get_persistent(&self, name: &str) -> Option<String>;
    fn set_persistent(&mut self, name: &str, value: String);
    fn remove_persistent(&mut self, name: &str);

    fn get_temporary(&self, name: &str) -> Option<String>;
    fn set_temporary(&mut self, name: &str, value: String);
    fn remove_temporary(&mut self, name: &str);

    fn set_mime_type(&mut self, mime_type: &str);

    /// Write raw output; a failure aborts execution
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;
}

/// Parameter maps plus an owned writer
#[derive(Debug)]
pub struct RequestContext<W: Write> {
    output: W,
    parameters: HashMap<String, String>,
    persistent: HashMap<String, String>,
    temporary: HashMap<String, String>,
    mime_type: String,
}

impl<W: Write> RequestContext<W> {
    pub fn new(output: W) -> Self {
        Self {
            output,
            parameters: HashMap::new(),
            persistent: HashMap::new(),
            temporary: HashMap::new(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
        }
    }

    pub fn with_parameters(mut self, parameters: HashMap<String, String>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_persistent(mut self, persistent: HashMap<String, String>) -> Self {
        self.persistent = persistent;
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }

    pub fn persistent(&self) -> &HashMap<String, String> {
        &self.persistent
    }

    pub fn temporary(&self) -> &HashMap<String, String> {
        &self.temporary
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<W: Write> ExecutionContext for RequestContext<W> {
    fn get_parameter(&self, name: &str) -> Option<String> {
        self.parameters.get(name).cloned()
    }

    fn get_persistent(&self, name: &str) -> Option<String> {
        self.persistent.get(name).cloned()
    }

    fn set_persistent(&mut self, name: &str, value: String) {
        self.persistent.insert(name.to_string(), value);
    }

    fn remove_persistent(&mut self, name: &str) {
        self.persistent.remove(name);
    }

    fn get_temporary(&self, name: &str) -> Option<String> {
        self.temporary.get(name).cloned()
    }

    fn set_temporary(&mut self, name: &str, value: String) {
        self.temporary.insert(name.to_string(), value);
    }

    fn remove_temporary(&mut self, name: &str) {
        self.temporary.remove(name);
    }

    fn set_mime_type(&mut self, mime_type: &str) {
        self.mime_type = mime_type.to_string();
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.output.write_all(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_maps_are_separate() {
        let mut params = HashMap::new();
        params.insert("a".to_string(), "1".to_string());
        let mut ctx = RequestContext::new(Vec::new()).with_parameters(params);

        ctx.set_persistent("a", "2".into());
        ctx.set_temporary("a", "3".into());
        assert_eq!(ctx.get_parameter("a").as_deref(), Some("1"));
        assert_eq!(ctx.get_persistent("a").as_deref(), Some("2"));
        assert_eq!(ctx.get_temporary("a").as_deref(), Some("3"));

        ctx.remove_persistent("a");
        ctx.remove_temporary("a");
        assert_eq!(ctx.get_persistent("a"), None);
        assert_eq!(ctx.get_temporary("a"), None);
    }

    #[test]
    fn test_write_goes_to_output() {
        let mut ctx = RequestContext::new(Vec::new());
        ctx.write(b"abc").unwrap();
        ctx.write("ž".as_bytes()).unwrap();
        assert_eq!(String::from_utf8(ctx.into_output()).unwrap(), "abcž");
    }

    #[test]
    fn test_mime_type() {
        let mut ctx = RequestContext::new(Vec::new());
        assert_eq!(ctx.mime_type(), DEFAULT_MIME_TYPE);
        ctx.set_mime_type("text/plain");
        assert_eq!(ctx.mime_type(), "text/plain");
    }
}

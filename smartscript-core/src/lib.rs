//! # smartscript-core
//!
//! Two small language toolchains that share one shape: lexer, parser, AST and a consumer
//! of that AST.
//!
//! Layout
//!
//!     src/script     SmartScript templates: text with `{$ ... $}` tags, parsed into a
//!                    document tree and executed against an [ExecutionContext](script::ExecutionContext).
//!     src/boolean    Boolean expressions: parsed into an n-ary expression tree, evaluated over
//!                    truth assignments and minimized with Quine-McCluskey.
//!     src/formats    Renderings of both trees that are meant for humans (treeviz).
//!
//! Both toolchains are synchronous and single threaded. Every error is fatal to the call that
//! produced it and is returned as a value; nothing is recovered internally.

pub mod boolean;
pub mod formats;
pub mod script;

//! Output formats meant for people rather than programs
//!
//! Machine-readable output (token and AST JSON) comes straight from the serde derives on the
//! tree types and needs no module of its own.

pub mod treeviz;

pub use treeviz::{to_treeviz_str, TreeNode};

//! # Stencil
//!
//! A small templating engine for generating static, locale-specific pages.
//!
//! Templates are plain text with four tag kinds: `{{path}}` and `{{{path}}}`
//! placeholders, `{{#if path}}...{{/if}}` conditionals and
//! `{{#each path}}...{{/each}}` iteration, where `path` is a dot-separated
//! lookup into the context. Rendering never fails: absent placeholders keep
//! their literal tag text, malformed blocks stay in the output unexpanded.
//!
//! ## Example
//!
//! ```rust
//! use stencil::{render, Context};
//!
//! let mut context = Context::new();
//! context.insert("name", &"World");
//! context.insert("items", &vec!["a", "b"]);
//!
//! assert_eq!(render("Hello {{name}}!", &context), "Hello World!");
//! assert_eq!(
//!     render("<ul>{{#each items}}<li>{{this}}</li>{{/each}}</ul>", &context),
//!     "<ul><li>a</li><li>b</li></ul>"
//! );
//! ```
//!
//! The [`Site`] type wraps the engine into the full build pipeline used by
//! the `stencil` binary: render one page per locale data file and copy
//! static assets alongside.

#![deny(missing_docs)]

mod context;
mod errors;
mod lexer;
mod nodes;
mod parser;
mod renderer;
mod site;
mod template;

pub use crate::context::{dotted_pointer, Context, JsonRender, JsonTruthy};
pub use crate::errors::{Error, ErrorKind, Result};
pub use crate::site::Site;
pub use crate::template::Template;
// Re-export Value and other useful things from serde
// so apps/tools can encode data in template types
pub use serde_json::value::{from_value, to_value, Map, Number, Value};

/// Renders a one-off template against a context.
///
/// This is the whole contract of the rendering core: a pure function from a
/// template string and a data tree to output text.
pub fn render(template: &str, context: &Context) -> String {
    Template::new("inline", template).render(context)
}

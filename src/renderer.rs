use serde_json::Value;

use crate::context::{dotted_pointer, JsonRender, JsonTruthy};
use crate::nodes::Node;

/// Bound on block nesting while rendering. Substitutes for an iteration cap:
/// past it a block emits its source text instead of evaluating, so even a
/// pathological template terminates with best-effort output.
const MAX_RENDER_DEPTH: usize = 100;

const THIS_TAG: &str = "{{this}}";

/// Walks a node tree and accumulates the output text.
///
/// Rendering never fails: absent placeholders keep their literal tag text,
/// absent or falsy conditions drop their body, and an each over anything that
/// is not a sequence expands to nothing.
#[derive(Debug)]
pub struct Renderer<'a> {
    context: &'a Value,
    output: String,
}

impl<'a> Renderer<'a> {
    pub fn new(context: &'a Value) -> Renderer<'a> {
        Renderer {
            context,
            output: String::new(),
        }
    }

    pub fn render(mut self, nodes: &[Node]) -> String {
        let context = self.context;
        self.render_nodes(nodes, context, 1);
        self.output
    }

    fn render_nodes(&mut self, nodes: &[Node], context: &Value, depth: usize) {
        for node in nodes {
            self.render_node(node, context, depth);
        }
    }

    fn render_node(&mut self, node: &Node, context: &Value, depth: usize) {
        match node {
            Node::Text(text) => self.output.push_str(text),
            Node::Variable { path, .. } => match dotted_pointer(context, path) {
                Some(value) => self.output.push_str(&value.render()),
                // absent is not empty: the tag text stays in the output
                None => self.output.push_str(&node.to_string()),
            },
            Node::If { path, body, .. } => {
                if depth > MAX_RENDER_DEPTH {
                    self.output.push_str(&node.to_string());
                    return;
                }
                let truthy = dotted_pointer(context, path).map_or(false, JsonTruthy::is_truthy);
                if truthy {
                    self.render_nodes(body, context, depth + 1);
                }
            }
            Node::Each { path, body, raw_body } => {
                if depth > MAX_RENDER_DEPTH {
                    self.output.push_str(&node.to_string());
                    return;
                }
                let items = match dotted_pointer(context, path) {
                    Some(Value::Array(items)) => items,
                    // anything that is not a sequence expands to nothing
                    _ => return,
                };
                for item in items {
                    match item {
                        // String items only get `{{this}}` substituted into the
                        // raw body; nested tags in there are left alone.
                        Value::String(s) => self.output.push_str(&raw_body.replace(THIS_TAG, s)),
                        // Everything else becomes the context of a full
                        // recursive evaluation of the body.
                        _ => self.render_nodes(body, item, depth + 1),
                    }
                }
            }
        }
    }
}

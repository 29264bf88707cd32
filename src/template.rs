use crate::context::Context;
use crate::nodes::Node;
use crate::parser::Parser;
use crate::renderer::Renderer;

/// A parsed template and the entry point for rendering it.
///
/// Parsing never fails: malformed tags stay in the tree as literal text, so
/// the worst template still renders to something.
#[derive(Clone, PartialEq, Debug)]
pub struct Template {
    /// Name of the template, used for logging by callers
    pub name: String,
    ast: Vec<Node>,
}

impl Template {
    /// Parses a template string.
    pub fn new(name: &str, input: &str) -> Template {
        let mut parser = Parser::new(input);
        parser.parse();

        Template {
            name: name.to_owned(),
            ast: parser.nodes,
        }
    }

    /// Renders the template against the given context.
    ///
    /// Pure and deterministic: no IO, no shared state, safe to call from any
    /// number of threads at once.
    pub fn render(&self, context: &Context) -> String {
        let data = context.clone().into_json();
        Renderer::new(&data).render(&self.ast)
    }
}

#[cfg(test)]
mod tests {
    use super::Template;
    use crate::context::Context;

    #[test]
    fn test_render_simple_string() {
        let template = Template::new("index", "<h1>Hello world</h1>");
        assert_eq!(template.render(&Context::new()), "<h1>Hello world</h1>");
    }

    #[test]
    fn test_template_is_reusable() {
        let template = Template::new("greeting", "Hello {{name}}!");

        let mut context = Context::new();
        context.insert("name", &"World");
        assert_eq!(template.render(&context), "Hello World!");

        let mut context = Context::new();
        context.insert("name", &"世界");
        assert_eq!(template.render(&context), "Hello 世界!");
    }
}

use crate::lexer::{Lexer, Token, TokenKind};
use crate::nodes::Node;

#[derive(Copy, Clone, PartialEq, Debug)]
enum BlockKind {
    Each,
    If,
}

/// A block whose closing tag has not been seen yet.
#[derive(Debug)]
struct OpenBlock {
    kind: BlockKind,
    path: String,
    /// Byte offset of the opening tag
    open_start: usize,
    /// Byte offset just past the opening tag, where the body starts
    body_start: usize,
    children: Vec<Node>,
}

/// Builds the node tree out of the token stream.
///
/// Nesting is tracked with an explicit stack, one frame per open block.
/// Openers and closers pair up by tag kind, not by the path they name, so two
/// nested `{{#each}}` blocks over different paths still match correctly.
///
/// Malformed templates degrade instead of erroring:
/// - a closer without a matching open block becomes literal text;
/// - an open block interleaved with the other kind (`{{#each a}}{{#if b}}{{/each}}`)
///   is degraded: its opening tag becomes literal text and its children are
///   hoisted into the enclosing block;
/// - a block still open at the end of input turns the whole span from its
///   opening tag to the end into literal text.
#[derive(Debug)]
pub struct Parser<'a> {
    input: &'a str,
    stack: Vec<OpenBlock>,
    pub nodes: Vec<Node>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Parser<'a> {
        Parser {
            input,
            stack: vec![],
            nodes: vec![],
        }
    }

    pub fn parse(&mut self) {
        let mut lexer = Lexer::new(self.input);
        lexer.run();

        for token in lexer.tokens {
            self.parse_token(token);
        }
        self.finish();
    }

    fn parse_token(&mut self, token: Token) {
        let Token { kind, start, end } = token;
        match kind {
            TokenKind::Text => {
                let text = self.input[start..end].to_owned();
                self.push_node(Node::Text(text));
            }
            TokenKind::Variable(path) => {
                self.push_node(Node::Variable { path, raw: false });
            }
            TokenKind::RawVariable(path) => {
                self.push_node(Node::Variable { path, raw: true });
            }
            TokenKind::EachOpen(path) => self.open_block(BlockKind::Each, path, start, end),
            TokenKind::IfOpen(path) => self.open_block(BlockKind::If, path, start, end),
            TokenKind::EachClose => self.close_block(BlockKind::Each, start, end),
            TokenKind::IfClose => self.close_block(BlockKind::If, start, end),
        }
    }

    fn push_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(block) => block.children.push(node),
            None => self.nodes.push(node),
        }
    }

    fn open_block(&mut self, kind: BlockKind, path: String, start: usize, end: usize) {
        self.stack.push(OpenBlock {
            kind,
            path,
            open_start: start,
            body_start: end,
            children: vec![],
        });
    }

    fn close_block(&mut self, kind: BlockKind, start: usize, end: usize) {
        if !self.stack.iter().any(|block| block.kind == kind) {
            // stray closer, keep it as text
            let text = self.input[start..end].to_owned();
            self.push_node(Node::Text(text));
            return;
        }

        loop {
            let block = match self.stack.pop() {
                Some(block) => block,
                None => return,
            };

            if block.kind == kind {
                let raw_body = self.input[block.body_start..start].to_owned();
                let node = match kind {
                    BlockKind::Each => Node::Each {
                        path: block.path,
                        body: block.children,
                        raw_body,
                    },
                    BlockKind::If => Node::If {
                        path: block.path,
                        body: block.children,
                        raw_body,
                    },
                };
                self.push_node(node);
                return;
            }

            // interleaved block of the other kind: opener becomes text,
            // children are hoisted into the enclosing block
            let opener = self.input[block.open_start..block.body_start].to_owned();
            self.push_node(Node::Text(opener));
            for child in block.children {
                self.push_node(child);
            }
        }
    }

    fn finish(&mut self) {
        if let Some(open_start) = self.stack.first().map(|block| block.open_start) {
            self.stack.clear();
            let text = self.input[open_start..].to_owned();
            self.nodes.push(Node::Text(text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Parser;
    use crate::nodes::Node;

    fn parse(input: &str) -> Vec<Node> {
        let mut parser = Parser::new(input);
        parser.parse();
        parser.nodes
    }

    fn text(value: &str) -> Node {
        Node::Text(value.to_owned())
    }

    fn variable(path: &str) -> Node {
        Node::Variable {
            path: path.to_owned(),
            raw: false,
        }
    }

    #[test]
    fn test_text_and_variables() {
        assert_eq!(
            parse("Hello {{name}}!"),
            vec![text("Hello "), variable("name"), text("!")]
        );
    }

    #[test]
    fn test_if_block() {
        assert_eq!(
            parse("{{#if show}}Yes{{/if}}"),
            vec![Node::If {
                path: "show".to_owned(),
                body: vec![text("Yes")],
                raw_body: "Yes".to_owned(),
            }]
        );
    }

    #[test]
    fn test_each_block_keeps_raw_body() {
        assert_eq!(
            parse("{{#each items}}<li>{{this}}</li>{{/each}}"),
            vec![Node::Each {
                path: "items".to_owned(),
                body: vec![text("<li>"), variable("this"), text("</li>")],
                raw_body: "<li>{{this}}</li>".to_owned(),
            }]
        );
    }

    #[test]
    fn test_nested_each_blocks_pair_by_kind() {
        let nodes = parse("{{#each jobs}}{{#each items}}{{this}}{{/each}}{{/each}}");
        match &nodes[0] {
            Node::Each { path, body, .. } => {
                assert_eq!(path, "jobs");
                match &body[0] {
                    Node::Each { path, .. } => assert_eq!(path, "items"),
                    other => panic!("expected inner each, got {:?}", other),
                }
            }
            other => panic!("expected outer each, got {:?}", other),
        }
    }

    #[test]
    fn test_stray_closer_is_text() {
        assert_eq!(parse("a{{/each}}b"), vec![text("a"), text("{{/each}}"), text("b")]);
    }

    #[test]
    fn test_unclosed_block_is_left_as_text() {
        assert_eq!(
            parse("before {{#each x}}body"),
            vec![text("before "), text("{{#each x}}body")]
        );
    }

    #[test]
    fn test_interleaved_blocks_degrade_the_inner_one() {
        assert_eq!(
            parse("{{#each a}}X{{#if b}}Y{{/each}}"),
            vec![Node::Each {
                path: "a".to_owned(),
                body: vec![text("X"), text("{{#if b}}"), text("Y")],
                raw_body: "X{{#if b}}Y".to_owned(),
            }]
        );
    }
}

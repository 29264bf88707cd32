use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A dot path: identifier characters and dots, nothing else.
    static ref PATH_RE: Regex = Regex::new(r"^[\w.]+").unwrap();
}

const RAW_START: &str = "{{{";
const RAW_END: &str = "}}}";
const VARIABLE_END: &str = "}}";
const EACH_OPEN: &str = "{{#each ";
const IF_OPEN: &str = "{{#if ";
const EACH_CLOSE: &str = "{{/each}}";
const IF_CLOSE: &str = "{{/if}}";

#[derive(Clone, PartialEq, Debug)]
pub enum TokenKind {
    Text,
    /// `{{path}}`
    Variable(String),
    /// `{{{path}}}`
    RawVariable(String),
    /// `{{#each path}}`
    EachOpen(String),
    /// `{{#if path}}`
    IfOpen(String),
    /// `{{/each}}`
    EachClose,
    /// `{{/if}}`
    IfClose,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offsets of the token in the input
    pub start: usize,
    pub end: usize,
}

/// Splits a template into text and tag tokens in a single forward scan.
///
/// Anything that starts with `{{` but does not complete a well-formed tag is
/// not an error: the scan steps over one `{` and keeps going, so the malformed
/// bit ends up in the surrounding text run.
#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    text_start: usize,
    pub tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            input,
            position: 0,
            text_start: 0,
            tokens: vec![],
        }
    }

    pub fn run(&mut self) {
        while let Some(found) = self.input[self.position..].find("{{") {
            let tag_start = self.position + found;
            match self.lex_tag(tag_start) {
                Some((kind, end)) => {
                    self.flush_text(tag_start);
                    self.tokens.push(Token {
                        kind,
                        start: tag_start,
                        end,
                    });
                    self.position = end;
                    self.text_start = end;
                }
                None => {
                    // Not a tag after all; the braces stay in the text run
                    self.position = tag_start + 1;
                }
            }
        }
        self.flush_text(self.input.len());
    }

    fn flush_text(&mut self, end: usize) {
        if end > self.text_start {
            self.tokens.push(Token {
                kind: TokenKind::Text,
                start: self.text_start,
                end,
            });
        }
    }

    fn lex_tag(&self, start: usize) -> Option<(TokenKind, usize)> {
        let rest = &self.input[start..];

        if rest.starts_with(RAW_START) {
            let path = lex_path(&rest[RAW_START.len()..])?;
            let after = RAW_START.len() + path.len();
            if rest[after..].starts_with(RAW_END) {
                return Some((TokenKind::RawVariable(path.to_owned()), start + after + RAW_END.len()));
            }
            return None;
        }

        if rest.starts_with(EACH_OPEN) {
            let path = lex_path(&rest[EACH_OPEN.len()..])?;
            let after = EACH_OPEN.len() + path.len();
            if rest[after..].starts_with(VARIABLE_END) {
                return Some((TokenKind::EachOpen(path.to_owned()), start + after + VARIABLE_END.len()));
            }
            return None;
        }

        if rest.starts_with(IF_OPEN) {
            let path = lex_path(&rest[IF_OPEN.len()..])?;
            let after = IF_OPEN.len() + path.len();
            if rest[after..].starts_with(VARIABLE_END) {
                return Some((TokenKind::IfOpen(path.to_owned()), start + after + VARIABLE_END.len()));
            }
            return None;
        }

        if rest.starts_with(EACH_CLOSE) {
            return Some((TokenKind::EachClose, start + EACH_CLOSE.len()));
        }

        if rest.starts_with(IF_CLOSE) {
            return Some((TokenKind::IfClose, start + IF_CLOSE.len()));
        }

        let path = lex_path(&rest[2..])?;
        let after = 2 + path.len();
        if rest[after..].starts_with(VARIABLE_END) {
            return Some((TokenKind::Variable(path.to_owned()), start + after + VARIABLE_END.len()));
        }

        None
    }
}

fn lex_path(rest: &str) -> Option<&str> {
    PATH_RE.find(rest).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::{Lexer, TokenKind};
    use super::TokenKind::*;

    fn lex(input: &str) -> Vec<(TokenKind, String)> {
        let mut lexer = Lexer::new(input);
        lexer.run();
        lexer
            .tokens
            .into_iter()
            .map(|t| {
                let value = input[t.start..t.end].to_owned();
                (t.kind, value)
            })
            .collect()
    }

    fn variable(path: &str) -> TokenKind {
        Variable(path.to_owned())
    }

    #[test]
    fn test_empty() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn test_only_text() {
        assert_eq!(lex("Hello\n 世界"), vec![(Text, "Hello\n 世界".to_owned())]);
    }

    #[test]
    fn test_variable_and_text() {
        assert_eq!(
            lex("Hello {{name}}!"),
            vec![
                (Text, "Hello ".to_owned()),
                (variable("name"), "{{name}}".to_owned()),
                (Text, "!".to_owned()),
            ]
        );
    }

    #[test]
    fn test_dotted_path() {
        assert_eq!(lex("{{user.name}}"), vec![(variable("user.name"), "{{user.name}}".to_owned())]);
    }

    #[test]
    fn test_raw_variable() {
        assert_eq!(
            lex("{{{tagline}}}"),
            vec![(RawVariable("tagline".to_owned()), "{{{tagline}}}".to_owned())]
        );
    }

    #[test]
    fn test_each_block() {
        assert_eq!(
            lex("{{#each items}}<li>{{this}}</li>{{/each}}"),
            vec![
                (EachOpen("items".to_owned()), "{{#each items}}".to_owned()),
                (Text, "<li>".to_owned()),
                (variable("this"), "{{this}}".to_owned()),
                (Text, "</li>".to_owned()),
                (EachClose, "{{/each}}".to_owned()),
            ]
        );
    }

    #[test]
    fn test_if_block() {
        assert_eq!(
            lex("{{#if show}}Yes{{/if}}"),
            vec![
                (IfOpen("show".to_owned()), "{{#if show}}".to_owned()),
                (Text, "Yes".to_owned()),
                (IfClose, "{{/if}}".to_owned()),
            ]
        );
    }

    #[test]
    fn test_spaces_inside_braces_are_not_a_tag() {
        assert_eq!(lex("{{ name }}"), vec![(Text, "{{ name }}".to_owned())]);
    }

    #[test]
    fn test_unterminated_raw_falls_back_to_variable() {
        // the inner `{{c}}` is still a valid tag, one `{` is left over
        assert_eq!(
            lex("{{{c}}"),
            vec![(Text, "{".to_owned()), (variable("c"), "{{c}}".to_owned())]
        );
    }

    #[test]
    fn test_each_without_space_is_text() {
        assert_eq!(lex("{{#each}}"), vec![(Text, "{{#each}}".to_owned())]);
    }

    #[test]
    fn test_unclosed_braces_are_text() {
        assert_eq!(lex("a {{ b"), vec![(Text, "a {{ b".to_owned())]);
    }

    #[test]
    fn test_extra_closing_brace_stays_in_text() {
        assert_eq!(
            lex("{{a}}}"),
            vec![(variable("a"), "{{a}}".to_owned()), (Text, "}".to_owned())]
        );
    }
}

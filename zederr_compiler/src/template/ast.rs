//! Template syntax tree
//!
//! Trees are transient: one is produced per parse call and dropped once the
//! fields have been extracted.

use crate::utils::Span;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text, already trimmed by any adjacent trim markers
    Text { text: String, span: Span },
    /// Ordered sequence of nodes
    List { nodes: Vec<Node>, span: Span },
    /// `{{ pipeline }}`
    Action { pipeline: Pipeline, span: Span },
}

/// Commands separated by `|`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub commands: Vec<Command>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub args: Vec<Arg>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    RawString,
    Char,
    Number,
    Bool,
    Nil,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// `.Name` or `.Name.Nested`
    Field { segments: Vec<String>, span: Span },
    /// Bare function name, e.g. a type marker such as `string`
    Identifier { name: String, span: Span },
    /// Constant, kept as written
    Literal {
        kind: LiteralKind,
        text: String,
        span: Span,
    },
    /// `.`
    Dot { span: Span },
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Text { span, .. } | Node::List { span, .. } | Node::Action { span, .. } => *span,
        }
    }

    /// Re-emit the node as template text using the given delimiters
    pub fn render(&self, left: &str, right: &str, out: &mut String) {
        match self {
            Node::Text { text, .. } => out.push_str(text),
            Node::List { nodes, .. } => {
                for node in nodes {
                    node.render(left, right, out);
                }
            }
            Node::Action { pipeline, .. } => {
                out.push_str(left);
                out.push_str(&pipeline.to_string());
                out.push_str(right);
            }
        }
    }

    /// Number of action nodes in this subtree
    pub fn action_count(&self) -> usize {
        match self {
            Node::Text { .. } => 0,
            Node::List { nodes, .. } => nodes.iter().map(Node::action_count).sum(),
            Node::Action { .. } => 1,
        }
    }
}

impl Arg {
    pub fn span(&self) -> Span {
        match self {
            Arg::Field { span, .. }
            | Arg::Identifier { span, .. }
            | Arg::Literal { span, .. }
            | Arg::Dot { span } => *span,
        }
    }

    /// Name of the node kind, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Arg::Field { .. } => "field",
            Arg::Identifier { .. } => "identifier",
            Arg::Literal { .. } => "constant",
            Arg::Dot { .. } => "dot",
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Field { segments, .. } => write!(f, ".{}", segments.join(".")),
            Arg::Identifier { name, .. } => write!(f, "{}", name),
            Arg::Literal { text, .. } => write!(f, "{}", text),
            Arg::Dot { .. } => write!(f, "."),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(Arg::to_string).collect();
        write!(f, "{}", args.join(" "))
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let commands: Vec<String> = self.commands.iter().map(Command::to_string).collect();
        write!(f, "{}", commands.join(" | "))
    }
}

/// Parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub root: Node,
}

impl Tree {
    pub fn render(&self, left: &str, right: &str) -> String {
        let mut out = String::new();
        self.root.render(left, right, &mut out);
        out
    }

    pub fn action_count(&self) -> usize {
        self.root.action_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> Arg {
        Arg::Field {
            segments: vec![name.to_string()],
            span: Span::default(),
        }
    }

    fn ident(name: &str) -> Arg {
        Arg::Identifier {
            name: name.to_string(),
            span: Span::default(),
        }
    }

    #[test]
    fn test_render_normalizes_actions() {
        let tree = Tree {
            root: Node::List {
                nodes: vec![
                    Node::Text {
                        text: "Error with ".to_string(),
                        span: Span::default(),
                    },
                    Node::Action {
                        pipeline: Pipeline {
                            commands: vec![
                                Command {
                                    args: vec![field("Param1")],
                                    span: Span::default(),
                                },
                                Command {
                                    args: vec![ident("string")],
                                    span: Span::default(),
                                },
                            ],
                            span: Span::default(),
                        },
                        span: Span::default(),
                    },
                ],
                span: Span::default(),
            },
        };

        assert_eq!(tree.render("{{", "}}"), "Error with {{.Param1 | string}}");
        assert_eq!(tree.render("[[", "]]"), "Error with [[.Param1 | string]]");
        assert_eq!(tree.action_count(), 1);
    }

    #[test]
    fn test_arg_display() {
        let nested = Arg::Field {
            segments: vec!["A".to_string(), "B".to_string()],
            span: Span::default(),
        };
        assert_eq!(nested.to_string(), ".A.B");
        assert_eq!(Arg::Dot { span: Span::default() }.to_string(), ".");
        assert_eq!(nested.kind_name(), "field");
    }
}

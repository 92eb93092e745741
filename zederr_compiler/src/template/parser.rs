//! Template parser
//!
//! Builds a `Tree` from the lexer's token stream. Only the constrained subset
//! used by message templates is accepted: text, and actions holding a pipeline
//! of commands whose arguments are fields, type markers or constants.

use super::ast::{Arg, Command, Node, Pipeline, Tree};
use super::error::{TemplateError, TemplateResult};
use super::lexer::{Lexer, SpannedToken, Token};
use super::TemplateOptions;
use crate::config::compile_time::template::*;
use crate::utils::{Position, Span};
use crate::log_debug;

pub struct TemplateParser<'a> {
    tokens: Vec<SpannedToken>,
    position: usize,
    options: &'a TemplateOptions,
    actions: usize,
}

impl<'a> TemplateParser<'a> {
    pub fn new(tokens: Vec<SpannedToken>, options: &'a TemplateOptions) -> Self {
        Self {
            tokens,
            position: 0,
            options,
            actions: 0,
        }
    }

    pub fn parse(mut self, end: Position) -> TemplateResult<Tree> {
        let mut nodes = Vec::new();

        while let Some(token) = self.next() {
            match token.token {
                Token::Text(text) => nodes.push(Node::Text {
                    text,
                    span: token.span,
                }),
                Token::LeftDelim => nodes.push(self.parse_action(token.span)?),
                other => {
                    return Err(TemplateError::UnsupportedConstruct {
                        construct: format!("{:?} outside of an action", other),
                        span: token.span,
                    })
                }
            }
        }

        Ok(Tree {
            root: Node::List {
                nodes,
                span: Span::new(Position::start(), end),
            },
        })
    }

    fn next(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn parse_action(&mut self, open: Span) -> TemplateResult<Node> {
        self.actions += 1;
        if self.actions > MAX_ACTIONS_PER_TEMPLATE {
            return Err(TemplateError::LimitExceeded {
                what: "actions".to_string(),
                limit: MAX_ACTIONS_PER_TEMPLATE,
            });
        }

        let mut commands: Vec<Command> = Vec::new();
        let mut args: Vec<Arg> = Vec::new();

        loop {
            let Some(token) = self.next() else {
                return Err(TemplateError::UnterminatedAction { span: open });
            };
            let span = token.span;

            match token.token {
                Token::RightDelim => {
                    self.finish_command(&mut commands, &mut args, span)?;
                    let pipeline = pipeline_from(commands, span);
                    return Ok(Node::Action {
                        pipeline,
                        span: open.merge(span),
                    });
                }
                Token::Pipe => self.finish_command(&mut commands, &mut args, span)?,
                Token::Field(segments) => args.push(Arg::Field { segments, span }),
                Token::Dot => args.push(Arg::Dot { span }),
                Token::Identifier(name) => {
                    if !self.options.type_markers.contains(&name) {
                        return Err(TemplateError::UndefinedFunction { name, span });
                    }
                    args.push(Arg::Identifier { name, span });
                }
                Token::Literal(kind, text) => args.push(Arg::Literal { kind, text, span }),
                Token::Keyword(keyword) => {
                    return Err(unsupported(format!("'{}' action", keyword), span))
                }
                Token::Variable(name) => {
                    return Err(unsupported(format!("variable {}", name), span))
                }
                Token::Declare | Token::Assign => {
                    return Err(unsupported("variable declaration".to_string(), span))
                }
                Token::LeftParen | Token::RightParen => {
                    return Err(unsupported("parenthesized pipeline".to_string(), span))
                }
                Token::Comma => return Err(unsupported("comma in command".to_string(), span)),
                Token::Text(_) | Token::LeftDelim => {
                    return Err(TemplateError::UnterminatedAction { span: open })
                }
            }

            if args.len() > MAX_ARGS_PER_COMMAND {
                return Err(TemplateError::LimitExceeded {
                    what: "arguments per command".to_string(),
                    limit: MAX_ARGS_PER_COMMAND,
                });
            }
        }
    }

    fn finish_command(
        &self,
        commands: &mut Vec<Command>,
        args: &mut Vec<Arg>,
        at: Span,
    ) -> TemplateResult<()> {
        if args.is_empty() {
            return Err(TemplateError::MissingCommand { span: at });
        }

        if !commands.is_empty() {
            if let Some(first @ (Arg::Literal { .. } | Arg::Dot { .. })) = args.first() {
                return Err(unsupported(
                    format!(
                        "non executable command in pipeline stage {}",
                        commands.len() + 1
                    ),
                    first.span(),
                ));
            }
        }

        if commands.len() >= MAX_COMMANDS_PER_PIPELINE {
            return Err(TemplateError::LimitExceeded {
                what: "commands per pipeline".to_string(),
                limit: MAX_COMMANDS_PER_PIPELINE,
            });
        }

        let args = std::mem::take(args);
        let span = match (args.first(), args.last()) {
            (Some(first), Some(last)) => first.span().merge(last.span()),
            _ => at,
        };
        commands.push(Command { args, span });
        Ok(())
    }
}

fn unsupported(construct: String, span: Span) -> TemplateError {
    TemplateError::UnsupportedConstruct { construct, span }
}

fn pipeline_from(commands: Vec<Command>, fallback: Span) -> Pipeline {
    let span = match (commands.first(), commands.last()) {
        (Some(first), Some(last)) => first.span.merge(last.span),
        _ => fallback,
    };
    Pipeline { commands, span }
}

/// Parse `source` into a tree using the delimiters and markers in `options`
pub fn parse_template(source: &str, options: &TemplateOptions) -> TemplateResult<Tree> {
    options.validate()?;

    if source.len() > MAX_TEMPLATE_LENGTH {
        return Err(TemplateError::LimitExceeded {
            what: "length".to_string(),
            limit: MAX_TEMPLATE_LENGTH,
        });
    }

    let tokens = Lexer::new(source, &options.left_delimiter, &options.right_delimiter).tokenize()?;
    let end = Position::start().advance_str(source);
    let tree = TemplateParser::new(tokens, options).parse(end)?;

    if options.debug_parse_trees {
        log_debug!("Parsed template tree",
            "actions" => tree.action_count(),
            "tree" => format!("{:?}", tree.root)
        );
    }

    Ok(tree)
}

use super::{Expression, Line, Objects};
use crate::error::RenderError;

/// Anything that executes without yielding a usable value.
///
/// Unlike expressions, statements may span several lines.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// One `# ...` line per entry.
    Comment(Vec<String>),
    Opaque(OpaqueBlock),
    Import(Import),
    Assignment { lhs: String, rhs: Expression },
    /// An expression evaluated for its side effect.
    Standalone(Expression),
    Function(Function),
    Decoration(Decoration),
    Class(Class),
    IfElse(IfElse),
}

/// A block of code that is already text, e.g. supplied by a plugin.
/// Its common indentation is removed when rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueBlock {
    block: String,
}

impl OpaqueBlock {
    /// Returns `None` for a block that has no visible content.
    pub fn new(block: impl Into<String>) -> Option<Self> {
        let block = block.into();
        if block.trim().is_empty() {
            None
        } else {
            Some(Self { block })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.block
    }

    fn lines(&self, indent_level: usize) -> Vec<Line> {
        const TAB_SIZE: usize = 8;
        let raw: Vec<String> = self
            .block
            .lines()
            .map(|l| l.replace('\t', &" ".repeat(TAB_SIZE)))
            .collect();
        let first = raw.iter().position(|l| !l.trim().is_empty()).unwrap_or(0);
        let last = raw
            .iter()
            .rposition(|l| !l.trim().is_empty())
            .map_or(raw.len(), |i| i + 1);
        let raw = &raw[first..last];
        let shortest_indent = raw
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.len() - l.trim_start_matches(' ').len())
            .min()
            .unwrap_or(0);
        raw.iter()
            .map(|l| {
                let text = if l.trim().is_empty() {
                    ""
                } else {
                    &l[shortest_indent..]
                };
                Line::new(text.trim_end(), indent_level)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub targets: Vec<String>,
    pub source: Option<String>,
    pub alias: Option<String>,
}

impl Import {
    pub fn from(source: impl Into<String>, targets: &[&str]) -> Self {
        Self {
            targets: targets.iter().map(|t| t.to_string()).collect(),
            source: Some(source.into()),
            alias: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    pub decorator: String,
    pub target: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: String,
    pub superclasses: Vec<String>,
    pub statements: Vec<Statement>,
}

/// `if`, any number of `elif`, and an optional `else`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfElse {
    pub condition_blocks: Vec<(Expression, Vec<Statement>)>,
    pub else_block: Option<Vec<Statement>>,
}

impl Statement {
    pub fn assign(lhs: impl Into<String>, rhs: Expression) -> Self {
        Statement::Assignment {
            lhs: lhs.into(),
            rhs,
        }
    }

    pub fn decorated(decorator: impl Into<String>, target: Statement) -> Self {
        Statement::Decoration(Decoration {
            decorator: decorator.into(),
            target: Box::new(target),
        })
    }

    /// Renders this statement into lines, indented at `indent_level`.
    pub fn lines(&self, indent_level: usize, objects: &Objects) -> Result<Vec<Line>, RenderError> {
        let line = |text: String| Line::new(text, indent_level);
        Ok(match self {
            Statement::Comment(comments) => comments
                .iter()
                .flat_map(|c| c.lines())
                .map(|c| line(format!("# {}", c)))
                .collect(),
            Statement::Opaque(block) => block.lines(indent_level),
            Statement::Import(import) => vec![line(render_import(import))],
            Statement::Assignment { lhs, rhs } => {
                vec![line(format!("{} = {}", lhs, rhs.render(objects)?))]
            }
            Statement::Standalone(expr) => vec![line(expr.render(objects)?)],
            Statement::Function(func) => {
                let mut lines = vec![line(format!(
                    "def {}({}):",
                    func.name,
                    func.params.join(", ")
                ))];
                lines.extend(body(&func.statements, indent_level + 1, objects)?);
                lines
            }
            Statement::Decoration(deco) => {
                let mut lines = vec![line(format!("@{}", deco.decorator))];
                lines.extend(deco.target.lines(indent_level, objects)?);
                lines
            }
            Statement::Class(class) => {
                let supers = if class.superclasses.is_empty() {
                    String::new()
                } else {
                    format!("({})", class.superclasses.join(", "))
                };
                let mut lines = vec![line(format!("class {}{}:", class.name, supers))];
                lines.extend(body(&class.statements, indent_level + 1, objects)?);
                lines
            }
            Statement::IfElse(if_else) => {
                let mut lines = Vec::new();
                for (i, (cond, stmts)) in if_else.condition_blocks.iter().enumerate() {
                    let keyword = if i == 0 { "if" } else { "elif" };
                    lines.push(line(format!("{} {}:", keyword, cond.render(objects)?)));
                    lines.extend(body(stmts, indent_level + 1, objects)?);
                }
                if let Some(stmts) = &if_else.else_block {
                    lines.push(line("else:".to_string()));
                    lines.extend(body(stmts, indent_level + 1, objects)?);
                }
                lines
            }
        })
    }

    /// Visits every expression reachable from this statement.
    pub fn walk_expressions<'a>(&'a self, visit: &mut dyn FnMut(&'a Expression)) {
        match self {
            Statement::Assignment { rhs: e, .. } | Statement::Standalone(e) => e.walk(visit),
            Statement::Function(Function { statements, .. })
            | Statement::Class(Class { statements, .. }) => {
                for s in statements {
                    s.walk_expressions(visit);
                }
            }
            Statement::Decoration(deco) => deco.target.walk_expressions(visit),
            Statement::IfElse(if_else) => {
                for (cond, stmts) in &if_else.condition_blocks {
                    cond.walk(visit);
                    for s in stmts {
                        s.walk_expressions(visit);
                    }
                }
                for s in if_else.else_block.iter().flatten() {
                    s.walk_expressions(visit);
                }
            }
            Statement::Comment(_) | Statement::Opaque(_) | Statement::Import(_) => {}
        }
    }
}

/// A block body; empty bodies render as `pass`.
fn body(
    statements: &[Statement],
    indent_level: usize,
    objects: &Objects,
) -> Result<Vec<Line>, RenderError> {
    if statements.is_empty() {
        return Ok(vec![Line::new("pass", indent_level)]);
    }
    let mut lines = Vec::new();
    for stmt in statements {
        lines.extend(stmt.lines(indent_level, objects)?);
    }
    Ok(lines)
}

fn render_import(import: &Import) -> String {
    let targets = import.targets.join(", ");
    let mut text = match &import.source {
        Some(source) => format!("from {} import {}", source, targets),
        None => format!("import {}", targets),
    };
    if let Some(alias) = &import.alias {
        text.push_str(&format!(" as {}", alias));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(stmt: &Statement) -> Vec<String> {
        stmt.lines(0, &Objects::default())
            .unwrap()
            .iter()
            .map(|l| l.to_string())
            .collect()
    }

    #[test]
    fn opaque_block_is_dedented_and_trimmed() {
        let block = OpaqueBlock::new("\n\n    if x:\n        y()\n\n").unwrap();
        assert_eq!(
            render(&Statement::Opaque(block)),
            vec!["if x:", "    y()"]
        );
        assert!(OpaqueBlock::new("  \n\t ").is_none());
    }

    #[test]
    fn empty_bodies_render_pass() {
        let class = Statement::Class(Class {
            name: "A".to_string(),
            superclasses: vec![],
            statements: vec![],
        });
        assert_eq!(render(&class), vec!["class A:", "    pass"]);
    }

    #[test]
    fn if_elif_else_chain() {
        let stmt = Statement::IfElse(IfElse {
            condition_blocks: vec![
                (Expression::symbol("a"), vec![Statement::Standalone(Expression::symbol("f()"))]),
                (Expression::symbol("b"), vec![]),
            ],
            else_block: Some(vec![]),
        });
        assert_eq!(
            render(&stmt),
            vec!["if a:", "    f()", "elif b:", "    pass", "else:", "    pass"]
        );
    }
}

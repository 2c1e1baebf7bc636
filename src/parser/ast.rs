use serde::{Deserialize, Serialize};
use std::fmt;

use crate::lexer::encode_string;

/// AST node. A closed set of variants; every consumer handles all of them
/// through [`Visitor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// Top-level sequence of expressions
    Program(Vec<Node>),

    /// Variable binding: (:define name expression)
    Definition {
        /// Name being bound
        name: String,
        /// Expression whose value is bound
        expression: Box<Node>,
    },

    /// Conditional: (:if condition then else)
    If {
        /// Must evaluate to a boolean
        condition: Box<Node>,
        /// Evaluated when the condition is true
        then_branch: Box<Node>,
        /// Evaluated when the condition is false
        else_branch: Box<Node>,
    },

    /// Variable reference
    Ref(String),

    /// String literal holding the decoded payload
    StringLiteral(String),

    /// Boolean literal
    BooleanLiteral(bool),
}

/// One handler per node variant.
///
/// [`Node::accept`] picks the handler matching the node's own variant, so
/// tree-walking algorithms stay separate from the node definitions.
pub trait Visitor {
    /// Value produced by each handler
    type Output;

    /// Handle a `Program`
    fn visit_program(&mut self, nodes: &[Node]) -> Self::Output;
    /// Handle a `Definition`
    fn visit_definition(&mut self, node: &Node, name: &str, expression: &Node) -> Self::Output;
    /// Handle an `If`
    fn visit_if(
        &mut self,
        condition: &Node,
        then_branch: &Node,
        else_branch: &Node,
    ) -> Self::Output;
    /// Handle a `Ref`
    fn visit_ref(&mut self, name: &str) -> Self::Output;
    /// Handle a `StringLiteral`
    fn visit_string(&mut self, node: &Node, value: &str) -> Self::Output;
    /// Handle a `BooleanLiteral`
    fn visit_boolean(&mut self, node: &Node, value: bool) -> Self::Output;
}

impl Node {
    /// Dispatch to the visitor handler for this variant
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Node::Program(nodes) => visitor.visit_program(nodes),
            Node::Definition { name, expression } => {
                visitor.visit_definition(self, name, expression)
            }
            Node::If {
                condition,
                then_branch,
                else_branch,
            } => visitor.visit_if(condition, then_branch, else_branch),
            Node::Ref(name) => visitor.visit_ref(name),
            Node::StringLiteral(value) => visitor.visit_string(self, value),
            Node::BooleanLiteral(value) => visitor.visit_boolean(self, *value),
        }
    }

    /// Whether evaluating this node does work beyond returning itself
    pub fn is_reducible(&self) -> bool {
        match self {
            Node::Program(_) | Node::Definition { .. } | Node::If { .. } | Node::Ref(_) => true,
            Node::StringLiteral(_) | Node::BooleanLiteral(_) => false,
        }
    }

    /// Short name of the variant, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Program(_) => "program",
            Node::Definition { .. } => "definition",
            Node::If { .. } => "if",
            Node::Ref(_) => "reference",
            Node::StringLiteral(_) => "string",
            Node::BooleanLiteral(_) => "boolean",
        }
    }
}

/// Renders nodes in source-like form
struct Printer<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
}

impl Visitor for Printer<'_, '_> {
    type Output = fmt::Result;

    fn visit_program(&mut self, nodes: &[Node]) -> fmt::Result {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                writeln!(self.f)?;
            }
            node.accept(self)?;
        }
        Ok(())
    }

    fn visit_definition(&mut self, _node: &Node, name: &str, expression: &Node) -> fmt::Result {
        write!(self.f, "(define {} ", name)?;
        expression.accept(self)?;
        write!(self.f, ")")
    }

    fn visit_if(
        &mut self,
        condition: &Node,
        then_branch: &Node,
        else_branch: &Node,
    ) -> fmt::Result {
        write!(self.f, "(if ")?;
        condition.accept(self)?;
        write!(self.f, " ")?;
        then_branch.accept(self)?;
        write!(self.f, " ")?;
        else_branch.accept(self)?;
        write!(self.f, ")")
    }

    fn visit_ref(&mut self, name: &str) -> fmt::Result {
        write!(self.f, "{}", name)
    }

    fn visit_string(&mut self, _node: &Node, value: &str) -> fmt::Result {
        write!(self.f, "{}", encode_string(value))
    }

    fn visit_boolean(&mut self, _node: &Node, value: bool) -> fmt::Result {
        write!(self.f, ":{}", value)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.accept(&mut Printer { f })
    }
}

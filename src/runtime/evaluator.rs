use std::io::Write;

use crate::error::{Error, Result};
use crate::parser::{Node, Visitor};
use crate::runtime::Environment;

/// Tree-walking evaluator
///
/// Each top-level expression whose source node is reducible has its result
/// written to `writer`, one line per result. Literals at top level are
/// values already and are not echoed.
pub struct Evaluator<W: Write> {
    /// Variable environment
    env: Environment,
    /// Output sink for echoed results
    writer: W,
}

impl<W: Write> Evaluator<W> {
    /// Creates an evaluator with a fresh global scope
    pub fn new(writer: W) -> Self {
        Evaluator {
            env: Environment::new(),
            writer,
        }
    }

    /// Evaluate a program, returning one result per top-level expression.
    /// Stops at the first error; output already written stays written.
    pub fn run(&mut self, program: &Node) -> Result<Vec<Node>> {
        match program {
            Node::Program(nodes) => self.run_statements(nodes),
            other => self.run_statements(std::slice::from_ref(other)),
        }
    }

    /// Evaluate a single node in the current scope
    pub fn evaluate(&mut self, node: &Node) -> Result<Node> {
        node.accept(self)
    }

    /// Evaluate a single node inside a fresh nested scope
    pub fn evaluate_scoped(&mut self, node: &Node) -> Result<Node> {
        self.scoped(|evaluator| evaluator.evaluate(node))
    }

    /// Read access to the environment
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Consumes the evaluator, returning the output sink
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Run `f` inside a pushed scope, popping it on every exit path
    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.env.enter_scope();
        let result = f(self);
        self.env.exit_scope();
        result
    }

    fn run_statements(&mut self, nodes: &[Node]) -> Result<Vec<Node>> {
        let mut results = Vec::with_capacity(nodes.len());

        for node in nodes {
            let value = self.evaluate(node)?;
            tracing::debug!(source = %node, result = %value, "evaluated top-level expression");
            if node.is_reducible() {
                writeln!(self.writer, "{}", value)?;
            }
            results.push(value);
        }

        self.writer.flush()?;
        Ok(results)
    }
}

impl<W: Write> Visitor for Evaluator<W> {
    type Output = Result<Node>;

    fn visit_program(&mut self, nodes: &[Node]) -> Result<Node> {
        self.run_statements(nodes).map(Node::Program)
    }

    fn visit_definition(&mut self, node: &Node, name: &str, expression: &Node) -> Result<Node> {
        let value = self.evaluate(expression)?;
        self.env.define(name.to_string(), value);
        Ok(node.clone())
    }

    fn visit_if(
        &mut self,
        condition: &Node,
        then_branch: &Node,
        else_branch: &Node,
    ) -> Result<Node> {
        match self.evaluate(condition)? {
            Node::BooleanLiteral(true) => self.evaluate(then_branch),
            Node::BooleanLiteral(false) => self.evaluate(else_branch),
            other => Err(Error::TypeError {
                expected: "boolean".to_string(),
                got: other.type_name().to_string(),
            }),
        }
    }

    fn visit_ref(&mut self, name: &str) -> Result<Node> {
        self.env.get(name)
    }

    fn visit_string(&mut self, node: &Node, _value: &str) -> Result<Node> {
        Ok(node.clone())
    }

    fn visit_boolean(&mut self, node: &Node, _value: bool) -> Result<Node> {
        Ok(node.clone())
    }
}

//! Operand stack shared between the tokenizer and the interpreter.
//!
//! The tokenizer pushes every operand it reads; when it reaches an operator
//! the interpreter drains the whole stack with [`OperandStack::take_args`].
//! Arity is not checked here: each operator handler validates its own
//! operand count.

use crate::tokenizer::Operand;

/// Postfix operand stack for one content stream.
#[derive(Debug, Default)]
pub struct OperandStack {
    items: Vec<Operand>,
}

impl OperandStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an operand.
    pub fn push(&mut self, operand: Operand) {
        self.items.push(operand);
    }

    /// Pop the most recently pushed operand.
    pub fn pop(&mut self) -> Option<Operand> {
        self.items.pop()
    }

    /// Current depth.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no operands are pending.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pop exactly the current depth and return the operands in source order.
    pub fn take_args(&mut self) -> OperatorArgs {
        let mut operands = Vec::with_capacity(self.items.len());
        while let Some(operand) = self.pop() {
            operands.push(operand);
        }
        operands.reverse();
        OperatorArgs { operands }
    }
}

/// Operands of a single operator, left to right as written in the stream.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperatorArgs {
    operands: Vec<Operand>,
}

impl OperatorArgs {
    /// Wrap operands that are already in source order.
    pub fn new(operands: Vec<Operand>) -> Self {
        Self { operands }
    }

    /// Number of operands.
    pub fn len(&self) -> usize {
        self.operands.len()
    }

    /// Returns true if the operator had no operands.
    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    /// Operand at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Operand> {
        self.operands.get(index)
    }

    /// Iterate over operands in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Operand> {
        self.operands.iter()
    }

    /// Name operand at `index` (without the leading `/`).
    pub fn name(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(Operand::as_name)
    }

    /// String operand at `index` as raw bytes (literal or hex).
    pub fn string(&self, index: usize) -> Option<&[u8]> {
        self.get(index).and_then(Operand::as_bytes)
    }

    /// Array operand at `index`.
    pub fn array(&self, index: usize) -> Option<&[Operand]> {
        self.get(index).and_then(Operand::as_array)
    }

    /// Numeric operand at `index`.
    pub fn number(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(Operand::as_number)
    }

    /// Consume into the underlying operands.
    pub fn into_vec(self) -> Vec<Operand> {
        self.operands
    }
}

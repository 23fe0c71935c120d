//! Operator table for the precedence-climbing expression element

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// Binding strength of a binary operator; higher binds tighter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precedence {
    pub value: u32,
    pub assoc: Assoc,
}

impl Precedence {
    /// Whether an operator of `next` precedence, following one of `self`, belongs to
    /// the right operand of `self`
    pub fn yields_to(&self, next: Precedence) -> bool {
        match next.assoc {
            Assoc::Left => self.value < next.value,
            Assoc::Right => self.value <= next.value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Operators {
    table: HashMap<String, Precedence>,
}

impl Operators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, value: u32, assoc: Assoc) -> &mut Self {
        self.table.insert(name.into(), Precedence { value, assoc });
        self
    }

    /// Builder form of [Operators::add]
    pub fn with(mut self, name: impl Into<String>, value: u32, assoc: Assoc) -> Self {
        self.add(name, value, assoc);
        self
    }

    pub fn get(&self, name: &str) -> Option<Precedence> {
        self.table.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

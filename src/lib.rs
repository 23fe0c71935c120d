//! # stone
//!
//! Lexer and declarative parser framework for the Stone language.
//!
//! Grammars are written as rules of composable elements; every rule names the node
//! kind it produces and a factory registry decides how that node is built. The
//! [basic](stone::basic) module is a complete grammar written on top of the framework.
//!
//! ## Testing
//!
//! Tree assertions go through the fluent [assert_node](stone::testing::assert_node)
//! helper rather than hand-written matches on node shapes.

pub mod stone;

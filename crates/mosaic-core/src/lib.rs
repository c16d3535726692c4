//! Mosaic Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Mosaic compiler
//! stages. It includes:
//!
//! - **Identifiers**: String-interned, scope-qualified identifiers ([`identifier::Id`])
//! - **Kinds**: The closed vocabulary of node kinds ([`kind::Kind`])
//! - **Elements**: Typed payloads such as placements and endpoints ([`element`] module)
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Tree**: The host tree produced by a compile ([`tree::Container`])

pub mod element;
pub mod geometry;
pub mod identifier;
pub mod kind;
pub mod tree;

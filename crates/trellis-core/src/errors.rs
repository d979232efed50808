//! Error types for the Trellis engine.
//!
//! Only construction and mutation report errors. The per-frame path
//! (resolve, update, draw) degrades gracefully and logs instead.

use thiserror::Error;

use crate::types::{Axis, Padding, SizePolicy};

/// Top-level error type for the Trellis engine.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Rejected node configuration, raised when a node is constructed.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {axis} policy {policy:?}: {reason}")]
    InvalidSizePolicy {
        axis: Axis,
        policy: SizePolicy,
        reason: String,
    },

    #[error("Invalid padding {padding:?}: sides must be finite and non-negative")]
    InvalidPadding { padding: Padding },

    #[error("Invalid gap {gap}: must be finite and non-negative")]
    InvalidGap { gap: f32 },

    #[error("Invalid position ({x}, {y}): must be finite")]
    InvalidPosition { x: f32, y: f32 },

    #[error("Invalid image size {width}x{height}: both dimensions must be finite and positive")]
    InvalidImageSize { width: f32, height: f32 },

    #[error("Invalid font size {size}: must be finite and positive")]
    InvalidFontSize { size: f32 },

    #[error("Node name '{name}' is already in use")]
    DuplicateName { name: String },

    #[error("A selector needs at least one option")]
    EmptyOptions,
}

/// Misuse of the tree or builder API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Unknown layout node {id}")]
    UnknownNode { id: usize },

    #[error("Layout node {id} is a {found}, expected a {expected}")]
    ContentMismatch {
        id: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Builder scopes are unbalanced: {open} scope(s) still open")]
    UnbalancedScope { open: usize },

    #[error("Cannot close the root scope")]
    CloseRoot,

    #[error("A scope closed more nodes than it opened")]
    ClosedOutsideScope,
}

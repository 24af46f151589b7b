//! Expansion expression parsing and matching
//!
//! Overview output can selectively reproduce message bodies. Which messages
//! and which body lines are shown is decided by a compact expression
//! language evaluated first against the whole message record and then, line
//! by line, against its body using a tag stack derived from indentation.
//!
//! # Syntax
//!
//! ```text
//! %TYPE        operation type contains TYPE (message level)
//! /a/b/c       tag path anchored at the top of the body (line level)
//! //c          tag path floating at any depth (line level)
//! ^N           line nested at most N levels deep (line level)
//! #N           line number at most N (line level)
//! ?KEY         header attribute KEY is present (line level)
//! !COND        negate a condition
//! ```
//!
//! Conditions joined with `;` must all hold within one expression; a
//! condition that does not apply at the current level is skipped rather than
//! failed. Several expressions may be supplied and any one of them matching
//! is enough.
//!
//! # Examples
//!
//! ```text
//! %edit-config                      # edit-config messages, whole body
//! %edit-config;/config/interfaces   # only lines under /config/interfaces
//! //interface;^4                    # interface subtrees, at most 4 deep
//! !%hello;#20                       # non-hello messages, first 20 lines
//! ```

pub mod error;
pub mod matcher;
pub mod parser;
pub mod tag_stack;

pub use error::ExpandParseError;
pub use matcher::{MatchContext, Outcome};
pub use parser::{Condition, ExpansionSet, Expression, PathPattern};
pub use tag_stack::TagStack;

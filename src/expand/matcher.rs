use super::parser::{Condition, ExpansionSet, Expression, PathPattern};
use super::tag_stack::TagStack;
use crate::config::MatcherRules;
use crate::parser::TraceMessage;

/// Three-valued condition result. A condition evaluated at the wrong level
/// (e.g. a path match against a whole message) is inapplicable: it neither
/// passes nor fails and is skipped when combining conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
    Inapplicable,
}

impl Outcome {
    fn negate(self) -> Outcome {
        match self {
            Outcome::Pass => Outcome::Fail,
            Outcome::Fail => Outcome::Pass,
            Outcome::Inapplicable => Outcome::Inapplicable,
        }
    }

    fn from_bool(value: bool) -> Outcome {
        if value { Outcome::Pass } else { Outcome::Fail }
    }
}

/// Per-evaluation state owned by the caller and threaded through each match
/// call. Holds the tag stack for the message currently being expanded;
/// distinct messages must not share a context without a reset in between
/// (message-level matching resets it).
#[derive(Debug)]
pub struct MatchContext {
    tag_stack: TagStack,
    max_float_depth: usize,
}

impl MatchContext {
    pub fn new(rules: &MatcherRules) -> Self {
        Self {
            tag_stack: TagStack::new(),
            max_float_depth: rules.max_float_depth,
        }
    }

    pub fn reset(&mut self) {
        self.tag_stack.clear();
    }
}

impl ExpansionSet {
    /// Whole-message match. Resets the context's tag stack, so call this
    /// before feeding the message's body lines and never in between them.
    pub fn matches_message(&self, message: &TraceMessage, ctx: &mut MatchContext) -> bool {
        ctx.reset();
        self.expressions
            .iter()
            .any(|expr| expression_matches(expr, |cond| eval_message(cond, message)))
    }

    /// Single body line match. Lines must be fed in ascending order within a
    /// message for the tag stack to reflect the enclosing tags; the stack is
    /// updated exactly once per line, before any condition is evaluated.
    pub fn matches_line(
        &self,
        message: &TraceMessage,
        line: &str,
        lineno: usize,
        ctx: &mut MatchContext,
    ) -> bool {
        let depth = ctx.tag_stack.observe(line).map(|(_, depth)| depth);
        self.expressions.iter().any(|expr| {
            expression_matches(expr, |cond| eval_line(cond, message, lineno, depth, ctx))
        })
    }
}

/// AND across conditions; inapplicable conditions are skipped, a failing one
/// short-circuits. An expression with no applicable conditions matches.
fn expression_matches(expr: &Expression, eval: impl Fn(&Condition) -> Outcome) -> bool {
    expr.conditions
        .iter()
        .all(|cond| eval(cond) != Outcome::Fail)
}

fn eval_message(cond: &Condition, message: &TraceMessage) -> Outcome {
    match cond {
        Condition::OpType(needle) => {
            Outcome::from_bool(message.op_type_or_empty().contains(needle.as_str()))
        }
        Condition::Not(inner) => eval_message(inner, message).negate(),
        Condition::Path(_)
        | Condition::MaxDepth(_)
        | Condition::MaxLine(_)
        | Condition::HasAttribute(_) => Outcome::Inapplicable,
    }
}

fn eval_line(
    cond: &Condition,
    message: &TraceMessage,
    lineno: usize,
    depth: Option<usize>,
    ctx: &MatchContext,
) -> Outcome {
    match cond {
        // Lines with no derivable depth always pass the depth bound.
        Condition::MaxDepth(max) => match depth {
            Some(depth) if depth > *max => Outcome::Fail,
            _ => Outcome::Pass,
        },
        Condition::MaxLine(max) => Outcome::from_bool(lineno <= *max),
        Condition::HasAttribute(key) => Outcome::from_bool(message.has_attribute(key)),
        Condition::Path(pattern) => Outcome::from_bool(path_matches(pattern, ctx)),
        Condition::Not(inner) => eval_line(inner, message, lineno, depth, ctx).negate(),
        Condition::OpType(_) => Outcome::Inapplicable,
    }
}

/// Anchored paths must cover the tag stack from depth 2 downwards, length
/// for length. Free-floating paths try every start depth up to the
/// configured cap.
fn path_matches(pattern: &PathPattern, ctx: &MatchContext) -> bool {
    if pattern.anchored {
        ctx.tag_stack.matches_at(2, &pattern.components)
    } else {
        (2..=ctx.max_float_depth).any(|start| ctx.tag_stack.matches_at(start, &pattern.components))
    }
}

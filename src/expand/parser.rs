use super::error::ExpandParseError;

/// A single expansion condition, parsed once and evaluated via pattern match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `%arg` - operation type contains `arg` (message level only)
    OpType(String),
    /// `/a/b` or `//b` - tag path match (line level only)
    Path(PathPattern),
    /// `^N` - line depth at most N (line level only)
    MaxDepth(usize),
    /// `#N` - body line number at most N (line level only)
    MaxLine(usize),
    /// `?key` - header attribute present on the owning message (line level only)
    HasAttribute(String),
    /// `!cond` - negation; inapplicable stays inapplicable
    Not(Box<Condition>),
}

/// A tag path split into components, anchored at the top of the body or
/// free-floating (`//...`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    pub components: Vec<String>,
    pub anchored: bool,
}

impl Condition {
    pub fn parse(s: &str) -> Result<Self, ExpandParseError> {
        let mut chars = s.chars();
        let command = chars.next().ok_or(ExpandParseError::EmptyNegation)?;
        let arg = chars.as_str();

        match command {
            '%' => Ok(Condition::OpType(arg.to_string())),
            '/' => Ok(Condition::Path(PathPattern::parse(arg))),
            '^' => Ok(Condition::MaxDepth(parse_number(command, arg)?)),
            '#' => Ok(Condition::MaxLine(parse_number(command, arg)?)),
            '?' => Ok(Condition::HasAttribute(arg.to_string())),
            '!' => {
                if arg.is_empty() {
                    Err(ExpandParseError::EmptyNegation)
                } else {
                    Ok(Condition::Not(Box::new(Condition::parse(arg)?)))
                }
            }
            other => Err(ExpandParseError::UnknownCommand(other)),
        }
    }
}

impl PathPattern {
    /// `arg` is the path with its leading `/` already consumed, so an empty
    /// first component means the expression began with `//`.
    fn parse(arg: &str) -> Self {
        let mut components: Vec<String> = arg.split('/').map(str::to_string).collect();
        let anchored = components.first().is_none_or(|c| !c.is_empty());
        if !anchored {
            components.remove(0);
        }
        PathPattern {
            components,
            anchored,
        }
    }
}

fn parse_number(command: char, arg: &str) -> Result<usize, ExpandParseError> {
    arg.trim()
        .parse()
        .map_err(|_| ExpandParseError::InvalidNumber {
            command,
            arg: arg.to_string(),
        })
}

/// One expression: conditions joined with `;`, all of which must hold
/// (inapplicable conditions are skipped)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expression {
    pub conditions: Vec<Condition>,
}

impl Expression {
    /// Parse a semicolon-separated condition list. Empty segments are
    /// trivially true and dropped.
    pub fn parse(s: &str) -> Result<Self, ExpandParseError> {
        let conditions = s
            .split(';')
            .filter(|segment| !segment.is_empty())
            .map(Condition::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Expression { conditions })
    }
}

/// The full set of expansion expressions supplied for a run; a message or
/// line matches the set if any expression matches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionSet {
    pub expressions: Vec<Expression>,
}

impl ExpansionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(raw: &[String]) -> Result<Self, ExpandParseError> {
        let expressions = raw
            .iter()
            .map(|s| Expression::parse(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ExpansionSet { expressions })
    }

    /// An empty set never matches anything (expansion disabled)
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_type_condition() {
        let expr = Expression::parse("%edit-config").unwrap();
        assert_eq!(
            expr.conditions,
            vec![Condition::OpType("edit-config".to_string())]
        );
    }

    #[test]
    fn parses_condition_list() {
        let expr = Expression::parse("%edit-config;/config/interfaces;^4").unwrap();
        assert_eq!(expr.conditions.len(), 3);
        assert_eq!(expr.conditions[2], Condition::MaxDepth(4));
    }

    #[test]
    fn anchored_and_floating_paths() {
        let expr = Expression::parse("/config/interfaces").unwrap();
        assert_eq!(
            expr.conditions[0],
            Condition::Path(PathPattern {
                components: vec!["config".to_string(), "interfaces".to_string()],
                anchored: true,
            })
        );

        let expr = Expression::parse("//interface").unwrap();
        assert_eq!(
            expr.conditions[0],
            Condition::Path(PathPattern {
                components: vec!["interface".to_string()],
                anchored: false,
            })
        );
    }

    #[test]
    fn parses_nested_negation() {
        let expr = Expression::parse("!%edit-config").unwrap();
        assert_eq!(
            expr.conditions[0],
            Condition::Not(Box::new(Condition::OpType("edit-config".to_string())))
        );

        let expr = Expression::parse("!!#5").unwrap();
        assert_eq!(
            expr.conditions[0],
            Condition::Not(Box::new(Condition::Not(Box::new(Condition::MaxLine(5)))))
        );
    }

    #[test]
    fn empty_segments_are_dropped() {
        let expr = Expression::parse("%hello;;#10;").unwrap();
        assert_eq!(expr.conditions.len(), 2);
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(matches!(
            Expression::parse("@foo"),
            Err(ExpandParseError::UnknownCommand('@'))
        ));
    }

    #[test]
    fn rejects_bad_numeric_argument() {
        assert!(matches!(
            Expression::parse("^deep"),
            Err(ExpandParseError::InvalidNumber { command: '^', .. })
        ));
        assert!(matches!(
            Expression::parse("#"),
            Err(ExpandParseError::InvalidNumber { command: '#', .. })
        ));
    }

    #[test]
    fn rejects_bare_negation() {
        assert!(matches!(
            Expression::parse("!"),
            Err(ExpandParseError::EmptyNegation)
        ));
    }
}

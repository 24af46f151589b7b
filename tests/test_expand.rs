use trove::config::default_config;
use trove::expand::{ExpandParseError, ExpansionSet, MatchContext};
use trove::parser::{TraceMessage, parse_trace_text};

const SAMPLE_TRACE: &str = r#">>>>out 30-Jun-2021::11:47:04.142 user: tsdn/95 thandle 1912 hostname tsdn-cicd device PE2
<hello xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <capabilities>
    <capability>urn:ietf:params:netconf:base:1.1</capability>
  </capabilities>
</hello>
<<<<in 30-Jun-2021::11:47:04.293 user: tsdn/95 thandle 1912 hostname tsdn-cicd device PE2 session-id=1059273927
<rpc message-id="7" xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <edit-config>
    <target>
      <candidate/>
    </target>
    <config>
      <interfaces>
        <interface>
          <name>ge-0/0/0</name>
        </interface>
      </interfaces>
    </config>
  </edit-config>
</rpc>
"#;

fn set(exprs: &[&str]) -> ExpansionSet {
    let raw: Vec<String> = exprs.iter().map(|s| s.to_string()).collect();
    ExpansionSet::parse(&raw).expect("valid expressions")
}

/// Runs the expansion the way the overview renderer does: message gate
/// first, then every body line in order, collecting matched line numbers.
fn matched_lines(expansions: &ExpansionSet, message: &TraceMessage) -> Vec<usize> {
    let mut ctx = MatchContext::new(&default_config().matcher);
    if !expansions.matches_message(message, &mut ctx) {
        return Vec::new();
    }
    message
        .body
        .iter()
        .enumerate()
        .filter(|(lineno, line)| expansions.matches_line(message, line, lineno + 1, &mut ctx))
        .map(|(lineno, _)| lineno + 1)
        .collect()
}

#[test]
fn type_expression_selects_only_matching_messages() {
    let overview = parse_trace_text(SAMPLE_TRACE, default_config());
    let expansions = set(&["%edit-config"]);
    let mut ctx = MatchContext::new(&default_config().matcher);

    assert!(!expansions.matches_message(&overview.messages[0], &mut ctx));
    assert!(expansions.matches_message(&overview.messages[1], &mut ctx));
}

#[test]
fn anchored_path_matches_length_for_length() {
    let overview = parse_trace_text(SAMPLE_TRACE, default_config());
    let rpc = &overview.messages[1];

    // Open tag and its matching close tag, where the stack is exactly
    // config/interfaces/interface from depth 2 down.
    assert_eq!(
        matched_lines(&set(&["/config/interfaces/interface"]), rpc),
        vec![8, 10]
    );
    // A shorter prefix only matches while no deeper tag is open.
    assert_eq!(
        matched_lines(&set(&["/config/interfaces"]), rpc),
        vec![7, 11]
    );
}

#[test]
fn floating_path_matches_at_any_start_depth() {
    let overview = parse_trace_text(SAMPLE_TRACE, default_config());
    let rpc = &overview.messages[1];

    assert_eq!(matched_lines(&set(&["//interface"]), rpc), vec![8, 10]);
    assert_eq!(matched_lines(&set(&["//name"]), rpc), vec![9]);
    assert!(matched_lines(&set(&["//no-such-tag"]), rpc).is_empty());
}

#[test]
fn depth_and_line_bounds() {
    let overview = parse_trace_text(SAMPLE_TRACE, default_config());
    let rpc = &overview.messages[1];

    assert_eq!(matched_lines(&set(&["^1"]), rpc), vec![1, 2, 13, 14]);
    assert_eq!(matched_lines(&set(&["#3"]), rpc), vec![1, 2, 3]);
}

#[test]
fn attribute_presence_distinguishes_messages() {
    let overview = parse_trace_text(SAMPLE_TRACE, default_config());
    let hello = &overview.messages[0];
    let rpc = &overview.messages[1];

    // Only the second header carries session-id=.
    assert!(matched_lines(&set(&["?session-id"]), hello).is_empty());
    assert_eq!(matched_lines(&set(&["?session-id"]), rpc).len(), rpc.body.len());
    assert_eq!(
        matched_lines(&set(&["?device"]), hello).len(),
        hello.body.len()
    );
}

#[test]
fn conditions_combine_with_and_across_levels() {
    let overview = parse_trace_text(SAMPLE_TRACE, default_config());
    let hello = &overview.messages[0];
    let rpc = &overview.messages[1];

    let expansions = set(&["%edit-config;#2"]);
    assert!(matched_lines(&expansions, hello).is_empty());
    assert_eq!(matched_lines(&expansions, rpc), vec![1, 2]);
}

#[test]
fn multiple_expressions_combine_with_or() {
    let overview = parse_trace_text(SAMPLE_TRACE, default_config());
    let rpc = &overview.messages[1];

    assert_eq!(
        matched_lines(&set(&["//name", "//candidate"]), rpc),
        vec![4, 9]
    );
}

#[test]
fn negation_inverts_line_conditions() {
    let overview = parse_trace_text(SAMPLE_TRACE, default_config());
    let rpc = &overview.messages[1];

    assert_eq!(
        matched_lines(&set(&["!#3"]), rpc),
        (4..=14).collect::<Vec<_>>()
    );
}

#[test]
fn empty_set_expands_nothing() {
    let overview = parse_trace_text(SAMPLE_TRACE, default_config());
    for message in &overview.messages {
        assert!(matched_lines(&ExpansionSet::new(), message).is_empty());
    }
}

#[test]
fn malformed_expressions_are_rejected_at_parse_time() {
    assert!(matches!(
        ExpansionSet::parse(&["@wat".to_string()]),
        Err(ExpandParseError::UnknownCommand('@'))
    ));
    assert!(matches!(
        ExpansionSet::parse(&["^deep".to_string()]),
        Err(ExpandParseError::InvalidNumber { .. })
    ));
    assert!(matches!(
        ExpansionSet::parse(&["!".to_string()]),
        Err(ExpandParseError::EmptyNegation)
    ));
    // One bad segment poisons the whole set.
    assert!(ExpansionSet::parse(&["%ok".to_string(), "#x".to_string()]).is_err());
}

use crate::api::EngineOptions;
use crate::parser::{
    BinaryOp, CompileError, Expr, ParseErrorKind, Parser, Property, Span, parse,
    parse_with_options,
};
use crate::security::SecurityError;
use pretty_assertions::assert_eq;

fn parse_err(source: &str) -> CompileError {
    match parse(source) {
        Ok(expr) => panic!("expected {source:?} to fail, got {expr:?}"),
        Err(err) => err,
    }
}

fn syntax_kind(source: &str) -> (ParseErrorKind, Span) {
    match parse_err(source) {
        CompileError::Syntax(err) => (err.kind, err.span),
        other => panic!("expected a syntax error for {source:?}, got {other:?}"),
    }
}

fn nested_parens(n: usize) -> String {
    format!("{}1{}", "(".repeat(n), ")".repeat(n))
}

// ============================================================================
// Shapes
// ============================================================================

#[test]
fn test_member_chain_shape() {
    assert_eq!(
        parse("a.b[c]").unwrap(),
        Expr::Member {
            object: Box::new(Expr::member(Expr::ident("a"), "b")),
            property: Property::Computed(Box::new(Expr::ident("c"))),
        }
    );
}

#[test]
fn test_reserved_words_are_valid_property_names() {
    assert_eq!(
        parse("a.true.in").unwrap(),
        Expr::member(Expr::member(Expr::ident("a"), "true"), "in")
    );
}

#[test]
fn test_call_arguments() {
    assert_eq!(
        parse("f(1, x,)").unwrap(),
        Expr::Call {
            callee: Box::new(Expr::ident("f")),
            args: vec![Expr::number(1.0), Expr::ident("x")],
        }
    );
    assert_eq!(
        parse("f()").unwrap(),
        Expr::Call {
            callee: Box::new(Expr::ident("f")),
            args: vec![],
        }
    );
}

#[test]
fn test_number_member_access() {
    assert_eq!(
        parse("1.toFixed").unwrap(),
        Expr::member(Expr::number(1.0), "toFixed")
    );
}

#[test]
fn test_in_requires_identifier_boundary() {
    assert_eq!(parse("index").unwrap(), Expr::ident("index"));
    assert_eq!(
        parse("'a' in obj").unwrap(),
        Expr::binary(BinaryOp::In, Expr::string("a"), Expr::ident("obj"))
    );
    assert_eq!(
        parse("'a' in[1]").unwrap(),
        Expr::binary(
            BinaryOp::In,
            Expr::string("a"),
            Expr::Array(vec![Expr::number(1.0)])
        )
    );
    assert_eq!(
        parse("x in(y)").unwrap(),
        Expr::binary(BinaryOp::In, Expr::ident("x"), Expr::ident("y"))
    );
}

#[test]
fn test_typeof_requires_identifier_boundary() {
    assert_eq!(parse("typeofx").unwrap(), Expr::ident("typeofx"));
    assert!(matches!(parse("typeof(x)").unwrap(), Expr::Unary { .. }));
}

#[test]
fn test_unicode_identifiers() {
    assert_eq!(parse("café").unwrap(), Expr::ident("café"));
    assert_eq!(parse("名前").unwrap(), Expr::ident("名前"));
    assert_eq!(parse("$refs").unwrap(), Expr::ident("$refs"));
    assert_eq!(parse("_private").unwrap(), Expr::ident("_private"));
    // KA + VIRAMA + SSA stays one identifier.
    assert_eq!(parse("क्ष").unwrap(), Expr::ident("क्ष"));
    // A joiner in the middle does not split the name.
    assert_eq!(
        parse("a\u{200D}b").unwrap(),
        Expr::ident("a\u{200D}b")
    );
}

#[test]
fn test_identifiers_with_marks_and_connectors() {
    // KHO KHWAI + MAI EK + SARA AA: the tone mark is a nonspacing mark.
    assert_eq!(parse("ค่า").unwrap(), Expr::ident("ค่า"));
    assert_eq!(parse("a\u{203F}b").unwrap(), Expr::ident("a\u{203F}b"));
    assert_eq!(parse("a\u{00B7}b").unwrap(), Expr::ident("a\u{00B7}b"));
    assert_eq!(
        parse("ค่า.ราคา").unwrap(),
        Expr::member(Expr::ident("ค่า"), "ราคา")
    );
}

#[test]
fn test_strict_equality_is_not_loose_then_assign() {
    assert_eq!(
        parse("a === b").unwrap(),
        Expr::binary(BinaryOp::StrictEq, Expr::ident("a"), Expr::ident("b"))
    );
    assert_eq!(
        parse("a !== b").unwrap(),
        Expr::binary(BinaryOp::StrictNe, Expr::ident("a"), Expr::ident("b"))
    );
}

#[test]
fn test_parsing_is_deterministic() {
    let source = "user.items[i + 1].name ?? fallback(a, { k: [1, 2] })";
    assert_eq!(parse(source).unwrap(), parse(source).unwrap());
    assert_eq!(parse("NaN").unwrap(), parse("NaN").unwrap());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_input() {
    assert_eq!(syntax_kind("").0, ParseErrorKind::EmptyExpression);
    assert_eq!(syntax_kind("   \n").0, ParseErrorKind::EmptyExpression);
}

#[test]
fn test_trailing_input() {
    let (kind, span) = syntax_kind("a b");
    assert_eq!(
        kind,
        ParseErrorKind::UnexpectedToken {
            expected: "end of input".into(),
            found: "'b'".into(),
        }
    );
    assert_eq!(span, Span::new(2, 3));
}

#[test]
fn test_assignment_is_rejected() {
    let (kind, span) = syntax_kind("fn().a = 2");
    assert!(matches!(kind, ParseErrorKind::UnexpectedToken { .. }));
    assert_eq!(span, Span::new(7, 8));
}

#[test]
fn test_unclosed_delimiters() {
    assert_eq!(
        syntax_kind("(1 + 2"),
        (
            ParseErrorKind::UnclosedDelimiter { delimiter: '(' },
            Span::new(0, 1)
        )
    );
    assert_eq!(
        syntax_kind("f(1, 2").0,
        ParseErrorKind::UnclosedDelimiter { delimiter: '(' }
    );
    assert_eq!(
        syntax_kind("[1, 2").0,
        ParseErrorKind::UnclosedDelimiter { delimiter: '[' }
    );
    assert_eq!(
        syntax_kind("{ a: 1").0,
        ParseErrorKind::UnclosedDelimiter { delimiter: '{' }
    );
}

#[test]
fn test_mismatched_delimiter() {
    let (kind, _) = syntax_kind("(1]");
    assert_eq!(
        kind,
        ParseErrorKind::UnexpectedToken {
            expected: "')'".into(),
            found: "']'".into(),
        }
    );
}

#[test]
fn test_unterminated_string() {
    let (kind, span) = syntax_kind("a + 'oops");
    assert_eq!(kind, ParseErrorKind::UnterminatedString);
    assert_eq!(span, Span::new(4, 9));
}

#[test]
fn test_ternary_requires_colon() {
    let (kind, _) = syntax_kind("a ? b");
    assert_eq!(
        kind,
        ParseErrorKind::UnexpectedEnd {
            expected: "':'".into()
        }
    );
}

#[test]
fn test_invalid_numbers() {
    assert_eq!(
        syntax_kind("12abc").0,
        ParseErrorKind::InvalidNumber {
            text: "12abc".into()
        }
    );
    assert_eq!(
        syntax_kind("1e").0,
        ParseErrorKind::InvalidNumber { text: "1e".into() }
    );
}

#[test]
fn test_dangling_operator() {
    assert!(matches!(
        syntax_kind("1 +").0,
        ParseErrorKind::UnexpectedEnd { .. }
    ));
    assert!(matches!(
        syntax_kind("a.").0,
        ParseErrorKind::UnexpectedEnd { .. }
    ));
}

#[test]
fn test_unsupported_syntax_is_rejected() {
    for source in ["a = 1", "a; b", "x => x", "[...a]", "/re/", "a & b", "a?.b"] {
        assert!(
            matches!(parse(source), Err(CompileError::Syntax(_))),
            "{source:?} should be a syntax error"
        );
    }
}

// ============================================================================
// Limits
// ============================================================================

#[test]
fn test_deep_parentheses_hit_the_ceiling() {
    assert!(matches!(
        parse(&nested_parens(60)),
        Err(CompileError::Security(SecurityError::DepthExceeded {
            max_depth: 50,
            ..
        }))
    ));
}

#[test]
fn test_nesting_just_below_the_ceiling_succeeds() {
    // The top-level expression counts as the first level.
    assert_eq!(parse(&nested_parens(49)).unwrap(), Expr::number(1.0));
    assert!(matches!(
        parse(&nested_parens(50)),
        Err(CompileError::Security(SecurityError::DepthExceeded { .. }))
    ));
}

#[test]
fn test_unary_prefixes_count_towards_depth() {
    assert!(parse(&format!("{}a", "!".repeat(40))).is_ok());
    assert!(matches!(
        parse(&format!("{}a", "!".repeat(60))),
        Err(CompileError::Security(SecurityError::DepthExceeded { .. }))
    ));
}

#[test]
fn test_long_flat_chains_are_not_nesting() {
    let source = vec!["1"; 500].join(" + ");
    assert!(parse(&source).is_ok());
}

#[test]
fn test_depth_counter_resets_between_parses() {
    let source = nested_parens(30);
    let mut parser = Parser::new(&source, 50);
    assert!(parser.parse().is_ok());
    assert!(parser.parse().is_ok());
}

#[test]
fn test_sibling_nesting_does_not_accumulate() {
    let group = nested_parens(30);
    let source = format!("{group} + {group} + {group}");
    assert!(parse(&source).is_ok());
}

#[test]
fn test_custom_depth_ceiling() {
    let options = EngineOptions {
        max_parse_depth: 5,
        ..EngineOptions::default()
    };
    assert!(parse_with_options(&nested_parens(4), &options).is_ok());
    assert!(parse_with_options(&nested_parens(5), &options).is_err());
}

#[test]
fn test_source_length_cap() {
    let options = EngineOptions {
        max_source_len: 8,
        ..EngineOptions::default()
    };
    assert!(parse_with_options("a + b", &options).is_ok());
    match parse_with_options("a + b + c + d", &options) {
        Err(CompileError::Syntax(err)) => assert_eq!(
            err.kind,
            ParseErrorKind::SourceTooLong {
                len: 13,
                max_len: 8
            }
        ),
        other => panic!("expected SourceTooLong, got {other:?}"),
    }
}

#[test]
fn test_parse_error_diagnostic() {
    let CompileError::Syntax(err) = parse_err("(1") else {
        panic!("expected a syntax error");
    };
    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.code.as_deref(), Some("P003"));
    assert_eq!(diagnostic.span, Some(Span::new(0, 1)));
    assert!(diagnostic.help.is_some());
}

// ============================================================================
// Debug dumps
// ============================================================================

#[test]
fn test_ast_serializes_to_json() {
    let ast = parse("a.b + 1").unwrap();
    assert_eq!(
        serde_json::to_value(&ast).unwrap(),
        serde_json::json!({
            "Binary": {
                "op": "Add",
                "left": {"Member": {"object": {"Ident": "a"}, "property": {"Named": "b"}}},
                "right": {"Literal": {"Number": 1.0}},
            }
        })
    );
}

#[test]
fn test_span_serializes_as_pair() {
    assert_eq!(
        serde_json::to_value(Span(2..5)).unwrap(),
        serde_json::json!([2, 5])
    );
}

#[cfg(test)]
/// Parser unit tests.
///
/// These cover the statement and expression forms fixtures use, automatic semicolon insertion, and error recovery.
mod tests {
    use super::*;

    fn parse_str(source: &str) -> Result<Program, Vec<CompileError>> {
        parse_source(source)
    }

    fn single_expr(source: &str) -> Expr {
        let program = parse_str(source).unwrap();
        match program.body.into_iter().next().map(|s| s.node) {
            Some(Statement::Expr(e)) => e.node,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_escape_fixture_shape() {
        let source = r#"
function testcase() {
    var global = fnGlobalObject();
    var desc = Object.getOwnPropertyDescriptor(global, "escape");
    if (desc.value === global.escape &&
        desc.writable === true &&
        desc.enumerable === false &&
        desc.configurable === true) {
        return true;
    }
}
runTestCase(testcase);
"#;
        let program = parse_str(source).unwrap();
        assert_eq!(program.body.len(), 2);
        assert_eq!(program.function_names().collect::<Vec<_>>(), vec!["testcase"]);
        match &program.body[0].node {
            Statement::Function(f) => {
                assert_eq!(f.body.len(), 3);
                assert!(matches!(f.body[2].node, Statement::If(_)));
            }
            other => panic!("Expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_precedence_mul_over_add() {
        match single_expr("1 + 2 * 3;") {
            Expr::Binary(_, BinaryOp::Add, rhs) => {
                assert!(matches!(rhs.node, Expr::Binary(_, BinaryOp::Mul, _)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_left_associative_subtraction() {
        match single_expr("a - b - c;") {
            Expr::Binary(lhs, BinaryOp::Sub, _) => {
                assert!(matches!(lhs.node, Expr::Binary(_, BinaryOp::Sub, _)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_logical_and_binds_tighter_than_or() {
        match single_expr("a || b && c;") {
            Expr::Logical(_, LogicalOp::Or, rhs) => {
                assert!(matches!(rhs.node, Expr::Logical(_, LogicalOp::And, _)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        match single_expr("a = b = 1;") {
            Expr::Assign { value, .. } => assert!(matches!(value.node, Expr::Assign { .. })),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_compound_assignment_op() {
        match single_expr("x += 1;") {
            Expr::Assign { op, .. } => assert_eq!(op, AssignOp::Compound(BinaryOp::Add)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_invalid_assignment_target() {
        let errs = parse_str("1 = 2;").unwrap_err();
        assert!(errs[0].message.contains("Invalid left-hand side"));
    }

    #[test]
    fn test_asi_at_newline() {
        let program = parse_str("var a = 1\nvar b = 2\na = b").unwrap();
        assert_eq!(program.body.len(), 3);
    }

    #[test]
    fn test_missing_semicolon_on_same_line() {
        let errs = parse_str("var a = 1 var b = 2;").unwrap_err();
        assert!(errs[0].message.contains("Expected ';'"), "{}", errs[0].message);
    }

    #[test]
    fn test_return_newline_returns_undefined() {
        let program = parse_str("function f() { return\ntrue; }").unwrap();
        let Statement::Function(f) = &program.body[0].node else {
            panic!("expected function");
        };
        assert!(matches!(f.body[0].node, Statement::Return(None)));
        assert_eq!(f.body.len(), 2);
    }

    #[test]
    fn test_postfix_update_after_newline_is_prefix_of_next() {
        let program = parse_str("a\n++b").unwrap();
        assert_eq!(program.body.len(), 2);
        match &program.body[1].node {
            Statement::Expr(e) => assert!(matches!(e.node, Expr::Update { prefix: true, .. })),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_for_in_with_var() {
        let program = parse_str("for (var k in obj) { count = count + 1; }").unwrap();
        match &program.body[0].node {
            Statement::ForIn(f) => {
                assert!(f.declares);
                assert_eq!(f.name, "k");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_classic_for_with_in_inside_parens() {
        let program = parse_str("for (var i = ('a' in o) ? 1 : 0; i < 3; i++) {}").unwrap();
        assert!(matches!(program.body[0].node, Statement::For(_)));
    }

    #[test]
    fn test_try_requires_handler_or_finalizer() {
        let errs = parse_str("try { x(); }").unwrap_err();
        assert!(errs[0].message.contains("Missing catch or finally"));
        assert!(parse_str("try { x(); } finally { y(); }").is_ok());
    }

    #[test]
    fn test_new_with_member_callee() {
        match single_expr("new a.B(1).c;") {
            Expr::Member(obj, name) => {
                assert_eq!(name, "c");
                match &obj.node {
                    Expr::New(callee, args) => {
                        assert!(matches!(callee.node, Expr::Member(_, _)));
                        assert_eq!(args.len(), 1);
                    }
                    other => panic!("unexpected {other:?}"),
                }
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_object_literal_keys_normalized() {
        match single_expr("({a: 1, 'b c': 2, 3: 3, if: 4});") {
            Expr::Object(props) => {
                let keys: Vec<_> = props.iter().map(|p| p.key.as_str()).collect();
                assert_eq!(keys, vec!["a", "b c", "3", "if"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_accessor_literal_rejected() {
        let errs = parse_str("var o = { get x() { return 1; } };").unwrap_err();
        assert!(errs[0].message.contains("Accessor properties"));
    }

    #[test]
    fn test_keyword_property_name_after_dot() {
        match single_expr("a.delete;") {
            Expr::Member(_, name) => assert_eq!(name, "delete"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_recovery_reports_multiple_errors() {
        let errs = parse_str("var = 1;\nvar ok = 2;\nif (;\n").unwrap_err();
        assert_eq!(errs.len(), 2, "{errs:?}");
    }

    #[test]
    fn test_deep_nesting_is_an_error_not_a_crash() {
        // Reaching the limit itself takes more stack than the default test thread has in debug builds.
        let handle = std::thread::Builder::new()
            .stack_size(64 * 1024 * 1024)
            .spawn(|| {
                let source = format!("{}1{};", "(".repeat(5000), ")".repeat(5000));
                parse_str(&source).unwrap_err()
            })
            .unwrap();
        let errs = handle.join().unwrap();
        assert!(errs.iter().any(|e| e.message.contains("Nesting too deep")));
    }

    #[test]
    fn test_long_left_deep_chains_are_an_error() {
        let sum = format!("var x = 1{};", "+1".repeat(400_000));
        let errs = parse_str(&sum).unwrap_err();
        assert!(errs.iter().any(|e| e.message.contains("Nesting too deep")), "{errs:?}");

        let members = format!("a{};", ".b".repeat(400_000));
        assert!(parse_str(&members).is_err());

        let calls = format!("f{};", "()".repeat(400_000));
        assert!(parse_str(&calls).is_err());

        let constructed = format!("new A{}();", ".b".repeat(400_000));
        assert!(parse_str(&constructed).is_err());
    }

    #[test]
    fn test_moderate_chains_still_parse() {
        let sum = format!("var x = 1{};", "+1".repeat(150));
        assert!(parse_str(&sum).is_ok());
        assert!(parse_str("a.b.c.d(1)(2).e[0].f();").is_ok());
    }

    #[test]
    fn test_sequence_expression() {
        match single_expr("a = 1, b = 2;") {
            Expr::Sequence(items) => assert_eq!(items.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[cfg(test)]
mod resolver_tests {
    use rlox as lox;

    use lox::error::LoxError;
    use lox::interpreter::Interpreter;
    use lox::parser::Parser;
    use lox::printer::BufferPrinter;
    use lox::resolver::Resolver;
    use lox::scanner::tokenize;

    fn resolve(source: &str) -> Vec<LoxError> {
        let (tokens, _) = tokenize(source);
        let (statements, parse_errors) = Parser::new(tokens).parse();
        assert!(parse_errors.is_empty(), "parse errors: {:?}", parse_errors);

        let mut interpreter = Interpreter::new();
        let errors = Resolver::new(&mut interpreter).resolve(&statements);
        errors
    }

    #[test]
    fn test_self_reference_in_local_initializer() {
        let errors = resolve("{ var a = a; }");

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], LoxError::Resolve { .. }));
        assert!(errors[0].message().contains("own initializer"));
    }

    #[test]
    fn test_global_self_reference_is_left_to_runtime() {
        assert!(resolve("var a = a;").is_empty());
    }

    #[test]
    fn test_outer_variable_in_initializer_is_fine() {
        assert!(resolve("{ var a = 1; { var b = a + 1; } }").is_empty());
    }

    #[test]
    fn test_shadowing_initializer_reads_the_inner_declaration() {
        let errors = resolve("{ var a = 1; { var a = a + 1; } }");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].message().contains("own initializer"));
    }

    #[test]
    fn test_redeclaration_in_block() {
        let errors = resolve("{ var a = 1; var a = 2; }");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].message().contains("already declared"));
    }

    #[test]
    fn test_redeclaration_at_global_scope_is_allowed() {
        assert!(resolve("var a = 1; var a = 2;").is_empty());
    }

    #[test]
    fn test_parameter_redeclared_in_body() {
        let errors = resolve("fun f(a) { var a = 1; }");

        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_top_level_return() {
        let errors = resolve("return 1;");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].message().contains("top-level"));
    }

    #[test]
    fn test_return_inside_function_and_method_is_fine() {
        assert!(resolve("fun f() { { return 1; } } class C { m() { return 2; } }").is_empty());
    }

    #[test]
    fn test_all_errors_are_collected() {
        let errors = resolve("return;\n{ var a = a; var b; var b; }\nreturn 2;");

        assert_eq!(errors.len(), 4, "errors: {:?}", errors);
        let lines: Vec<Option<usize>> = errors.iter().map(LoxError::line).collect();
        assert_eq!(lines, vec![Some(1), Some(2), Some(2), Some(3)]);
    }

    #[test]
    fn test_hop_counts_follow_innermost_binding() {
        // The closure must keep reading the outer `a`, even after a same-named
        // local appears later in the block.
        let source = "var a = \"global\";\n\
                      {\n\
                        fun show() { print a; }\n\
                        show();\n\
                        var a = \"block\";\n\
                        show();\n\
                      }";

        let (tokens, _) = tokenize(source);
        let (statements, _) = Parser::new(tokens).parse();

        let out = BufferPrinter::new();
        let mut interpreter = Interpreter::with_printer(Box::new(out.clone()));
        assert!(Resolver::new(&mut interpreter)
            .resolve(&statements)
            .is_empty());
        interpreter.interpret(&statements).expect("runs");

        assert_eq!(out.lines(), vec!["global", "global"]);
    }
}

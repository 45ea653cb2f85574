#[cfg(test)]
mod interpreter_tests {
    use rlox as lox;

    use lox::interpreter::Interpreter;
    use lox::pipeline::{run, Failure, Stage};
    use lox::printer::BufferPrinter;
    use lox::value::Value;

    fn session() -> (Interpreter, BufferPrinter) {
        let out = BufferPrinter::new();
        let interpreter = Interpreter::with_printer(Box::new(out.clone()));
        (interpreter, out)
    }

    /// Runs `source` and returns the printed lines.
    fn output(source: &str) -> Vec<String> {
        let (mut interpreter, out) = session();
        if let Err(failure) = run(&mut interpreter, source) {
            panic!("{}", failure);
        }
        out.lines()
    }

    fn eval(source: &str) -> String {
        let (mut interpreter, _) = session();
        match run(&mut interpreter, source) {
            Ok(result) => result,
            Err(failure) => panic!("{}", failure),
        }
    }

    fn runtime_error(source: &str) -> String {
        let (mut interpreter, _) = session();
        match run(&mut interpreter, source) {
            Err(Failure {
                stage: Stage::Runtime,
                errors,
            }) => errors[0].message(),
            other => panic!("expected a runtime error, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1 + 2 * 3;"), "7");
        assert_eq!(eval("(1 + 2) * 3;"), "9");
        assert_eq!(eval("-2 * -(3 - 1);"), "4");
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(eval("10 / 4;"), "2.5");
        assert_eq!(eval("3.0;"), "3");
        assert_eq!(eval("nil;"), "nil");
        assert_eq!(eval("1 < 2;"), "true");
    }

    #[test]
    fn test_plus_concatenates_and_coerces() {
        assert_eq!(eval("\"1\" + 2;"), "12");
        assert_eq!(eval("1 + 2;"), "3");
        assert_eq!(eval("\"a\" + \"b\";"), "ab");
        assert_eq!(eval("2.5 + \"x\";"), "2.5x");
        assert_eq!(eval("\"is \" + true;"), "is true");
        assert_eq!(eval("\"a\" + nil;"), "anil");
    }

    #[test]
    fn test_plus_type_error() {
        let message = runtime_error("true + 1;");
        assert!(message.contains("'+'"), "got: {}", message);
    }

    #[test]
    fn test_arithmetic_and_comparison_need_numbers() {
        for op in ["-", "*", "/", ">", ">=", "<", "<="] {
            let message = runtime_error(&format!("1 {} \"a\";", op));
            assert!(
                message.contains(&format!("'{}'", op)),
                "operator {} got: {}",
                op,
                message
            );
        }

        assert!(runtime_error("-\"a\";").contains("'-'"));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(runtime_error("1 / 0;").contains("Division by zero"));
    }

    #[test]
    fn test_equality() {
        assert_eq!(eval("nil == nil;"), "true");
        assert_eq!(eval("nil == false;"), "false");
        assert_eq!(eval("1 == \"1\";"), "false");
        assert_eq!(eval("\"a\" != \"a\";"), "false");
        assert_eq!(eval("clock == clock;"), "true");
        assert_eq!(eval("fun f() {} fun g() {} f == g;"), "false");
    }

    #[test]
    fn test_truthiness() {
        assert_eq!(eval("!nil;"), "true");
        assert_eq!(eval("!0;"), "false");
        assert_eq!(eval("!\"\";"), "false");
        assert_eq!(output("if (0) print \"zero is truthy\";"), vec!["zero is truthy"]);
    }

    #[test]
    fn test_short_circuit() {
        assert_eq!(eval("false and (1/0);"), "false");
        assert_eq!(eval("true or (1/0);"), "true");
        assert_eq!(eval("nil or \"fallback\";"), "fallback");
        assert_eq!(eval("1 and 2;"), "2");
    }

    #[test]
    fn test_blocks_shadow_and_restore() {
        let lines = output(
            "var a = \"outer\";\n\
             { var a = \"inner\"; print a; }\n\
             print a;",
        );

        assert_eq!(lines, vec!["inner", "outer"]);
    }

    #[test]
    fn test_assignment_reaches_enclosing_scope() {
        let lines = output("var a = 1; { { a = a + 1; } } print a;");

        assert_eq!(lines, vec!["2"]);
    }

    #[test]
    fn test_while_and_for_loops() {
        let lines = output(
            "var i = 0; while (i < 3) { print i; i = i + 1; }\n\
             for (var j = 10; j > 8; j = j - 1) print j;",
        );

        assert_eq!(lines, vec!["0", "1", "2", "10", "9"]);
    }

    #[test]
    fn test_if_else() {
        assert_eq!(
            output("if (1 > 2) print \"a\"; else print \"b\";"),
            vec!["b"]
        );
    }

    #[test]
    fn test_closures_capture_by_reference() {
        let lines = output(
            "fun makeCounter() {\n\
               var count = 0;\n\
               fun counter() { count = count + 1; return count; }\n\
               return counter;\n\
             }\n\
             var counter = makeCounter();\n\
             print counter();\n\
             print counter();",
        );

        assert_eq!(lines, vec!["1", "2"]);
    }

    #[test]
    fn test_independent_closures_do_not_share_state() {
        let lines = output(
            "fun makeCounter() { var c = 0; fun inc() { c = c + 1; return c; } return inc; }\n\
             var a = makeCounter(); var b = makeCounter();\n\
             a(); a();\n\
             print a(); print b();",
        );

        assert_eq!(lines, vec!["3", "1"]);
    }

    #[test]
    fn test_closure_sees_later_mutation_of_captured_variable() {
        let lines = output(
            "var f;\n\
             { var x = 1; fun get() { return x; } f = get; x = 2; }\n\
             print f();",
        );

        assert_eq!(lines, vec!["2"]);
    }

    #[test]
    fn test_recursion_and_early_return() {
        let lines = output(
            "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }\n\
             print fib(10);\n\
             fun find() { var i = 0; while (true) { if (i == 3) return i; i = i + 1; } }\n\
             print find();",
        );

        assert_eq!(lines, vec!["55", "3"]);
    }

    #[test]
    fn test_function_without_return_yields_nil() {
        assert_eq!(eval("fun f() { 1; } f();"), "nil");
        assert_eq!(eval("fun g() { return; } g();"), "nil");
    }

    #[test]
    fn test_arity_check() {
        let message = runtime_error("fun one(a) { return a; } one();");
        assert!(message.contains("Expected 1 arguments but got 0"), "got: {}", message);

        let message = runtime_error("fun one(a) { return a; } one(1, 2);");
        assert!(message.contains("Expected 1 arguments but got 2"), "got: {}", message);

        assert_eq!(eval("fun one(a) { return a; } one(5);"), "5");
    }

    #[test]
    fn test_calling_a_non_callable() {
        assert!(runtime_error("\"str\"();").contains("Can only call functions"));
    }

    #[test]
    fn test_undefined_variable() {
        assert!(runtime_error("print missing;").contains("Undefined variable 'missing'"));
        assert!(runtime_error("missing = 1;").contains("Undefined variable 'missing'"));
    }

    #[test]
    fn test_runtime_error_line() {
        let (mut interpreter, _) = session();
        let failure = run(&mut interpreter, "var a = 1;\n\na - \"b\";").unwrap_err();

        assert_eq!(failure.errors[0].line(), Some(3));
        assert_eq!(interpreter.error().map(|e| e.line), Some(3));
    }

    #[test]
    fn test_clock_native() {
        let (mut interpreter, _) = session();
        run(&mut interpreter, "var t = clock();").expect("clock runs");

        match interpreter.global("t") {
            Some(Value::Number(t)) => assert!(t > 1_000_000_000.0),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(eval("clock;"), "<native fn clock>");
        assert!(runtime_error("clock(1);").contains("Expected 0 arguments but got 1"));
    }

    #[test]
    fn test_function_display() {
        assert_eq!(eval("fun hello() {} hello;"), "<fn hello>");
    }

    #[test]
    fn test_class_declaration_is_a_runtime_error() {
        assert!(runtime_error("class A { m() {} }").contains("Classes are not supported"));
    }

    #[test]
    fn test_runaway_recursion_is_a_runtime_error() {
        let (mut interpreter, _) = session();

        let failure = run(&mut interpreter, "var kept = 1;\nfun f(n) { return f(n + 1); }\nf(0);")
            .unwrap_err();

        assert_eq!(failure.stage, Stage::Runtime);
        assert_eq!(failure.errors[0].message(), "Stack overflow.");
        assert_eq!(failure.errors[0].line(), Some(2));

        // the session survives with its globals
        assert_eq!(run(&mut interpreter, "kept + 1;").expect("next run"), "2");
    }

    #[test]
    fn test_deep_but_bounded_recursion_succeeds() {
        assert_eq!(
            eval("fun count(n) { if (n == 0) return 0; return 1 + count(n - 1); } count(1000);"),
            "1000"
        );
    }

    #[test]
    fn test_conditions_update_the_result() {
        let (mut interpreter, _) = session();

        run(&mut interpreter, "1 + 1;").expect("first run");
        assert_eq!(run(&mut interpreter, "if (1 > 0) {}").expect("if"), "true");
        assert_eq!(run(&mut interpreter, "while (nil) {}").expect("while"), "nil");
        assert_eq!(
            run(&mut interpreter, "var i = 0; while (i < 2) i = i + 1;").expect("loop"),
            "false"
        );
    }

    #[test]
    fn test_return_unwinds_nested_blocks_and_restores_environment() {
        let lines = output(
            "var a = \"global\";\n\
             fun f() { { var a = \"local\"; { return a; } } }\n\
             print f();\n\
             print a;",
        );

        assert_eq!(lines, vec!["local", "global"]);
    }
}

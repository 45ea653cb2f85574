#[cfg(test)]
mod scanner_tests {
    use rlox as lox;

    use lox::error::LoxError;
    use lox::scanner::*;
    use lox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let (tokens, errors) = tokenize(source);

        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_two_character_operators() {
        assert_token_sequence(
            "! != = == < <= > >= /",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_keywords_take_precedence_over_identifiers() {
        assert_token_sequence(
            "var nil nil_ish fun _x orchid or",
            &[
                (TokenType::VAR, "var"),
                (TokenType::NIL, "nil"),
                (TokenType::IDENTIFIER, "nil_ish"),
                (TokenType::FUN, "fun"),
                (TokenType::IDENTIFIER, "_x"),
                (TokenType::IDENTIFIER, "orchid"),
                (TokenType::OR, "or"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_number_literals() {
        let (tokens, errors) = tokenize("12 3.25 7.");

        assert!(errors.is_empty());

        let kinds: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(kinds, vec!["12", "3.25", "7.", ""]);

        assert_eq!(tokens[0].literal(), Some(Literal::Number(12.0)));
        assert_eq!(tokens[1].literal(), Some(Literal::Number(3.25)));
        assert_eq!(tokens[2].literal(), Some(Literal::Number(7.0)));
    }

    #[test]
    fn test_malformed_number_is_one_error() {
        let (tokens, errors) = tokenize("1.2.3 + 4..5;\nx");

        assert_eq!(errors.len(), 2, "errors: {:?}", errors);
        assert!(errors[0].message().contains("Malformed number literal '1.2.3'"));
        assert!(errors[1].message().contains("'4..5'"));
        assert_eq!(errors[0].line(), Some(1));

        let kinds: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(kinds, vec!["+", ";", "x", ""]);
    }

    #[test]
    fn test_string_literal_carries_contents() {
        let (tokens, errors) = tokenize("\"hello world\"");

        assert!(errors.is_empty());
        assert_eq!(tokens[0].lexeme, "\"hello world\"");
        assert_eq!(tokens[0].literal(), Some(Literal::Str("hello world")));
    }

    #[test]
    fn test_comments_and_whitespace_produce_no_tokens() {
        assert_token_sequence(
            "// nothing here\n\t  a // trailing\n",
            &[(TokenType::IDENTIFIER, "a"), (TokenType::EOF, "")],
        );
    }

    #[test]
    fn test_line_numbers_count_newlines_in_strings_and_comments() {
        let (tokens, errors) = tokenize("a\n\"x\ny\"\n// c\nb");

        assert!(errors.is_empty());
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 3);
        assert_eq!(tokens[2].lexeme, "b");
        assert_eq!(tokens[2].line, 5);
        assert_eq!(tokens[3].token_type, TokenType::EOF);
    }

    #[test]
    fn test_unterminated_string_is_reported_and_scan_finishes() {
        let (tokens, errors) = tokenize("print \"abc");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("Unterminated string"));
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].token_type, TokenType::PRINT);
        assert_eq!(tokens[1].token_type, TokenType::EOF);
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let results: Vec<_> = Scanner::new(source).collect();

        // COMMA, DOT, error for '$', LEFT_PAREN, error for '#', EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let errors: Vec<&LoxError> = results.iter().filter_map(|r| r.as_ref().err()).collect();
        assert_eq!(errors.len(), 2, "Expected 2 error messages");

        for err in errors {
            assert!(
                err.to_string().contains("Unexpected character"),
                "got: {}",
                err
            );
        }

        fn assert_token_matches(
            result: &Result<Token, LoxError>,
            expected_type: TokenType,
            expected_lexeme: &str,
        ) {
            match result {
                Ok(token) => {
                    assert_eq!(token.token_type, expected_type);
                    assert_eq!(token.lexeme, expected_lexeme);
                }
                Err(e) => panic!("Expected token but got error: {}", e),
            }
        }
    }

    #[test]
    fn test_unrecognized_run_is_one_error() {
        let (tokens, errors) = tokenize("a @#$ b");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].message().contains("@#$"));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_eof_is_emitted_once() {
        let mut scanner = Scanner::new("");

        assert!(matches!(
            scanner.next(),
            Some(Ok(Token {
                token_type: TokenType::EOF,
                ..
            }))
        ));
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_token_display() {
        let (tokens, _) = tokenize("42 \"hi\" x");

        assert_eq!(tokens[0].to_string(), "NUMBER 42 42.0");
        assert_eq!(tokens[1].to_string(), "STRING \"hi\" hi");
        assert_eq!(tokens[2].to_string(), "IDENTIFIER x null");
    }
}

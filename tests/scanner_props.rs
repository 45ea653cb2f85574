//! Property tests for the scanner:
//! 1. Concatenated lexemes reproduce the source minus whitespace, comments,
//!    unrecognised characters and unterminated strings (inputs holding a
//!    malformed number are skipped).
//! 2. Scanning never panics and always ends in exactly one `EOF`.

use proptest::prelude::*;

use rlox::scanner::{is_recognizable, tokenize};
use rlox::token::TokenType;

fn lex_then_reconstruct(source: &str) -> String {
    let (tokens, _) = tokenize(source);
    tokens.iter().map(|t| t.lexeme.as_str()).collect()
}

/// Independent model of what survives scanning, character by character.
fn strip_comments_whitespace_unrecognized(source: &str) -> String {
    let mut out = String::new();
    let mut pending_string = String::new();
    let mut in_comment = false;
    let mut in_string = false;
    let mut previous: Option<char> = None;

    for c in source.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
            }
        } else if !in_string {
            if c == '/' && previous == Some('/') {
                in_comment = true;
                out.pop();
            }
            if c == '"' {
                in_string = true;
            }
        } else if c == '"' {
            in_string = false;
            out.push('"');
            out.push_str(&pending_string);
            pending_string.clear();
        } else {
            pending_string.push(c);
        }

        let is_white = matches!(c, ' ' | '\t' | '\r' | '\n');
        let recognizable = c.is_ascii() && is_recognizable(c as u8);

        if !in_string && !in_comment && !is_white && recognizable {
            out.push(c);
        }

        // A `/` that opened a comment cannot also pair with the next one.
        previous = if in_comment { None } else { Some(c) };
    }

    out
}

fn lox_like_source() -> impl Strategy<Value = String> {
    prop::string::string_regex(r#"[a-z0-9_ \n\t(){};,.+\-*/!=<>"$#@é]{0,64}"#)
        .expect("valid regex")
}

proptest! {
    #[test]
    fn lexemes_reconstruct_filtered_source(source in lox_like_source()) {
        // A malformed number is dropped whole, which the model does not track.
        let (_, errors) = tokenize(&source);
        prop_assume!(!errors
            .iter()
            .any(|e| e.message().starts_with("Malformed number literal")));

        prop_assert_eq!(
            lex_then_reconstruct(&source),
            strip_comments_whitespace_unrecognized(&source)
        );
    }

    #[test]
    fn scanning_never_faults(source in any::<String>()) {
        let (tokens, _errors) = tokenize(&source);

        let eofs = tokens.iter().filter(|t| t.token_type == TokenType::EOF).count();
        prop_assert_eq!(eofs, 1);
        prop_assert_eq!(&tokens.last().expect("EOF token").token_type, &TokenType::EOF);
    }
}

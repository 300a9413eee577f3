//! Unit tests for the lexer module.

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.ru".to_string()))
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("let const fn return print true false"),
        vec![
            TokenKind::Let,
            TokenKind::Const,
            TokenKind::Fn,
            TokenKind::Return,
            TokenKind::Print,
            TokenKind::True,
            TokenKind::False,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_type_specifiers() {
    let tokens = kinds("int float string bool void");

    assert!(tokens[..5].iter().all(|kind| kind.is_type_specifier()));
    assert_eq!(tokens[0], TokenKind::IntType);
    assert_eq!(tokens[4], TokenKind::VoidType);
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo bar baz_123 _underscore CamelCase letter".to_string();
    let tokens = tokenize(source, Some("test.ru".to_string())).unwrap();

    let values: Vec<&str> = tokens[..6].iter().map(|t| t.value.as_str()).collect();
    assert_eq!(
        values,
        vec!["foo", "bar", "baz_123", "_underscore", "CamelCase", "letter"]
    );
    assert!(tokens[..6]
        .iter()
        .all(|token| token.kind == TokenKind::Identifier));
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 3.14 0 100.5".to_string();
    let tokens = tokenize(source, Some("test.ru".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Integer);
    assert_eq!(tokens[2].value, "0");
    assert_eq!(tokens[3].kind, TokenKind::Float);
    assert_eq!(tokens[3].value, "100.5");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_strings() {
    let source = r#""hello" "world" "multiple words" """#.to_string();
    let tokens = tokenize(source, Some("test.ru".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "world");
    assert_eq!(tokens[2].value, "multiple words");
    assert_eq!(tokens[3].kind, TokenKind::String);
    assert_eq!(tokens[3].value, "");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_string_escapes() {
    let source = r#""hello\nworld" "tab\there" "backslash\\" "hex\x41" "quote\"test""#.to_string();
    let tokens = tokenize(source, Some("test.ru".to_string())).unwrap();

    assert_eq!(tokens[0].value, "hello\nworld");
    assert_eq!(tokens[1].value, "tab\there");
    assert_eq!(tokens[2].value, "backslash\\");
    assert_eq!(tokens[3].value, "hexA");
    assert_eq!(tokens[4].value, "quote\"test");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * / % == != < > <= >= = && || !"),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::Assignment,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_compound_operators() {
    let tokens = kinds("++ -- += -= *= /= %=");

    assert_eq!(tokens[0], TokenKind::PlusPlus);
    assert_eq!(tokens[1], TokenKind::MinusMinus);
    assert!(tokens[2..7].iter().all(|kind| kind.is_assignment_operator()));
    assert_eq!(tokens[6], TokenKind::PercentEquals);
    assert_eq!(tokens[7], TokenKind::EOF);
}

#[test]
fn test_tokenize_operators_without_spaces() {
    assert_eq!(
        kinds("a<=-b"),
        vec![
            TokenKind::Identifier,
            TokenKind::LessEquals,
            TokenKind::Dash,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } , ; :"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let source = "let x = 5; // this is a comment\nlet y = 10;".to_string();
    let tokens = tokenize(source, Some("test.ru".to_string())).unwrap();

    assert_eq!(tokens.len(), 11);
    assert_eq!(tokens[3].value, "5");
    assert_eq!(tokens[5].kind, TokenKind::Let);
    assert_eq!(tokens[6].value, "y");
}

#[test]
fn test_tokenize_function_declaration() {
    assert_eq!(
        kinds("fn int add(int a, int b) { return a + b; }")[..8],
        [
            TokenKind::Fn,
            TokenKind::IntType,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::IntType,
            TokenKind::Identifier,
            TokenKind::Comma,
            TokenKind::IntType,
        ]
    );
}

#[test]
fn test_token_spans() {
    let source = "let  abc = 1;".to_string();
    let tokens = tokenize(source, Some("test.ru".to_string())).unwrap();

    assert_eq!(tokens[1].span.start.0, 5);
    assert_eq!(tokens[1].span.end.0, 8);
    assert_eq!(*tokens[1].span.start.1, "test.ru");
    assert_eq!(tokens[5].span.start.0, 13);
}

#[test]
fn test_tokenize_unrecognized_token() {
    let source = "let x = @".to_string();
    let error = tokenize(source, Some("test.ru".to_string())).unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 8);
}

#[test]
fn test_tokenize_unterminated_string() {
    let result = tokenize("print \"abc;".to_string(), None);

    assert!(result.is_err());
}

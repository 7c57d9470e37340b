use goose::ast::{BinOp, Expr, Stmt};
use goose::lexer::{tokenize, TokenKind};
use goose::parser::{parse, Parser};
use goose::SyntaxError;

macro_rules! parse {
    ($input:expr) => {{
        parse(tokenize($input).unwrap())
    }};
}

macro_rules! parse_expr {
    ($input:expr) => {{
        let mut parser = Parser::new(tokenize($input).unwrap());
        parser.parse_expression()
    }};
}

fn num(n: i32) -> Expr {
    Expr::Number(n)
}

fn var(name: &str) -> Expr {
    Expr::Var(name.to_string())
}

#[test]
fn test_integer_literal() {
    assert_eq!(parse_expr!("42").unwrap(), num(42));
}

#[test]
fn test_string_literal() {
    assert!(matches!(
        parse_expr!(r#""hello""#).unwrap(),
        Expr::Str(s) if s == "hello"
    ));
}

#[test]
fn test_multiplication_binds_tighter() {
    assert_eq!(
        parse!("1 + 2 * 3").unwrap(),
        Stmt::Expr(Expr::binary(
            num(1),
            BinOp::Add,
            Expr::binary(num(2), BinOp::Mul, num(3))
        ))
    );
}

#[test]
fn test_subtraction_is_left_associative() {
    assert_eq!(
        parse!("1 - 2 - 3").unwrap(),
        Stmt::Expr(Expr::binary(
            Expr::binary(num(1), BinOp::Sub, num(2)),
            BinOp::Sub,
            num(3)
        ))
    );
}

#[test]
fn test_mixed_levels_fold_left() {
    // a - b + c  ==  (a - b) + c
    assert_eq!(
        parse_expr!("a - b + c").unwrap(),
        Expr::binary(
            Expr::binary(var("a"), BinOp::Sub, var("b")),
            BinOp::Add,
            var("c")
        )
    );
    // 8 / 4 * 2  ==  (8 / 4) * 2
    assert_eq!(
        parse_expr!("8 / 4 * 2").unwrap(),
        Expr::binary(
            Expr::binary(num(8), BinOp::Div, num(4)),
            BinOp::Mul,
            num(2)
        )
    );
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(
        parse_expr!("(1 + 2) * 3").unwrap(),
        Expr::binary(
            Expr::binary(num(1), BinOp::Add, num(2)),
            BinOp::Mul,
            num(3)
        )
    );
    assert_eq!(parse_expr!("((7))").unwrap(), num(7));
}

#[test]
fn test_assignment() {
    assert_eq!(
        parse!("x = 1 + 2;").unwrap(),
        Stmt::Assign {
            name: "x".into(),
            value: Expr::binary(num(1), BinOp::Add, num(2)),
        }
    );
}

#[test]
fn test_lone_identifier_is_a_reference() {
    assert_eq!(parse!("x").unwrap(), Stmt::Expr(var("x")));
}

#[test]
fn test_identifier_starting_an_expression() {
    assert_eq!(
        parse!("x * 2 + 1").unwrap(),
        Stmt::Expr(Expr::binary(
            Expr::binary(var("x"), BinOp::Mul, num(2)),
            BinOp::Add,
            num(1)
        ))
    );
}

#[test]
fn test_unterminated_parenthesis() {
    let err = parse!("(1 + 2").unwrap_err();
    assert!(matches!(
        err,
        SyntaxError::Unexpected {
            found: TokenKind::EndOfInput,
            expected: "`)`",
            ..
        }
    ));
}

#[test]
fn test_wrong_closing_token() {
    let err = parse!("(1 + 2;").unwrap_err();
    assert_eq!(err.found(), &TokenKind::Semicolon);
    let msg = err.to_string();
    assert!(msg.contains("`;`"), "{msg}");
    assert!(msg.contains("semicolon"), "{msg}");
}

#[test]
fn test_premature_end_of_input() {
    for src in ["", "x =", "1 +", "2 *", "("] {
        let err = parse!(src).unwrap_err();
        assert_eq!(err.found(), &TokenKind::EndOfInput, "{src:?}");
    }
}

#[test]
fn test_assignment_target_must_be_identifier() {
    let err = parse!("1 = 2").unwrap_err();
    assert_eq!(err.found(), &TokenKind::Assign);
}

#[test]
fn test_trailing_tokens_rejected() {
    assert!(parse!("1 2").is_err());
    assert!(parse!("x = 1; y = 2").is_err());
    assert!(parse!("1;;").is_err());
}

#[test]
fn test_operator_without_operand() {
    let err = parse!("* 3").unwrap_err();
    assert_eq!(err.found(), &TokenKind::Star);
}

use crate::BinaryOp;
use crate::_expression_parser::FnUpdateTemp;
use crate::_expression_parser::FnUpdateTemp::*;
use std::iter::Peekable;
use std::str::Chars;

impl TryFrom<&str> for FnUpdateTemp {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let tokens = tokenize_group(&mut value.chars().peekable(), true)?;
        Ok(*(parse_expression(&tokens)?))
    }
}

/// **(internal)** Tokens occurring in the string representation of an update function.
#[derive(Debug, Eq, PartialEq)]
enum Token {
    Not,                // '!'
    And,                // '&'
    Or,                 // '|'
    Xor,                // '^'
    Imp,                // '=>'
    Iff,                // '<=>'
    Comma,              // ','
    Name(String),       // 'name'
    Tokens(Vec<Token>), // A block of tokens inside parentheses
}

/// **(internal)** Binary operators ordered from the weakest to the strongest binding.
static OPERATOR_PRIORITY: [(Token, BinaryOp); 5] = [
    (Token::Iff, BinaryOp::Iff),
    (Token::Imp, BinaryOp::Imp),
    (Token::Or, BinaryOp::Or),
    (Token::And, BinaryOp::And),
    (Token::Xor, BinaryOp::Xor),
];

/// **(internal)** Process a peekable iterator of characters into a vector of `Token`s.
///
/// The caller consumes the opening parenthesis and the recursive call consumes the
/// closing parenthesis. Use `top_level` to indicate that there will be no closing parenthesis.
fn tokenize_group(data: &mut Peekable<Chars>, top_level: bool) -> Result<Vec<Token>, String> {
    let mut output = Vec::new();
    while let Some(c) = data.next() {
        match c {
            c if c.is_whitespace() => {}
            '!' => output.push(Token::Not),
            ',' => output.push(Token::Comma),
            '&' => output.push(Token::And),
            '|' => output.push(Token::Or),
            '^' => output.push(Token::Xor),
            '=' => {
                expect_char(data, '>')?;
                output.push(Token::Imp);
            }
            '<' => {
                expect_char(data, '=')?;
                expect_char(data, '>')?;
                output.push(Token::Iff);
            }
            ')' if top_level => return Err("Unexpected ')'.".to_string()),
            ')' => return Ok(output),
            '(' => output.push(Token::Tokens(tokenize_group(data, false)?)),
            c if is_valid_in_name(c) => {
                let mut name = String::from(c);
                while let Some(c) = data.peek().cloned() {
                    if !is_valid_in_name(c) {
                        break;
                    }
                    name.push(c);
                    data.next();
                }
                output.push(Token::Name(name));
            }
            _ => return Err(format!("Unexpected '{}'.", c)),
        }
    }
    if top_level {
        Ok(output)
    } else {
        Err("Expected ')'.".to_string())
    }
}

/// **(internal)** Consume the next character, failing if it is not `expected`.
fn expect_char(data: &mut Peekable<Chars>, expected: char) -> Result<(), String> {
    match data.next() {
        Some(c) if c == expected => Ok(()),
        Some(c) => Err(format!("Expected '{}', found '{}'.", expected, c)),
        None => Err(format!("Expected '{}', found end of input.", expected)),
    }
}

/// **(internal)** Check if given char can appear in a name.
fn is_valid_in_name(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '{' || c == '}'
}

/// **(internal)** Parse a complete expression, starting with the weakest operator.
fn parse_expression(data: &[Token]) -> Result<Box<FnUpdateTemp>, String> {
    parse_binary(data, 0)
}

/// **(internal)** Split `data` on the first operator of the given priority `level`.
///
/// The left side cannot contain this operator, so it is parsed at the next level. The right
/// side is parsed at the same level again, making all operators right associative.
fn parse_binary(data: &[Token], level: usize) -> Result<Box<FnUpdateTemp>, String> {
    let Some((token, op)) = OPERATOR_PRIORITY.get(level) else {
        return parse_terminal(data);
    };
    match data.iter().position(|it| it == token) {
        Some(i) => Ok(Box::new(Binary(
            *op,
            parse_binary(&data[..i], level + 1)?,
            parse_binary(&data[(i + 1)..], level)?,
        ))),
        None => parse_binary(data, level + 1),
    }
}

/// **(internal)** Parse negations, constants, variables, parameter calls and parentheses.
fn parse_terminal(data: &[Token]) -> Result<Box<FnUpdateTemp>, String> {
    match data {
        [] => Err("Expected formula, found nothing.".to_string()),
        [Token::Not, rest @ ..] => Ok(Box::new(Not(parse_terminal(rest)?))),
        [Token::Name(name)] => Ok(Box::new(match name.as_str() {
            "true" | "1" => Const(true),
            "false" | "0" => Const(false),
            _ => Var(name.clone()),
        })),
        [Token::Tokens(inner)] => parse_expression(inner),
        [Token::Name(name), Token::Tokens(args)] => {
            Ok(Box::new(Param(name.clone(), parse_arguments(args)?)))
        }
        _ => Err(format!("Unexpected: {:?}. Expecting formula.", data)),
    }
}

/// **(internal)** Parse a comma separated list of function arguments.
fn parse_arguments(data: &[Token]) -> Result<Vec<FnUpdateTemp>, String> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let mut result = Vec::new();
    for arg in data.split(|it| *it == Token::Comma) {
        if arg.is_empty() {
            return Err("Found empty function argument.".to_string());
        }
        result.push(*parse_expression(arg)?);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use crate::_expression_parser::FnUpdateTemp;
    use crate::BinaryOp;

    #[test]
    fn parse_update_function_basic() {
        let inputs = vec![
            "var",
            "var1(a, b, c)",
            "!foo(a)",
            "(var(a, b) | x)",
            "(xyz123 & abc)",
            "(a ^ b)",
            "(a => b)",
            "(a <=> b)",
            "(a <=> !(f(a, b) => (c ^ d)))",
            "f(a, f(b), c)",
        ];
        for str in inputs {
            assert_eq!(str, FnUpdateTemp::try_from(str).unwrap().to_string())
        }
    }

    #[test]
    fn update_function_constants() {
        assert_eq!(
            FnUpdateTemp::try_from("0").unwrap(),
            FnUpdateTemp::Const(false)
        );
        assert_eq!(
            FnUpdateTemp::try_from("true").unwrap(),
            FnUpdateTemp::Const(true)
        );
        assert_eq!(
            FnUpdateTemp::try_from("0 | f(x,1)").unwrap(),
            FnUpdateTemp::Binary(
                BinaryOp::Or,
                Box::new(FnUpdateTemp::Const(false)),
                Box::new(FnUpdateTemp::Param(
                    "f".to_string(),
                    vec![
                        FnUpdateTemp::Var("x".to_string()),
                        FnUpdateTemp::Const(true)
                    ]
                ))
            )
        )
    }

    #[test]
    fn invalid_expressions() {
        let inputs = vec![
            "a = b",
            "a > b",
            "a <= b",
            "a ? b",
            "a & (b <=> c",
            "(f => g))",
            "f(a b c)",
            "f(a, b, c,)",
            "a & | g",
            "a &",
            "a & !",
            "a & a b c",
            "a & x^",
            ",hello",
        ];
        for str in inputs {
            assert!(FnUpdateTemp::try_from(str).is_err(), "{}", str);
        }
    }

    #[test]
    fn operator_priority_test() {
        let formula = "a & b | c => d ^ e <=> f";
        let expected = "((((a & b) | c) => (d ^ e)) <=> f)".to_string();
        assert_eq!(
            expected,
            FnUpdateTemp::try_from(formula).unwrap().to_string()
        );
        assert_eq!(
            "(a | (b | c))",
            FnUpdateTemp::try_from("a | b | c").unwrap().to_string()
        );
    }
}

//! Raw token definitions for the inside of a tag
//!
//! These are the logos tokens recognised between `{$ NAME` and `$}`. They only classify
//! slices; turning a slice into a [Token](crate::script::Token) (unescaping strings, parsing
//! numbers) happens in the lexer, which knows the absolute offsets for error reporting.
use logos::Logos;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TagToken {
    #[token("$}")]
    TerminateTag,

    #[regex(r"[A-Za-z][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"@[A-Za-z][A-Za-z0-9_]*")]
    Function,

    // A leading minus belongs to the literal only when a digit follows it directly;
    // longest-match makes `-5` a number and `- 5` an operator followed by a number.
    #[regex(r"-?[0-9]+")]
    Integer,

    #[regex(r"-?[0-9]+\.[0-9]+([eE][+\-]?[0-9]+)?")]
    #[regex(r"-?[0-9]+[eE][+\-]?[0-9]+")]
    Double,

    #[regex(r#""([^"\\]|\\[^\n])*""#)]
    String,

    #[regex(r"[+\-*/^]")]
    Operator,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TagToken> {
        TagToken::lexer(source).filter_map(|t| t.ok()).collect()
    }

    #[test]
    fn test_minus_is_contextual() {
        assert_eq!(kinds("-5"), vec![TagToken::Integer]);
        assert_eq!(
            kinds("- 5"),
            vec![TagToken::Operator, TagToken::Integer]
        );
        assert_eq!(kinds("-"), vec![TagToken::Operator]);
    }

    #[test]
    fn test_doubles() {
        assert_eq!(kinds("1.5"), vec![TagToken::Double]);
        assert_eq!(kinds("-0.25e3"), vec![TagToken::Double]);
        assert_eq!(kinds("3E2"), vec![TagToken::Double]);
    }

    #[test]
    fn test_identifiers_and_functions() {
        assert_eq!(
            kinds("i_1 @sin $}"),
            vec![TagToken::Identifier, TagToken::Function, TagToken::TerminateTag]
        );
    }

    #[test]
    fn test_string_with_escapes() {
        assert_eq!(kinds(r#""a \"b\" \\ c""#), vec![TagToken::String]);
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let mut lexer = TagToken::lexer("\"abc");
        assert!(matches!(lexer.next(), Some(Err(_))));
    }
}

//! Error kinds, their messages, and the context dispatchers attach.

use semantium_foundation::{
    Error, ErrorContext, ErrorKind, SemanticLimit, Type, Value, expect_arity, expect_arity_range,
};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_unknown_word() {
    let err = Error::unknown_word("invalidWord");
    assert!(matches!(err.kind, ErrorKind::UnknownWord(_)));
    assert!(format!("{err}").contains("invalidWord"));
}

#[test]
fn error_not_callable() {
    let err = Error::not_callable("then");
    assert!(matches!(err.kind, ErrorKind::NotCallable(_)));
    assert!(format!("{err}").contains("then"));
}

#[test]
fn error_parameters_expected() {
    let err = Error::parameters_expected("X");
    assert!(matches!(err.kind, ErrorKind::ParametersExpected(_)));
    assert!(format!("{err}").contains('X'));
}

#[test]
fn error_ambiguous_grammar_names_blocks() {
    let err = Error::ambiguous_grammar("go", vec!["Left".to_string(), "Right".to_string()]);
    assert!(err.is_ambiguity());
    assert_eq!(
        format!("{err}"),
        "ambiguous grammar: word 'go' is defined by Left and Right"
    );
}

#[test]
fn error_unsupported_word() {
    let err = Error::unsupported_word("Start", "A", "word declared twice");
    let msg = format!("{err}");
    assert!(msg.contains("Start"));
    assert!(msg.contains("word declared twice"));
    assert!(!err.is_ambiguity());
}

#[test]
fn error_unknown_continuation_block() {
    let err = Error::unknown_continuation_block("Nowhere");
    if let ErrorKind::UnknownContinuationBlock {
        block,
        referenced_from,
    } = &err.kind
    {
        assert_eq!(block, "Nowhere");
        assert!(referenced_from.is_none());
    } else {
        panic!("Expected UnknownContinuationBlock");
    }
}

#[test]
fn error_limit_exceeded() {
    let err = Error::limit_exceeded(SemanticLimit::MaxParameters { limit: 2, actual: 3 });
    assert_eq!(
        format!("{err}"),
        "limit exceeded: max parameters (2) exceeded: got 3"
    );
}

// =============================================================================
// Error Kind Matching
// =============================================================================

#[test]
fn type_mismatch_names_both_types() {
    let err = Error::type_mismatch(Type::Int, Type::String);
    assert!(matches!(
        &err.kind,
        ErrorKind::TypeMismatch { expected: Type::Int, actual: Type::String }
    ));
    assert_eq!(err.to_string(), "type mismatch: expected int, got string");
}

#[test]
fn arity_mismatch_keeps_description() {
    let err = Error::arity_mismatch("exactly 2".to_string(), 5);
    let ErrorKind::ArityMismatch { expected, actual } = &err.kind else {
        panic!("wrong kind: {:?}", err.kind);
    };
    assert_eq!((expected.as_str(), *actual), ("exactly 2", 5));
}

// =============================================================================
// Error with Context
// =============================================================================

#[test]
fn error_context_display() {
    let context = ErrorContext::new()
        .with_block("Transition")
        .with_word("invalidWord")
        .with_path("A.then");
    assert_eq!(format!("{context}"), "at Transition.invalidWord (after A.then)");

    let empty_path = ErrorContext::new().with_word("B").with_path("");
    assert_eq!(format!("{empty_path}"), "at B (after <start>)");
}

#[test]
fn error_with_context_keeps_inner() {
    let err = Error::unknown_word("x")
        .with_context(ErrorContext::new().with_word("inner"))
        .with_context(ErrorContext::new().with_word("outer"));

    let context = err.context.unwrap();
    assert_eq!(context.word.as_deref(), Some("inner"));
}

// =============================================================================
// Error Propagation
// =============================================================================

#[test]
#[allow(clippy::result_large_err)]
fn error_result_propagation() {
    fn handler(args: &[Value]) -> semantium_foundation::Result<i64> {
        expect_arity(args, 1)?;
        args[0].expect_int()
    }

    assert_eq!(handler(&[Value::Int(10)]).unwrap(), 10);
    assert!(matches!(
        handler(&[]).unwrap_err().kind,
        ErrorKind::ArityMismatch { .. }
    ));
    assert!(matches!(
        handler(&[Value::from("ten")]).unwrap_err().kind,
        ErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn arity_range() {
    let two = [Value::Int(1), Value::Int(2)];
    assert!(expect_arity_range(&two, 1, 3).is_ok());
    assert!(expect_arity_range(&two, 3, 4).is_err());
}

// =============================================================================
// Type enum
// =============================================================================

#[test]
fn type_display() {
    assert_eq!(format!("{}", Type::Int), "int");
    assert_eq!(format!("{}", Type::Float), "float");
    assert_eq!(format!("{}", Type::String), "string");
    assert_eq!(format!("{}", Type::Bool), "bool");
    assert_eq!(format!("{}", Type::Nil), "nil");
}

#[test]
fn type_accepts() {
    assert!(Type::Any.accepts(&Type::String));
    assert!(Type::Float.accepts(&Type::Int));
    assert!(!Type::Int.accepts(&Type::Float));
    assert!(Type::option(Type::Int).accepts(&Type::Nil));
}

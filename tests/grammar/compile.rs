//! Integration tests for catalog compilation
//!
//! Tests block registration, word validation, and eager continuation checks.

use semantium_foundation::{ErrorKind, Value, expect_arity};
use semantium_grammar::{
    BlockDefinition, Continuation, Grammar, GrammarConfig, GrammarDefinition, WordDefinition,
    WordKind,
};

type Log = Vec<String>;

fn definition() -> GrammarDefinition<Log> {
    GrammarDefinition::default()
        .block(
            BlockDefinition::initial("Initial")
                .static_word("A", Continuation::to(["Transition"]))
                .parametric_word("X", |log: &mut Log, args| {
                    expect_arity(args, 1)?;
                    log.push(format!("X({})", args[0]));
                    Ok(Continuation::to(["Transition"]))
                })
                .hybrid_word(
                    "E",
                    Continuation::to(["Transition"]),
                    |log: &mut Log, _| {
                        log.push("E called".to_string());
                        Ok(Continuation::to(["Transition"]))
                    },
                ),
        )
        .block(BlockDefinition::new("Transition").static_word("then", Continuation::to(["Initial"])))
}

// =============================================================================
// Catalog
// =============================================================================

#[test]
fn compile_indexes_every_word() {
    let grammar = Grammar::compile(definition()).unwrap();
    let catalog = grammar.catalog();

    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.name_count(), 4);
    assert_eq!(grammar.registry().len(), 2);

    let x = &catalog.descriptors("X")[0];
    assert_eq!(x.kind, WordKind::Parametric);
    assert_eq!(x.qualified_name(), "Initial.X");
    assert_eq!(&*x.block_name, "Initial");
    assert!(catalog.descriptors("missing").is_empty());
}

#[test]
fn block_words_keep_declaration_order() {
    let grammar = Grammar::compile(definition()).unwrap();
    let initial = grammar.catalog().block_id("Initial").unwrap();

    let names: Vec<&str> = grammar
        .catalog()
        .block_words(initial)
        .iter()
        .map(|d| &*d.name)
        .collect();
    assert_eq!(names, ["A", "X", "E"]);
}

#[test]
fn initial_words_come_from_initial_blocks() {
    let grammar = Grammar::compile(definition()).unwrap();
    let names: Vec<String> = grammar
        .initial_words()
        .iter()
        .map(|d| d.name.to_string())
        .collect();
    assert_eq!(names, ["A", "X", "E"]);
}

#[test]
fn same_word_in_different_blocks_compiles() {
    let grammar = Grammar::compile(
        GrammarDefinition::<Log>::default()
            .block(BlockDefinition::initial("Left").static_word("go", Continuation::result()))
            .block(BlockDefinition::new("Right").static_word("go", Continuation::result())),
    )
    .unwrap();
    assert_eq!(grammar.catalog().descriptors("go").len(), 2);
}

// =============================================================================
// Rejected Definitions
// =============================================================================

#[test]
fn duplicate_block_is_rejected() {
    let err = Grammar::compile(
        GrammarDefinition::<Log>::default()
            .block(BlockDefinition::initial("Start"))
            .block(BlockDefinition::new("Start")),
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateBlock(_)));
}

#[test]
fn duplicate_word_is_rejected() {
    let err = Grammar::compile(
        GrammarDefinition::<Log>::default().block(
            BlockDefinition::initial("Start")
                .static_word("A", Continuation::result())
                .static_word("A", Continuation::result()),
        ),
    )
    .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnsupportedWordDefinition { .. }
    ));
}

#[test]
fn non_identifier_word_is_rejected() {
    let err = Grammar::compile(
        GrammarDefinition::<Log>::default()
            .block(BlockDefinition::initial("Start").static_word("two words", Continuation::result())),
    )
    .unwrap_err();
    assert!(format!("{err}").contains("not an identifier"));
}

#[test]
fn empty_fixed_continuation_is_rejected() {
    let err = Grammar::compile(GrammarDefinition::<Log>::default().block(
        BlockDefinition::initial("Start").word("A", WordDefinition::to(Continuation::default())),
    ))
    .unwrap_err();
    assert!(format!("{err}").contains("continuation names no target"));
}

#[test]
fn unknown_block_fails_at_definition_time() {
    let err = Grammar::compile(
        GrammarDefinition::<Log>::default()
            .block(BlockDefinition::initial("Start").static_word("A", Continuation::to(["Nowhere"]))),
    )
    .unwrap_err();

    if let ErrorKind::UnknownContinuationBlock {
        block,
        referenced_from,
    } = &err.kind
    {
        assert_eq!(block, "Nowhere");
        assert_eq!(referenced_from.as_deref(), Some("Start.A"));
    } else {
        panic!("Expected UnknownContinuationBlock, got {err}");
    }
}

#[test]
fn unknown_block_deferred_without_validation() {
    let grammar = Grammar::compile(
        GrammarDefinition::<Log>::default()
            .with_config(GrammarConfig::permissive())
            .block(BlockDefinition::initial("Start").static_word("A", Continuation::to(["Nowhere"]))),
    )
    .unwrap();

    let err = grammar
        .resolve(&Continuation::to(["Nowhere"]), None)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownContinuationBlock { .. }));
}

#[test]
fn no_initial_blocks() {
    let grammar = Grammar::compile(
        GrammarDefinition::<Log>::default()
            .block(BlockDefinition::new("Orphan").static_word("A", Continuation::result())),
    )
    .unwrap();
    let err = grammar.entry_continuation().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoInitialBlocks));
}

// =============================================================================
// Word Evaluation
// =============================================================================

#[test]
fn evaluate_access_and_call() {
    let grammar = Grammar::compile(definition()).unwrap();
    let catalog = grammar.catalog();
    let mut log = grammar.new_chain();

    let a = &catalog.descriptors("A")[0];
    let x = &catalog.descriptors("X")[0];
    let e = &catalog.descriptors("E")[0];

    assert_eq!(
        grammar.evaluate_access(a, &mut log).unwrap(),
        Continuation::to(["Transition"])
    );
    grammar.evaluate_call(x, &mut log, &[Value::Int(10)]).unwrap();
    grammar.evaluate_access(e, &mut log).unwrap();
    grammar.evaluate_call(e, &mut log, &[]).unwrap();

    assert_eq!(log, ["X(10)", "E called"]);
}

#[test]
fn evaluate_rejects_wrong_convention() {
    let grammar = Grammar::compile(definition()).unwrap();
    let catalog = grammar.catalog();
    let mut log = grammar.new_chain();

    let a = &catalog.descriptors("A")[0];
    let x = &catalog.descriptors("X")[0];

    let err = grammar.evaluate_call(a, &mut log, &[]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotCallable(_)));

    let err = grammar.evaluate_access(x, &mut log).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ParametersExpected(_)));

    let err = grammar.evaluate_call(x, &mut log, &[]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ArityMismatch { .. }));
    assert!(log.is_empty());
}

#[test]
fn limits_follow_config() {
    let grammar = Grammar::compile(
        definition().with_config(
            GrammarConfig::new()
                .with_max_chain_length(2)
                .with_max_parameters(1),
        ),
    )
    .unwrap();

    assert!(grammar.check_chain_length(1).is_ok());
    assert!(grammar.check_chain_length(2).is_err());
    assert!(grammar.check_parameters(1).is_ok());
    assert!(matches!(
        grammar.check_parameters(2).unwrap_err().kind,
        ErrorKind::LimitExceeded(_)
    ));
}

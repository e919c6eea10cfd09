//! Getters, parametric handlers, and hybrid handlers run against the chain.

use semantium_foundation::{ErrorKind, Value, expect_arity};
use semantium_grammar::{Accessed, BlockDefinition, Continuation, GrammarDefinition};
use semantium_recording::{DispatchState, History, InstructionChain, Semantic};

use crate::common::simple_semantic;

#[derive(Default)]
struct Recorder {
    history: History,
    invocations: String,
}

impl InstructionChain for Recorder {
    type Output = String;

    fn history(&self) -> &History {
        &self.history
    }

    fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    fn finalize_recording(&mut self) -> String {
        self.invocations.clone()
    }

    fn fresh(&self) -> Self {
        Self::default()
    }
}

fn base() -> Continuation {
    Continuation::to(["Base"])
}

fn log_call(name: &'static str) -> impl Fn(&mut Recorder, &[Value]) -> semantium_foundation::Result<Continuation> {
    move |recorder, args| {
        expect_arity(args, 1)?;
        recorder.invocations.push_str(&format!("{name}.Call({});", args[0]));
        Ok(base())
    }
}

fn log_get(name: &'static str) -> Accessed<Recorder> {
    Accessed::getter(move |recorder: &mut Recorder| {
        recorder.invocations.push_str(&format!("{name}.Get;"));
        Ok(base())
    })
}

#[test]
fn getters_run_on_access() {
    let semantic: Semantic<Recorder> = Semantic::define(
        GrammarDefinition::default().block(
            BlockDefinition::initial("Base")
                .static_word("A", base().with_result())
                .getter_word("B", |r: &mut Recorder| {
                    r.invocations.push_str("B;");
                    Ok(base().with_result())
                })
                .getter_word("C", |r: &mut Recorder| {
                    r.invocations.push_str("C;");
                    Ok(base().with_result())
                }),
        ),
    )
    .unwrap();

    let result = semantic
        .root()
        .and_then(|root| root.get("A"))
        .and_then(|d| d.get("B"))
        .and_then(|d| d.get("A"))
        .and_then(|d| d.get("C"))
        .and_then(|d| d.get("A"))
        .and_then(|d| d.result())
        .unwrap();

    assert_eq!(*result, "B;C;");
}

#[test]
fn parametric_handlers_receive_parameters() {
    let semantic: Semantic<Recorder> = Semantic::define(
        GrammarDefinition::default().block(
            BlockDefinition::initial("Base")
                .static_word("A", base().with_result())
                .parametric_word("B", log_call("B"))
                .parametric_word("C", log_call("C")),
        ),
    )
    .unwrap();

    let result = semantic
        .root()
        .and_then(|root| root.get("A"))
        .and_then(|d| d.call("B", &[Value::Int(5)]))
        .and_then(|d| d.get("A"))
        .and_then(|d| d.call("C", &[Value::Int(10)]))
        .and_then(|d| d.get("A"))
        .and_then(|d| d.result())
        .unwrap();

    assert_eq!(*result, "B.Call(5);C.Call(10);");
}

#[test]
fn hybrid_handlers_run_per_convention() {
    let semantic: Semantic<Recorder> = Semantic::define(
        GrammarDefinition::default().block(
            BlockDefinition::initial("Base")
                .static_word("A", base().with_result())
                .hybrid_word("B", log_get("B"), log_call("B"))
                .hybrid_word("C", log_get("C"), log_call("C")),
        ),
    )
    .unwrap();

    let result = semantic
        .root()
        .and_then(|root| root.get("A"))
        .and_then(|d| d.get("B"))
        .and_then(|d| d.get("A"))
        .and_then(|d| d.call("B", &[Value::Int(5)]))
        .and_then(|d| d.get("A"))
        .and_then(|d| d.get("C"))
        .and_then(|d| d.get("A"))
        .and_then(|d| d.call("C", &[Value::Int(10)]))
        .and_then(|d| d.get("A"))
        .and_then(|d| d.result())
        .unwrap();

    assert_eq!(*result, "B.Get;B.Call(5);C.Get;C.Call(10);");
}

#[test]
fn getter_continuation_checked_on_use() {
    let semantic: Semantic<Recorder> = Semantic::define(
        GrammarDefinition::default().block(
            BlockDefinition::initial("Base")
                .getter_word("lost", |_: &mut Recorder| Ok(Continuation::to(["Nowhere"]))),
        ),
    )
    .unwrap();

    let err = semantic.root().and_then(|root| root.get("lost")).unwrap_err();
    if let ErrorKind::UnknownContinuationBlock {
        block,
        referenced_from,
    } = &err.kind
    {
        assert_eq!(block, "Nowhere");
        assert_eq!(referenced_from.as_deref(), Some("Base.lost"));
    } else {
        panic!("Expected UnknownContinuationBlock, got {err}");
    }
}

// =============================================================================
// Calling Conventions
// =============================================================================

#[test]
fn parametric_word_needs_parameters() {
    let root = simple_semantic().root().unwrap();
    let then = root.get("A").unwrap().get("then").unwrap();

    let err = then.get("X").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ParametersExpected(_)));

    let err = root.get("X").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ParametersExpected(_)));
}

#[test]
fn static_word_is_not_callable() {
    let root = simple_semantic().root().unwrap();
    let err = root.call("A", &[Value::Int(1)]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotCallable(_)));
}

#[test]
fn handler_rejection_carries_context() {
    let root = simple_semantic().root().unwrap();
    let then = root.get("A").unwrap().get("then").unwrap();

    let err = then.call("X", &[Value::from("ten")]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));

    let context = err.context.unwrap();
    assert_eq!(context.block.as_deref(), Some("Parametric"));
    assert_eq!(context.word.as_deref(), Some("X"));
    assert_eq!(context.path.as_deref(), Some("A.then"));
}

#[test]
fn rejected_call_is_never_visible() {
    let root = simple_semantic().root().unwrap();
    let a = root.get("A").unwrap();
    let then = a.get("then").unwrap();
    assert_eq!(then.chain_id(), a.chain_id());

    assert!(then.call("X", &[]).is_err());
    assert_eq!(then.state(), DispatchState::Consulted);

    // The held chain is back where `then` left it, for every position sharing it.
    for position in [&a, &then] {
        assert_eq!(position.inspect(|c| c.history().path()), "A.then");
        assert_eq!(position.inspect(|c| c.text.clone()), "A.then");
    }

    let retry = then.call("X", &[Value::Int(10)]).unwrap();
    assert_eq!(retry.path(), "A.then.X(10)");
    assert_ne!(retry.chain_id(), then.chain_id());
    assert_eq!(retry.inspect(|c| c.history().path()), "A.then.X(10)");
}

#[test]
fn failing_handler_state_is_rolled_back() {
    let semantic: Semantic<Recorder> = Semantic::define(
        GrammarDefinition::default().block(
            BlockDefinition::initial("Base")
                .static_word("A", base().with_result())
                .parametric_word("P", |r: &mut Recorder, args| {
                    r.invocations.push_str("P;");
                    expect_arity(args, 1)?;
                    Ok(base().with_result())
                }),
        ),
    )
    .unwrap();

    let a = semantic.root().and_then(|root| root.get("A")).unwrap();
    assert!(a.call("P", &[]).is_err());
    assert_eq!(a.inspect(|r| r.history.path()), "A");
    assert_eq!(a.inspect(|r| r.invocations.clone()), "");

    let called = a.call("P", &[Value::Int(1)]).unwrap();
    assert_eq!(*called.result().unwrap(), "P;");
}

#[test]
fn targetless_runtime_continuation_is_rejected() {
    let semantic: Semantic<Recorder> = Semantic::define(
        GrammarDefinition::default().block(
            BlockDefinition::initial("Base")
                .static_word("A", base().with_result())
                .getter_word("nowhere", |_: &mut Recorder| Ok(Continuation::default()))
                .parametric_word("lost", |_: &mut Recorder, _| Ok(Continuation::default())),
        ),
    )
    .unwrap();
    let a = semantic.root().and_then(|root| root.get("A")).unwrap();

    let accessed = a.get("nowhere").unwrap_err();
    let called = a.call("lost", &[Value::Int(1)]).unwrap_err();
    for (err, word) in [(accessed, "nowhere"), (called, "lost")] {
        let ErrorKind::UnsupportedWordDefinition { block, word: name, .. } = &err.kind else {
            panic!("wrong kind: {:?}", err.kind);
        };
        assert_eq!((block.as_str(), name.as_str()), ("Base", word));
    }
    assert_eq!(a.inspect(|r| r.history.path()), "A");
}

#[test]
fn hybrid_words_step_both_ways() {
    let root = simple_semantic().root().unwrap();

    let accessed = root.get("E").unwrap();
    assert_eq!(accessed.path(), "E");

    let called = root.call("E", &[Value::Int(5)]).unwrap();
    assert_eq!(called.path(), "E(5)");

    let no_args = root.call("E", &[]).unwrap();
    assert_eq!(no_args.path(), "E()");
}

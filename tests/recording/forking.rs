//! Reusing a position forks its chain; forks replay the shared prefix.

use std::rc::Rc;

use proptest::prelude::*;
use semantium_foundation::Value;
use semantium_grammar::{BlockDefinition, Continuation, GrammarDefinition};
use semantium_recording::{ChainElement, Dispatcher, History, InstructionChain, Semantic, Step};

use crate::common::Sequence;

// =============================================================================
// Entry Forks
// =============================================================================

#[test]
fn entry_word_forks_per_continuation() {
    let semantic: Semantic<Sequence> = Semantic::define(
        GrammarDefinition::default()
            .block(BlockDefinition::initial("BlockA").static_word("A", Continuation::to(["BlockB", "BlockC"])))
            .block(BlockDefinition::new("BlockB").static_word("B", Continuation::result()))
            .block(BlockDefinition::new("BlockC").static_word("C", Continuation::result())),
    )
    .unwrap();

    let a = semantic.root().and_then(|root| root.get("A")).unwrap();
    let chain1 = a.get("B").and_then(|d| d.result()).unwrap();
    let chain2 = a.get("C").and_then(|d| d.result()).unwrap();

    assert_eq!(*chain1, "A.B");
    assert_eq!(*chain2, "A.C");
}

// =============================================================================
// Parametric Forks
// =============================================================================

fn options() -> Semantic<Sequence> {
    Semantic::define(
        GrammarDefinition::default()
            .block(BlockDefinition::initial("Start").static_word("start", Continuation::to(["Options"])))
            .block(
                BlockDefinition::new("Options")
                    .parametric_word("either", |_, _| Ok(Continuation::to(["Options"]).with_result())),
            ),
    )
    .unwrap()
}

fn strs(values: &[&str]) -> Vec<Value> {
    values.iter().map(|v| Value::from(*v)).collect()
}

#[test]
fn parametric_reuse_forks() {
    let semantic = options();
    let start = semantic.root().and_then(|root| root.get("start")).unwrap();

    let chain1 = start.call("either", &strs(&["A", "B"])).and_then(|d| d.result()).unwrap();
    let chain2 = start.call("either", &strs(&["C", "D"])).and_then(|d| d.result()).unwrap();

    let intermediate = start.call("either", &strs(&["E"])).unwrap();
    let chain3 = intermediate.result().unwrap();
    let chain4 = intermediate
        .call("either", &strs(&["F"]))
        .and_then(|d| d.result())
        .unwrap();

    let Step::Parametric(fork1) = intermediate.word("either").unwrap() else {
        panic!("either is parametric");
    };
    let fork3 = fork1.call(&strs(&["F.1"])).and_then(|d| d.result()).unwrap();
    let fork4 = fork1.call(&strs(&["F.2"])).and_then(|d| d.result()).unwrap();

    assert_eq!(*chain1, "start.either(A,B)");
    assert_eq!(*chain2, "start.either(C,D)");
    assert_eq!(*chain3, "start.either(E)");
    assert_eq!(*chain4, "start.either(E).either(F)");
    assert_eq!(*fork3, "start.either(E).either(F.1)");
    assert_eq!(*fork4, "start.either(E).either(F.2)");
}

// =============================================================================
// Hybrid Forks
// =============================================================================

#[derive(Default)]
struct HybridLog {
    history: History,
    sequence: String,
}

impl InstructionChain for HybridLog {
    type Output = String;

    fn history(&self) -> &History {
        &self.history
    }

    fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    fn on_instruction(&mut self, element: &Rc<ChainElement>) {
        let word = element.word().name();
        match element.parameters() {
            None if word == "start" => self.sequence.push_str("start"),
            None => self.sequence.push_str(&format!(".{word}[get]")),
            Some(params) => {
                let value = params.first().map(ToString::to_string).unwrap_or_default();
                self.sequence.push_str(&format!(".{word}(\"{value}\")"));
            }
        }
    }

    fn finalize_recording(&mut self) -> String {
        self.sequence.clone()
    }

    fn fresh(&self) -> Self {
        Self::default()
    }
}

#[test]
fn hybrid_reuse_forks() {
    let next = || Continuation::to(["HybridBlock"]).with_result();
    let semantic: Semantic<HybridLog> = Semantic::define(
        GrammarDefinition::default()
            .block(BlockDefinition::initial("Start").static_word("start", Continuation::to(["HybridBlock"])))
            .block(BlockDefinition::new("HybridBlock").hybrid_word("H", next(), move |_, _| Ok(next()))),
    )
    .unwrap();

    let value = |v: &str| [Value::from(v)];
    let start = semantic.root().and_then(|root| root.get("start")).unwrap();

    let intermediate1 = start.get("H").unwrap();
    let chain1 = intermediate1.result().unwrap();
    let chain2 = intermediate1.get("H").and_then(|d| d.result()).unwrap();
    let intermediate2 = intermediate1.call("H", &value("value")).unwrap();
    let chain3 = intermediate2.result().unwrap();
    let chain4 = intermediate2.get("H").and_then(|d| d.result()).unwrap();
    let chain5 = intermediate2
        .call("H", &value("value2"))
        .and_then(|d| d.result())
        .unwrap();

    let Step::Hybrid(fork1) = intermediate1.word("H").unwrap() else {
        panic!("H is hybrid");
    };
    let fork3 = fork1.call(&value("Fork")).and_then(|d| d.result()).unwrap();
    let fork4 = fork1.get("H").and_then(|d| d.result()).unwrap();

    assert_eq!(*chain1, "start.H[get]");
    assert_eq!(*chain2, "start.H[get].H[get]");
    assert_eq!(*chain3, "start.H[get].H(\"value\")");
    assert_eq!(*chain4, "start.H[get].H(\"value\").H[get]");
    assert_eq!(*chain5, "start.H[get].H(\"value\").H(\"value2\")");

    assert_eq!(*fork3, "start.H[get].H(\"Fork\")");
    assert_eq!(*fork4, "start.H[get].H[get].H[get]");
}

// =============================================================================
// Fork and Replay
// =============================================================================

fn looping() -> Semantic<Sequence> {
    Semantic::define(
        GrammarDefinition::default().block(
            BlockDefinition::initial("Loop")
                .static_word("a", Continuation::to(["Loop"]).with_result())
                .parametric_word("b", |_, _| Ok(Continuation::to(["Loop"]).with_result())),
        ),
    )
    .unwrap()
}

fn step(from: &Dispatcher<Sequence>, word: Option<i64>) -> Dispatcher<Sequence> {
    match word {
        None => from.get("a").unwrap(),
        Some(n) => from.call("b", &[Value::Int(n)]).unwrap(),
    }
}

fn rendered(words: &[Option<i64>]) -> String {
    words
        .iter()
        .map(|w| match w {
            None => "a".to_string(),
            Some(n) => format!("b({n})"),
        })
        .collect::<Vec<_>>()
        .join(".")
}

proptest! {
    #[test]
    fn fork_replays_exactly_the_prefix(
        words in prop::collection::vec(prop::option::of(-50_i64..50), 1..12),
        branch in any::<prop::sample::Index>(),
        extra in prop::option::of(-50_i64..50),
    ) {
        let semantic = looping();
        let root = semantic.root().unwrap();

        let mut positions = vec![step(root.dispatcher(), words[0])];
        for word in &words[1..] {
            let next = step(positions.last().unwrap(), *word);
            positions.push(next);
        }

        let full = positions.last().unwrap().result().unwrap();
        prop_assert_eq!(&*full, &rendered(&words));

        // Every position but the last was consulted once already, so this
        // step forks through the position's origin.
        let at = branch.index(words.len());
        let branched = step(&positions[at], extra);

        let mut expected = words[..=at].to_vec();
        expected.push(extra);
        let branched_result = branched.result().unwrap();
        prop_assert_eq!(branched_result.as_str(), rendered(&expected));
        prop_assert_eq!(branched.path(), branched.inspect(|c| c.history().path()));

        // The original traversal is untouched and stays memoized.
        let again = positions.last().unwrap().result().unwrap();
        prop_assert!(Rc::ptr_eq(&full, &again));
        prop_assert_eq!(
            positions[at].inspect(|c| c.text.clone()),
            rendered(&words)
        );
    }
}

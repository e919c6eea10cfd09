//! A small traced grammar.

use std::rc::Rc;

use semantium_debug::{SharedTracer, Tracer, TracerConfig};
use semantium_foundation::expect_arity;
use semantium_grammar::{BlockDefinition, Continuation, GrammarDefinition};
use semantium_recording::{History, InstructionChain, Semantic};

#[derive(Default)]
pub struct Words(History);

impl InstructionChain for Words {
    type Output = String;

    fn history(&self) -> &History {
        &self.0
    }

    fn history_mut(&mut self) -> &mut History {
        &mut self.0
    }

    fn finalize_recording(&mut self) -> String {
        self.0.path()
    }

    fn fresh(&self) -> Self {
        Self::default()
    }
}

/// `Initial { A, X(n) } -> Transition { then } -> Initial | result`
pub fn traced(config: TracerConfig) -> (Semantic<Words>, SharedTracer) {
    let tracer = SharedTracer::new(Tracer::new(config));
    let semantic = Semantic::define(
        GrammarDefinition::default()
            .block(
                BlockDefinition::initial("Initial")
                    .static_word("A", Continuation::to(["Transition"]))
                    .parametric_word("X", |_, args| {
                        expect_arity(args, 1)?;
                        args[0].expect_int()?;
                        Ok(Continuation::to(["Transition"]))
                    }),
            )
            .block(
                BlockDefinition::new("Transition")
                    .static_word("then", Continuation::to(["Initial"]).with_result()),
            ),
    )
    .unwrap()
    .with_observer(Rc::new(tracer.clone()));
    (semantic, tracer)
}

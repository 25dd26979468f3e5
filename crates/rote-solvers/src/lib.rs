//! Decision side of the engine.
//!
//! Every routine looks at one [`UiTree`] snapshot and the [`EngineContext`] and
//! returns a [`Plan`]. Nothing here clicks or writes; the engine loop executes plans.

pub mod advance;
pub mod collector;
pub mod definition_to_word;
pub mod flashcard;
pub mod plan;
pub mod site;
pub mod word_to_example;

use std::fmt;

use rote_core::{EngineContext, UiTree};

pub use plan::{Hold, Plan};

/// The solver routines, in the order a cycle runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solver {
    AdvanceButtons,
    ArrowNext,
    HarvestFlashcard,
    DefinitionToWord,
    WordToExample,
    StepFlashcard,
}

impl Solver {
    pub const ALL: [Solver; 6] = [
        Solver::AdvanceButtons,
        Solver::ArrowNext,
        Solver::HarvestFlashcard,
        Solver::DefinitionToWord,
        Solver::WordToExample,
        Solver::StepFlashcard,
    ];

    pub fn decide(&self, tree: &UiTree, ctx: &EngineContext) -> Plan {
        match self {
            Solver::AdvanceButtons => advance::click_action_buttons(tree),
            Solver::ArrowNext => advance::click_arrow_next(tree),
            Solver::HarvestFlashcard => flashcard::harvest(tree, ctx),
            Solver::DefinitionToWord => definition_to_word::solve(tree, ctx),
            Solver::WordToExample => word_to_example::solve(tree, ctx),
            Solver::StepFlashcard => flashcard::step(tree, ctx),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Solver::AdvanceButtons => "advance-buttons",
            Solver::ArrowNext => "arrow-next",
            Solver::HarvestFlashcard => "harvest-flashcard",
            Solver::DefinitionToWord => "definition-to-word",
            Solver::WordToExample => "word-to-example",
            Solver::StepFlashcard => "step-flashcard",
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

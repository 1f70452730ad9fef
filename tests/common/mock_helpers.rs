//! Mock construction helpers

use mockall::mock;
use pipeprune_rs::undo::{GraphChange, UndoStack};

mock! {
    pub Undo {}

    impl UndoStack for Undo {
        fn begin_transaction(&mut self, label: &str);
        fn end_transaction(&mut self);
        fn begin_exclusion(&mut self);
        fn end_exclusion(&mut self);
        fn record(&mut self, change: GraphChange);
        fn clear_history(&mut self);
        fn depth(&self) -> usize;
    }
}

/// An undo mock that fails the test on any call
pub fn untouched_undo() -> MockUndo {
    MockUndo::new()
}

/// An undo mock expecting exactly one transaction labelled `label`
pub fn single_transaction_undo(label: &'static str) -> MockUndo {
    let mut seq = mockall::Sequence::new();
    let mut undo = MockUndo::new();
    undo.expect_begin_transaction()
        .withf(move |l: &str| l == label)
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    undo.expect_record().return_const(());
    undo.expect_end_transaction()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    undo
}

//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use crossbeam_channel::Receiver;
use pipeprune_rs::PipelineGraph;

/// Everything currently queued on `rx`
pub fn drain<T>(rx: &Receiver<T>) -> Vec<T> {
    rx.try_iter().collect()
}

/// Names of all live nodes, in id order
pub fn node_names(graph: &PipelineGraph) -> Vec<String> {
    graph.iter().map(|node| node.name().to_string()).collect()
}

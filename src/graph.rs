//! Keyword graph for a chapter.
//!
//! The graph is a star: one root node for the chapter and one leaf per
//! keyword, each joined to the root. Keyword co-occurrence is not modelled.

use crate::keywords::Keyword;
use serde::Serialize;
use ts_rs::TS;

pub const ROOT_ID: &str = "Chapter";
pub const ROOT_VALUE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct GraphNode {
    pub id: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct KeywordGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl KeywordGraph {
    pub fn root(&self) -> &GraphNode {
        &self.nodes[0]
    }

    pub fn leaves(&self) -> &[GraphNode] {
        &self.nodes[1..]
    }
}

/// Build the star graph for an already ranked keyword list.
pub fn build_graph(keywords: &[Keyword]) -> KeywordGraph {
    let mut nodes = Vec::with_capacity(keywords.len() + 1);
    nodes.push(GraphNode {
        id: ROOT_ID.to_string(),
        value: ROOT_VALUE,
    });
    nodes.extend(keywords.iter().map(|keyword| GraphNode {
        id: keyword.term.clone(),
        value: keyword.frequency,
    }));

    let edges = keywords
        .iter()
        .map(|keyword| GraphEdge {
            source: ROOT_ID.to_string(),
            target: keyword.term.clone(),
            weight: keyword.frequency,
        })
        .collect();

    KeywordGraph { nodes, edges }
}

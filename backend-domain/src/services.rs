// Domain services

pub mod link_graph;

pub use link_graph::*;

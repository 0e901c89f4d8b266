mod arena;
mod node;
mod raw_max_tree;

pub(crate) use arena::Handle;
pub(crate) use raw_max_tree::RawMaxTree;

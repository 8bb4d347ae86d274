pub mod category_tree;

pub use category_tree::{CategoryNode, CategoryTree};

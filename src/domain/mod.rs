pub mod article;

pub use article::{Article, CONTRIBUTOR_NOT_AVAILABLE};

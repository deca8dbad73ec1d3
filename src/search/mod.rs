mod query;

pub use query::{QueryExpander, expand_query, expand_text};

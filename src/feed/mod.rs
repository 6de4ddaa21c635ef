mod ingestor;

pub use ingestor::{clean_summary, first_author, last_path_segment, AuthorEntry, FeedIngestor};

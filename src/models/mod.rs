mod paper;
mod settings;

pub use paper::{Enrichment, NewPaper, Paper, Recommendation};
pub use settings::UserSettings;

pub mod batch_orchestrator;
pub mod duckduckgo_scraper;
pub mod founder_linkedin_finder;
pub mod openai_client;
pub mod ownership_analyzer;
pub mod prompt_builder;
pub mod search_aggregator;
pub mod search_provider;

#[cfg(test)]
pub mod test_doubles;

pub use batch_orchestrator::*;
pub use duckduckgo_scraper::*;
pub use founder_linkedin_finder::*;
pub use openai_client::*;
pub use ownership_analyzer::*;
pub use prompt_builder::*;
pub use search_aggregator::*;
pub use search_provider::*;

//! Find recipes for the ingredients you already have.
//!
//! A [`RecipeFinder`] takes the ingredient text a user typed, searches the
//! Spoonacular API for matching recipes, fetches each recipe's instructions
//! in turn and renders a card per recipe into an [`OutputSink`].
//!
//! ```no_run
//! # use kitchen_finder::{HtmlSink, RecipeFinder};
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let finder = RecipeFinder::builder().api_key("your-api-key").build()?;
//! let mut sink = HtmlSink::new();
//! finder.run("eggs, spinach", &mut sink).await;
//! println!("{}", sink.document());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod pipeline;
pub mod render;

pub use builder::RecipeFinderBuilder;
pub use client::{RecipeSource, SpoonacularClient};
pub use config::{DetailFailure, FinderConfig};
pub use error::FinderError;
pub use input::{validate, ValidatedQuery};
pub use model::{RecipeCard, RecipeDetail, SearchResult};
pub use pipeline::{
    RecipeFinder, RunOutcome, RunState, Stage, StagePolicy, NO_RECIPES_MESSAGE,
    SEARCH_FAILED_WARNING,
};
pub use render::{HtmlSink, OutputSink, TerminalSink};

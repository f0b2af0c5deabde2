//! Turn a list of ingredients, or a photo of a pantry, into a recipe with
//! per-step illustrations and a nutrition estimate.
//!
//! Every generative step is delegated to a model provider (Google Gemini,
//! OpenAI or Anthropic). The crate normalizes the ingredients, runs a fixed
//! linear workflow and parses the model's JSON answers into typed records.
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let state = pantry_chef::PantryChef::builder()
//!     .ingredients(["tomato", "onion", "bell pepper", "garlic"])
//!     .build()
//!     .await?;
//!
//! if let Some(recipe) = &state.recipe {
//!     println!("{}", pantry_chef::present::render_recipe(recipe));
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod detect;
pub mod error;
pub mod ingredients;
pub mod model;
pub mod present;
pub mod prompts;
pub mod providers;
pub mod workflow;

// Re-export commonly used types
pub use builder::{InputSource, PantryChef, PantryChefBuilder, ProviderKind};
pub use error::{ChefError, ProviderError};
pub use model::{GeneratedImage, Nutrition, Recipe, RecipeState, StepImage};
pub use workflow::Workflow;

use std::path::Path;

/// Convenience function to cook from a list of ingredient names
///
/// Uses the provider configuration from `config.toml` / environment.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let state = pantry_chef::cook_from_ingredients(&["rice", "egg"]).await?;
/// # Ok(())
/// # }
/// ```
pub async fn cook_from_ingredients<S: AsRef<str>>(
    ingredients: &[S],
) -> Result<RecipeState, ChefError> {
    PantryChef::builder()
        .ingredients(ingredients.iter().map(|i| i.as_ref().to_string()))
        .build()
        .await
}

/// Convenience function to cook from a pantry photo
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let state = pantry_chef::cook_from_photo("data/pantry_sample.jpg").await?;
/// # Ok(())
/// # }
/// ```
pub async fn cook_from_photo(path: impl AsRef<Path>) -> Result<RecipeState, ChefError> {
    PantryChef::builder()
        .pantry_photo(path.as_ref())
        .build()
        .await
}

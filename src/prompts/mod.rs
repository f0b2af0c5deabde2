//! Prompt templates sent to the generative model.
//!
//! The long prompts live in `.txt` files next to this module and are embedded
//! at compile time with `include_str!`, so they can be edited without dealing
//! with Rust string syntax.

use crate::model::Recipe;

/// Instructions for producing the recipe JSON record
pub const RECIPE_PROMPT: &str = include_str!("recipe.txt");

/// Instructions for producing the nutrition JSON record
pub const NUTRITION_PROMPT: &str = include_str!("nutrition.txt");

/// Question asked about a pantry photo
pub const DETECT_INGREDIENTS_PROMPT: &str = include_str!("detect.txt");

/// Full prompt for a recipe using `ingredients`
pub fn recipe_prompt(ingredients: &[String]) -> String {
    format!(
        "{}\nIngredients: {}",
        RECIPE_PROMPT,
        ingredients.join(", ")
    )
}

/// Full prompt for a nutrition estimate of `recipe`
pub fn nutrition_prompt(recipe: &Recipe) -> String {
    let mut prompt = format!("{}\nRecipe: {}\n\nIngredients:\n", NUTRITION_PROMPT, recipe.title);
    for ingredient in &recipe.ingredients {
        prompt.push_str(&format!("- {}\n", ingredient));
    }
    prompt.push_str("\nInstructions:\n");
    for (i, step) in recipe.instructions.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, step));
    }
    prompt
}

/// Prompt for the illustration of a single instruction
pub fn step_image_prompt(step: &str) -> String {
    format!("Generate an image of: {}", step)
}

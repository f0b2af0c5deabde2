//! Linear recipe workflow.
//!
//! The workflow is a fixed chain of stages. Each stage receives the state
//! produced by the previous one, fills in its own field and hands it on:
//!
//! ```text
//! generate_recipe -> generate_images -> get_nutrition
//! ```
//!
//! The first failing stage aborts the run.

use crate::error::ChefError;
use crate::model::{Nutrition, Recipe, RecipeState, StepImage};
use crate::prompts::{nutrition_prompt, recipe_prompt, step_image_prompt};
use crate::providers::LlmProvider;
use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;

/// One node of the workflow
#[async_trait]
pub trait Stage: Send + Sync {
    /// Unique identifier for this stage (e.g., "generate_recipe")
    fn name(&self) -> &'static str;

    /// Execute the stage, returning the updated state
    async fn run(&self, state: RecipeState) -> Result<RecipeState, ChefError>;
}

/// Asks the model for a recipe using the state's ingredients
pub struct GenerateRecipe {
    provider: Arc<dyn LlmProvider>,
}

impl GenerateRecipe {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        GenerateRecipe { provider }
    }
}

#[async_trait]
impl Stage for GenerateRecipe {
    fn name(&self) -> &'static str {
        "generate_recipe"
    }

    async fn run(&self, mut state: RecipeState) -> Result<RecipeState, ChefError> {
        let answer = self
            .provider
            .generate_text(&recipe_prompt(&state.ingredients))
            .await?;
        let recipe = Recipe::from_model_output(&answer)?;
        info!(
            "Generated '{}' with {} steps",
            recipe.title,
            recipe.instructions.len()
        );

        state.recipe = Some(recipe);
        Ok(state)
    }
}

/// Generates one illustration per instruction, sequentially
pub struct GenerateImages {
    provider: Arc<dyn LlmProvider>,
}

impl GenerateImages {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        GenerateImages { provider }
    }
}

#[async_trait]
impl Stage for GenerateImages {
    fn name(&self) -> &'static str {
        "generate_images"
    }

    async fn run(&self, mut state: RecipeState) -> Result<RecipeState, ChefError> {
        let recipe = state.recipe.as_ref().ok_or(ChefError::MissingStageInput {
            stage: self.name(),
            input: "recipe",
        })?;

        let mut step_images = Vec::with_capacity(recipe.instructions.len());
        for (i, step) in recipe.instructions.iter().enumerate() {
            debug!("Generating image {}/{}", i + 1, recipe.instructions.len());
            let image = self.provider.generate_image(&step_image_prompt(step)).await?;
            step_images.push(StepImage {
                step: step.clone(),
                image,
            });
        }

        state.step_images = step_images;
        Ok(state)
    }
}

/// Asks the model for a macro-nutrient estimate of the recipe
pub struct GetNutrition {
    provider: Arc<dyn LlmProvider>,
}

impl GetNutrition {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        GetNutrition { provider }
    }
}

#[async_trait]
impl Stage for GetNutrition {
    fn name(&self) -> &'static str {
        "get_nutrition"
    }

    async fn run(&self, mut state: RecipeState) -> Result<RecipeState, ChefError> {
        let recipe = state.recipe.as_ref().ok_or(ChefError::MissingStageInput {
            stage: self.name(),
            input: "recipe",
        })?;

        let answer = self
            .provider
            .generate_text(&nutrition_prompt(recipe))
            .await?;
        state.nutrition = Some(Nutrition::from_model_output(&answer)?);
        Ok(state)
    }
}

/// Ordered chain of stages
pub struct Workflow {
    stages: Vec<Box<dyn Stage>>,
}

impl Workflow {
    /// An empty workflow; add stages with [`Workflow::then`]
    pub fn new() -> Self {
        Workflow { stages: Vec::new() }
    }

    /// Append a stage to the end of the chain
    pub fn then(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// The standard chain: recipe, step images (optional), nutrition
    pub fn standard(provider: Arc<dyn LlmProvider>, include_images: bool) -> Self {
        let mut workflow = Workflow::new().then(GenerateRecipe::new(provider.clone()));
        if include_images {
            workflow = workflow.then(GenerateImages::new(provider.clone()));
        }
        workflow.then(GetNutrition::new(provider))
    }

    /// Names of the stages in execution order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage in order, starting from `ingredients`
    pub async fn invoke(&self, ingredients: Vec<String>) -> Result<RecipeState, ChefError> {
        if ingredients.is_empty() {
            return Err(ChefError::NoIngredients);
        }

        let mut state = RecipeState::new(ingredients);
        for stage in &self.stages {
            info!("Running stage {}", stage.name());
            let started = Instant::now();
            state = stage.run(state).await?;
            debug!("Stage {} finished in {:?}", stage.name(), started.elapsed());
        }

        Ok(state)
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use log::{error, info};

use pantry_chef::config::load_config;
use pantry_chef::present::{render_nutrition, render_recipe, save_step_images, write_narration};
use pantry_chef::{PantryChef, ProviderKind};

#[derive(Parser)]
#[command(name = "pantry-chef")]
#[command(about = "Generate an illustrated recipe from ingredients or a pantry photo", long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["ingredients", "photo"])))]
struct Cli {
    /// Ingredients to cook with
    ingredients: Vec<String>,

    /// Photo of a pantry; ingredients are detected from it
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Provider to use (google, openai, anthropic)
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// Model name for the provider
    #[arg(long)]
    model: Option<String>,

    /// API key for the provider
    #[arg(long, env = "PANTRY_CHEF_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Skip generating an image for each step
    #[arg(long)]
    no_images: bool,

    /// Directory to write step images to
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Write a narration script of the recipe to this file
    #[arg(long)]
    narration: Option<PathBuf>,

    /// Print the whole result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    let image_dir = cli
        .image_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.images.output_dir));

    let mut builder = match &cli.photo {
        Some(photo) => PantryChef::builder().pantry_photo(photo),
        None => PantryChef::builder().ingredients(cli.ingredients.clone()),
    }
    .config(config);
    if let Some(provider) = cli.provider {
        builder = builder.provider(provider);
    }
    if let Some(model) = &cli.model {
        builder = builder.model(model);
    }
    if let Some(api_key) = &cli.api_key {
        builder = builder.api_key(api_key);
    }
    if cli.no_images {
        builder = builder.without_images();
    }

    let state = match builder.build().await {
        Ok(state) => state,
        Err(e) => {
            error!("Recipe generation failed: {}", e);
            return Err(e.into());
        }
    };

    if let (Some(recipe), Some(path)) = (&state.recipe, &cli.narration) {
        write_narration(recipe, path).await?;
    }

    let image_paths = if state.step_images.is_empty() {
        Vec::new()
    } else {
        save_step_images(&state.step_images, &image_dir).await?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    if let Some(recipe) = &state.recipe {
        println!("\n{}", render_recipe(recipe));
    }
    if let Some(nutrition) = &state.nutrition {
        println!("Nutrition (whole recipe):\n{}", render_nutrition(nutrition));
    }
    if !image_paths.is_empty() {
        println!("Step images:");
        for (step_image, path) in state.step_images.iter().zip(&image_paths) {
            println!("  {} -> {}", path.display(), step_image.step);
        }
    }

    info!("Done");
    Ok(())
}

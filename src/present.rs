//! Local presentation of a finished run: text rendering, step image files
//! and a narration script.

use crate::model::{Nutrition, Recipe, StepImage};
use log::info;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Human-readable recipe
pub fn render_recipe(recipe: &Recipe) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", recipe.title);
    let _ = writeln!(out, "{}", "=".repeat(recipe.title.chars().count()));
    let _ = writeln!(out, "Cooking time: {}\n", recipe.cooking_time);

    let _ = writeln!(out, "Ingredients:");
    for ingredient in &recipe.ingredients {
        let _ = writeln!(out, "  - {}", ingredient);
    }

    let _ = writeln!(out, "\nInstructions:");
    for (i, step) in recipe.instructions.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, step);
    }

    if !recipe.tip.trim().is_empty() {
        let _ = writeln!(out, "\nTip: {}", recipe.tip.trim());
    }

    out
}

/// Human-readable nutrition estimate
pub fn render_nutrition(nutrition: &Nutrition) -> String {
    format!(
        "Protein:       {:>7.1} g\nFat:           {:>7.1} g\nCarbohydrates: {:>7.1} g\nCalories:      {:>7.0} kcal\n",
        nutrition.protein, nutrition.fat, nutrition.carbohydrates, nutrition.calories
    )
}

/// Write step images to `dir` as `step-01.png`, `step-02.png`, ...
///
/// The directory is created if missing. Returns the written paths in step
/// order.
pub async fn save_step_images(
    step_images: &[StepImage],
    dir: &Path,
) -> Result<Vec<PathBuf>, std::io::Error> {
    fs::create_dir_all(dir).await?;

    let mut paths = Vec::with_capacity(step_images.len());
    for (i, step_image) in step_images.iter().enumerate() {
        let path = dir.join(format!(
            "step-{:02}.{}",
            i + 1,
            step_image.image.extension()
        ));
        fs::write(&path, &step_image.image.data).await?;
        paths.push(path);
    }

    info!("Saved {} step images to {}", paths.len(), dir.display());
    Ok(paths)
}

/// Write the recipe's narration script to `path`
pub async fn write_narration(recipe: &Recipe, path: &Path) -> Result<(), std::io::Error> {
    fs::write(path, recipe.narration_text()).await?;
    info!("Wrote narration script to {}", path.display());
    Ok(())
}

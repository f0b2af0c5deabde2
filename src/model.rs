use crate::error::ChefError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::error;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Recipe record produced by the text-generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub cooking_time: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub tip: String,
}

impl Recipe {
    /// Parse the model's answer into a recipe.
    ///
    /// The answer may wrap the JSON object in a code fence or prose. All five
    /// keys are required and at least one non-empty instruction must remain.
    pub fn from_model_output(text: &str) -> Result<Self, ChefError> {
        let json = extract_json_object(text)?;
        let mut recipe: Recipe = serde_json::from_str(json).map_err(|e| {
            error!("Failed to parse recipe JSON: {}", e);
            ChefError::InvalidModelOutput(format!("recipe: {}", e))
        })?;

        recipe.instructions = recipe
            .instructions
            .into_iter()
            .map(|step| step.trim().to_string())
            .filter(|step| !step.is_empty())
            .collect();

        if recipe.instructions.is_empty() {
            error!("Recipe '{}' has no instructions", recipe.title);
            return Err(ChefError::InvalidModelOutput(
                "recipe has no instructions".to_string(),
            ));
        }

        Ok(recipe)
    }

    /// The recipe as plain sentences, suitable for reading aloud
    pub fn narration_text(&self) -> String {
        let mut text = format!("{}. Cooking time: {}.\n\n", self.title, self.cooking_time);

        if !self.ingredients.is_empty() {
            text.push_str("You will need: ");
            text.push_str(&self.ingredients.join(", "));
            text.push_str(".\n\n");
        }

        for (i, step) in self.instructions.iter().enumerate() {
            text.push_str(&format!("Step {}. {}\n", i + 1, step));
        }

        if !self.tip.trim().is_empty() {
            text.push_str(&format!("\nTip: {}\n", self.tip.trim()));
        }

        text
    }
}

/// Macro-nutrient estimate for a whole recipe (grams, calories in kcal)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub protein: f64,
    pub fat: f64,
    pub carbohydrates: f64,
    pub calories: f64,
}

impl Nutrition {
    /// Parse the model's answer into a nutrition record.
    ///
    /// Values may be plain numbers or strings with a unit such as `"12 g"`.
    pub fn from_model_output(text: &str) -> Result<Self, ChefError> {
        let json = extract_json_object(text)?;
        let value: Value = serde_json::from_str(json).map_err(|e| {
            error!("Failed to parse nutrition JSON: {}", e);
            ChefError::InvalidModelOutput(format!("nutrition: {}", e))
        })?;

        Ok(Nutrition {
            protein: nutrient(&value, "protein")?,
            fat: nutrient(&value, "fat")?,
            carbohydrates: nutrient(&value, "carbohydrates")?,
            calories: nutrient(&value, "calories")?,
        })
    }
}

fn nutrient(value: &Value, key: &str) -> Result<f64, ChefError> {
    let amount = match &value[key] {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        _ => None,
    }
    .ok_or_else(|| {
        error!("Nutrition field '{}' is missing or not numeric", key);
        ChefError::InvalidModelOutput(format!("nutrition: '{}' missing or not numeric", key))
    })?;

    if amount < 0.0 {
        return Err(ChefError::InvalidModelOutput(format!(
            "nutrition: '{}' is negative",
            key
        )));
    }

    Ok(amount)
}

/// Numeric prefix of strings like "12.5 g" or "-3kcal"
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse().ok()
}

/// Slice out the JSON object in a model answer: first `{` through last `}`.
///
/// This drops code fences and any prose the model put around the object.
pub fn extract_json_object(text: &str) -> Result<&str, ChefError> {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => {
            error!("Model output contains no JSON object: {:?}", text);
            Err(ChefError::InvalidModelOutput(
                "no JSON object in model output".to_string(),
            ))
        }
    }
}

/// Raster image returned by an image-generation call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedImage {
    pub mime_type: String,
    #[serde(serialize_with = "as_base64")]
    pub data: Vec<u8>,
}

impl GeneratedImage {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        GeneratedImage {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Decode an image delivered as base64 by a provider
    pub fn from_base64(mime_type: impl Into<String>, encoded: &str) -> Result<Self, base64::DecodeError> {
        Ok(Self::new(mime_type, STANDARD.decode(encoded.trim())?))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// File extension matching the MIME type
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

fn as_base64<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(data))
}

/// One instruction together with its illustration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepImage {
    pub step: String,
    pub image: GeneratedImage,
}

/// State handed from one workflow stage to the next
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecipeState {
    pub ingredients: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Recipe>,
    pub step_images: Vec<StepImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
}

impl RecipeState {
    pub fn new(ingredients: Vec<String>) -> Self {
        RecipeState {
            ingredients,
            ..Default::default()
        }
    }
}

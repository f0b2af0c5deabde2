use crate::error::ChefError;
use crate::ingredients::parse_detected_ingredients;
use crate::model::GeneratedImage;
use crate::prompts::DETECT_INGREDIENTS_PROMPT;
use crate::providers::LlmProvider;
use log::{debug, info};
use std::path::Path;
use tokio::fs;

/// Detects the ingredients visible in a pantry photo
///
/// # Arguments
/// * `provider` - Provider with vision support
/// * `image_path` - Path to a JPEG, PNG, WebP or GIF file
///
/// # Returns
/// One raw ingredient name per line of the model's answer
///
/// # Errors
/// Returns an error if:
/// - The file extension is not a supported image type
/// - The image file cannot be read
/// - The vision request fails
pub async fn detect_ingredients(
    provider: &dyn LlmProvider,
    image_path: &Path,
) -> Result<Vec<String>, ChefError> {
    let mime_type = mime_type_for(image_path)?;
    let data = fs::read(image_path).await?;
    info!(
        "Detecting ingredients in {} ({} bytes)",
        image_path.display(),
        data.len()
    );

    let image = GeneratedImage::new(mime_type, data);
    let answer = provider
        .describe_image(DETECT_INGREDIENTS_PROMPT, &image)
        .await?;
    debug!("Vision answer: {:?}", answer);

    Ok(parse_detected_ingredients(&answer))
}

fn mime_type_for(path: &Path) -> Result<&'static str, ChefError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => Ok("image/jpeg"),
        Some("png") => Ok("image/png"),
        Some("webp") => Ok("image/webp"),
        Some("gif") => Ok("image/gif"),
        _ => Err(ChefError::BuilderError(format!(
            "Unsupported image type: {}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::scripted::ScriptedProvider;
    use std::io::Write;

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for(Path::new("pantry.JPG")).unwrap(), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("a/b.png")).unwrap(), "image/png");
        assert!(mime_type_for(Path::new("notes.txt")).is_err());
        assert!(mime_type_for(Path::new("no_extension")).is_err());
    }

    #[tokio::test]
    async fn test_detect_ingredients_from_file() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(b"not really a jpeg").unwrap();

        let provider = ScriptedProvider::named("vision").text("- Tomato\n- Capsicum\n\n- Garlic");
        let detected = detect_ingredients(&provider, file.path()).await.unwrap();

        assert_eq!(detected, vec!["Tomato", "Capsicum", "Garlic"]);
        assert!(provider.prompts()[0].starts_with("What ingredients do you see"));
    }

    #[tokio::test]
    async fn test_detect_ingredients_missing_file() {
        let provider = ScriptedProvider::named("vision");
        let err = detect_ingredients(&provider, Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChefError::Io(_)));
    }
}

use mockito::{Matcher, Server};
use pantry_chef::config::ProviderConfig;
use pantry_chef::providers::{LlmProvider, OpenAIProvider};
use pantry_chef::{ChefError, PantryChef};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

fn chat_answer(content: &str) -> String {
    serde_json::json!({
        "choices": [{ "message": { "content": content } }]
    })
    .to_string()
}

#[tokio::test]
async fn test_photo_ingredients_are_detected_and_normalized() {
    let mut server = Server::new_async().await;

    let mut photo = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    photo.write_all(b"hello").unwrap();

    let vision_mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex(r"data:image/png;base64,aGVsbG8=".to_string()))
        .with_status(200)
        .with_body(chat_answer(
            "Ingredients I can see:\n- Cherry tomato\n- Bellpepper\n- Eggs (6)\n",
        ))
        .expect(1)
        .create_async()
        .await;

    let recipe_mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex(
            "Ingredients: tomato, bell pepper, eggs".to_string(),
        ))
        .with_status(200)
        .with_body(chat_answer(
            r#"{"title": "Pepper Frittata", "cooking_time": "20 minutes",
                "ingredients": ["6 eggs", "1 bell pepper", "2 tomatoes"],
                "instructions": ["Whisk the eggs.", "Bake with the vegetables."],
                "tip": "Use a cast iron pan."}"#,
        ))
        .expect(1)
        .create_async()
        .await;

    let nutrition_mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex("Recipe: Pepper Frittata".to_string()))
        .with_status(200)
        .with_body(chat_answer(
            r#"{"protein": 40, "fat": 30, "carbohydrates": 12, "calories": 480}"#,
        ))
        .expect(1)
        .create_async()
        .await;

    let mut config = ProviderConfig::new("gpt-4o-mini");
    config.api_key = Some("fake_api_key".to_string());
    config.base_url = Some(server.url());
    let provider: Arc<dyn LlmProvider> =
        Arc::new(OpenAIProvider::new(&config, Duration::from_secs(5)).unwrap());

    let state = PantryChef::builder()
        .pantry_photo(photo.path())
        .without_images()
        .build_with_provider(provider)
        .await
        .unwrap();

    assert_eq!(state.ingredients, vec!["tomato", "bell pepper", "eggs"]);
    assert_eq!(state.recipe.unwrap().title, "Pepper Frittata");
    assert_eq!(state.nutrition.unwrap().fat, 30.0);

    vision_mock.assert_async().await;
    recipe_mock.assert_async().await;
    nutrition_mock.assert_async().await;
}

#[tokio::test]
async fn test_photo_with_unsupported_extension() {
    let photo = tempfile::Builder::new().suffix(".bmp").tempfile().unwrap();

    let mut config = ProviderConfig::new("gpt-4o-mini");
    config.api_key = Some("fake_api_key".to_string());
    let provider: Arc<dyn LlmProvider> =
        Arc::new(OpenAIProvider::new(&config, Duration::from_secs(5)).unwrap());

    let err = PantryChef::builder()
        .pantry_photo(photo.path())
        .build_with_provider(provider)
        .await
        .unwrap_err();

    assert!(matches!(err, ChefError::BuilderError(_)));
    assert!(err.to_string().contains("Unsupported image type"));
}

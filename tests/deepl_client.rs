use anyhow::Result;
use mockito::Matcher;
use oxide_translator::translate::{DeeplTranslator, TranslateError, Translator};
use serde_json::json;

const KEY: &str = "test-key:fx";

fn translator(server: &mockito::ServerGuard) -> DeeplTranslator {
    DeeplTranslator::with_base_url(KEY.to_string(), server.url())
}

#[tokio::test]
async fn test_translate_sends_text_and_target() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v2/translate")
        .match_header("authorization", "DeepL-Auth-Key test-key:fx")
        .match_body(Matcher::Json(json!({
            "text": ["Hallo Welt"],
            "target_lang": "EN-US"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"translations":[{"detected_source_language":"DE","text":"Hello world"}]}"#)
        .create_async()
        .await;

    let translation = translator(&server).translate("Hallo Welt", "EN-US").await?;

    assert_eq!(translation.text, "Hello world");
    assert_eq!(translation.detected_source_language.as_deref(), Some("DE"));
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_translate_without_result_is_an_error() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v2/translate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"translations":[]}"#)
        .create_async()
        .await;

    let result = translator(&server).translate("Hallo", "DE").await;
    assert!(matches!(result, Err(TranslateError::EmptyResult)));
    Ok(())
}

#[tokio::test]
async fn test_target_languages_are_listed() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/languages")
        .match_query(Matcher::UrlEncoded("type".into(), "target".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"language":"DE","name":"German","supports_formality":true},
                {"language":"EN-US","name":"English (American)","supports_formality":false}
            ]"#,
        )
        .create_async()
        .await;

    let languages = translator(&server).target_languages().await?;

    assert_eq!(languages.len(), 2);
    assert_eq!(languages[0].code, "DE");
    assert!(languages[0].supports_formality);
    assert_eq!(languages[1].name, "English (American)");
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_usage_is_reported() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/usage")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"character_count":180118,"character_limit":1250000}"#)
        .create_async()
        .await;

    let usage = translator(&server).usage().await?;

    assert_eq!(usage.character_count, 180_118);
    assert_eq!(usage.character_limit, 1_250_000);
    assert_eq!(usage.remaining(), 1_069_882);
    Ok(())
}

#[tokio::test]
async fn test_quota_exceeded_is_mapped() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v2/translate")
        .with_status(456)
        .with_body(r#"{"message":"Quota exceeded"}"#)
        .create_async()
        .await;

    let result = translator(&server).translate("Hallo", "DE").await;
    match result {
        Err(TranslateError::QuotaExceeded(message)) => assert_eq!(message, "Quota exceeded"),
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_wrong_key_is_an_authorization_error() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/usage")
        .with_status(403)
        .with_body(r#"{"message":"Wrong endpoint. Use https://api.deepl.com"}"#)
        .create_async()
        .await;

    let err = translator(&server)
        .usage()
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("expected an error"))?;

    assert_eq!(
        err.to_string(),
        "Authorization failed: Wrong endpoint. Use https://api.deepl.com"
    );
    Ok(())
}

#[tokio::test]
async fn test_unreachable_host_is_a_network_error() {
    let translator =
        DeeplTranslator::with_base_url(KEY.to_string(), "http://127.0.0.1:1".to_string());

    let result = translator.usage().await;
    assert!(matches!(result, Err(TranslateError::Network(_))));
}

#[tokio::test]
async fn test_malformed_body_is_a_json_error() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/usage")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not json")
        .create_async()
        .await;

    let result = translator(&server).usage().await;
    assert!(matches!(result, Err(TranslateError::Json(_))));
    Ok(())
}

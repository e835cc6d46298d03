/*!
 * Tests for the remote call gateway
 */

use fjalor::errors::{ProviderError, TranslationError};
use fjalor::providers::mock::{MockProvider, MockReply};
use fjalor::translation::gateway::{DetectionOutcome, FallbackCause};
use fjalor::translation::TranslationGateway;

use crate::common;

fn gateway(provider: MockProvider) -> TranslationGateway<MockProvider> {
    common::init_logging();
    TranslationGateway::new(provider, "Fjalor")
}

/// Test that a translation call carries the settings and the profile
#[test]
fn test_translate_single_language_shouldBuildCallFromSettings() {
    let provider = MockProvider::scripted(vec![MockReply::text("Mirëmëngjes")]);
    let gateway = gateway(provider.clone());
    let settings = common::configured_settings();

    let translation = tokio_test::block_on(gateway.translate_single_language(
        "Good morning",
        "en",
        "sq",
        "Be formal.",
        &settings,
    ))
    .unwrap();
    assert_eq!(translation, "Mirëmëngjes");

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.endpoint, settings.api_link);
    assert_eq!(call.api_key, "test-key");
    assert_eq!(call.title, "Fjalor Translator");
    assert_eq!(call.body.model, settings.ai_model);
    assert_eq!(call.body.temperature, Some(0.3));
    assert_eq!(call.body.max_tokens, Some(1000));
    assert_eq!(call.body.messages.len(), 1);

    let prompt = call.body.user_prompt().unwrap();
    assert!(prompt.starts_with("Be formal.\n\n"));
    assert!(prompt.contains("from en to sq"));
    assert!(prompt.contains("Text to translate: \"Good morning\""));
}

/// Test each configuration precondition in order
#[test]
fn test_translate_single_language_withIncompleteSettings_shouldNotCallApi() {
    let provider = MockProvider::working();
    let gateway = gateway(provider.clone());

    let mut settings = common::configured_settings();
    settings.api_link.clear();
    let error = tokio_test::block_on(gateway.translate_single_language("Hi", "en", "sq", "", &settings))
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "API link is required. Please configure it in settings."
    );

    let mut settings = common::configured_settings();
    settings.ai_model.clear();
    let error = tokio_test::block_on(gateway.translate_single_language("Hi", "en", "sq", "", &settings))
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "AI model is required. Please configure it in settings."
    );

    let error = tokio_test::block_on(gateway.translate_single_language(
        "   ",
        "en",
        "sq",
        "",
        &common::configured_settings(),
    ))
    .unwrap_err();
    assert_eq!(error.to_string(), "Text to translate cannot be empty");

    assert_eq!(provider.call_count(), 0);
}

/// Test failure classification for translation calls
#[test]
fn test_translate_single_language_failures_shouldBeClassified() {
    let settings = common::configured_settings();

    let gateway_down = gateway(MockProvider::failing());
    let error = tokio_test::block_on(gateway_down.translate_single_language("Hi", "en", "sq", "", &settings))
        .unwrap_err();
    assert_eq!(error.to_string(), "Network error: Could not reach the translation API");

    let no_choices = gateway(MockProvider::scripted(vec![MockReply::NoChoices]));
    let error = tokio_test::block_on(no_choices.translate_single_language("Hi", "en", "sq", "", &settings))
        .unwrap_err();
    assert!(matches!(
        error,
        TranslationError::Provider(ProviderError::ParseError(_))
    ));

    let rate_limited = gateway(MockProvider::scripted(vec![MockReply::api_error(
        429,
        "Rate limit exceeded",
    )]));
    let error = tokio_test::block_on(rate_limited.translate_single_language("Hi", "en", "sq", "", &settings))
        .unwrap_err();
    assert_eq!(error.to_string(), "API Error (429): Rate limit exceeded");
}

/// Test that detection lists the candidates in its prompt
#[test]
fn test_detect_language_shouldListCandidatesInPrompt() {
    let provider = MockProvider::scripted(vec![MockReply::text(" es \n")]);
    let gateway = gateway(provider.clone());
    let candidates = vec!["en".to_string(), "sq".to_string(), "es".to_string()];

    let outcome = tokio_test::block_on(gateway.detect_language(
        "Buenos días",
        &candidates,
        "English, Albanian, Spanish",
        "en, sq, es",
        &common::configured_settings(),
    ));
    assert_eq!(outcome, DetectionOutcome::Detected("es".to_string()));

    let call = &provider.calls()[0];
    assert_eq!(call.body.temperature, Some(0.1));
    let prompt = call.body.user_prompt().unwrap();
    assert!(prompt.contains("from these options: English, Albanian, Spanish."));
    assert!(prompt.contains("Respond with only the language code: en, sq, es."));
}

/// Test fallback when there is nothing to detect from
#[test]
fn test_detect_language_withBlankTextOrNoCandidates_shouldFallBack() {
    let provider = MockProvider::working();
    let gateway = gateway(provider.clone());
    let settings = common::configured_settings();
    let candidates = vec!["en".to_string()];

    let outcome = tokio_test::block_on(gateway.detect_language("  ", &candidates, "English", "en", &settings));
    assert_eq!(
        outcome,
        DetectionOutcome::FellBack {
            language: "en".to_string(),
            cause: FallbackCause::EmptyText,
        }
    );
    assert_eq!(provider.call_count(), 0);

    let outcome = tokio_test::block_on(gateway.detect_language("Hola", &[], "", "", &settings));
    assert!(outcome.is_fallback());
    assert_eq!(outcome.language(), "");
}

/// Test example generation preconditions and empty replies
#[test]
fn test_generate_examples_withBadInput_shouldFail() {
    let settings = common::configured_settings();
    let gateway = gateway(MockProvider::scripted(vec![MockReply::text("   ")]));

    let error = tokio_test::block_on(gateway.generate_examples("", "en", "sq", None, "Expert", &settings))
        .unwrap_err();
    assert_eq!(error.to_string(), "Original text is required");

    let mut incomplete = settings.clone();
    incomplete.api_key.clear();
    let error = tokio_test::block_on(gateway.generate_examples("Hi", "en", "sq", None, "Expert", &incomplete))
        .unwrap_err();
    assert_eq!(error.to_string(), "API configuration is incomplete");

    let error = tokio_test::block_on(gateway.generate_examples("Hi", "en", "", None, "Expert", &settings))
        .unwrap_err();
    assert!(matches!(error, TranslationError::NoTargetLanguages));

    let error = tokio_test::block_on(gateway.generate_examples("Hi", "en", "sq", None, "Expert", &settings))
        .unwrap_err();
    assert_eq!(error.to_string(), "Empty example generation response");
}

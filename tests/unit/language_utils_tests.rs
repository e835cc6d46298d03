/*!
 * Tests for language utility functions
 */

use fjalor::language_utils::{
    SUPPORTED_LANGUAGES, get_language_name, is_language_supported, language_codes,
    language_display_name, language_names, language_options,
};

/// Test ISO names for two- and three-letter codes
#[test]
fn test_get_language_name_withValidCodes_shouldReturnIsoName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("SQ").unwrap(), "Albanian");
    assert_eq!(get_language_name(" deu ").unwrap(), "German");
}

/// Test that malformed codes are rejected
#[test]
fn test_get_language_name_withInvalidCodes_shouldFail() {
    assert!(get_language_name("").is_err());
    assert!(get_language_name("x").is_err());
    assert!(get_language_name("qqq").is_err());
}

/// Test the display name lookup order
#[test]
fn test_language_display_name_shouldPreferTableThenIsoThenCode() {
    assert_eq!(language_display_name("es"), "Spanish");
    assert_eq!(language_display_name("sv"), "Swedish");
    assert_eq!(language_display_name("klingon"), "klingon");
}

/// Test that the picker helpers agree with the supported table
#[test]
fn test_language_options_shouldFollowSupportedOrder() {
    let options = language_options();
    let codes = language_codes();
    let names = language_names();

    assert_eq!(options.len(), SUPPORTED_LANGUAGES.len());
    for (index, option) in options.iter().enumerate() {
        assert_eq!(option.value, codes[index]);
        assert_eq!(option.label, names[index]);
    }
    assert_eq!(&codes[..3], &["en", "sq", "es"]);
}

/// Test membership checks
#[test]
fn test_is_language_supported_shouldOnlyAcceptTableCodes() {
    assert!(is_language_supported("en"));
    assert!(is_language_supported("nl"));
    assert!(!is_language_supported("EN"));
    assert!(!is_language_supported("sv"));
}

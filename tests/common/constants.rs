//! Shared constants for end-to-end tests
//!
//! When the canned provider answers change, update only this file.

// ============================================================================
// Credentials
// ============================================================================

/// The only key the mock provider accepts
pub const TEST_API_KEY: &str = "test-key-123";

/// Environment variable the tests point the client at. Never set.
pub const UNSET_KEY_ENV: &str = "CHROMAVISAGE_E2E_UNSET_KEY";

// ============================================================================
// Models
// ============================================================================

pub const GEMINI_TEST_MODEL: &str = "gemini-test";

pub const OPENAI_TEST_MODEL: &str = "gpt-test";

// ============================================================================
// Images
// ============================================================================

/// Start of a JFIF file, enough for type sniffing
pub const JPEG_BYTES: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01,
];

/// Start of a GIF file, a type the analysis does not accept
pub const GIF_BYTES: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00";

// ============================================================================
// Model answers
// ============================================================================

/// A valid analysis of a True Spring subject
pub const TRUE_SPRING_ANSWER: &str = r#"{
    "seasonId": "TRUE_SPRING",
    "confidence": 0.91,
    "reasoning": "Clear warm skin with golden undertones and bright eyes.",
    "skinAnalysis": {"hue": "Warm", "value": "Medium", "chroma": "Clear"},
    "hairDiagnosis": {
        "naturalLevel": 7,
        "undertone": "Yellow-Orange",
        "recommendedFormula": "Golden Copper Blonde",
        "technicalCode": "8.34",
        "developerVol": "20 Vol",
        "explanation": "Golden copper reflects echo the warmth of the skin."
    }
}"#;

/// Well formed JSON naming a season outside the 12
pub const UNKNOWN_SEASON_ANSWER: &str = r#"{
    "seasonId": "MIDNIGHT_WINTER",
    "confidence": 0.5,
    "reasoning": "n/a",
    "skinAnalysis": {"hue": "Cool", "value": "Dark", "chroma": "Clear"},
    "hairDiagnosis": {
        "naturalLevel": 3,
        "undertone": "Red",
        "recommendedFormula": "Blue Black",
        "technicalCode": "2.1",
        "developerVol": "10 Vol",
        "explanation": "n/a"
    }
}"#;

// ============================================================================
// Server Configuration
// ============================================================================

/// Timeout for the mock server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Polling interval when waiting for the mock server (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

pub mod gemini;

pub use gemini::GeminiClient;

/// Environment variable holding the backend API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub fn get_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
}

use std::fmt;
use std::str::FromStr;

use super::error::ProviderError;

/// Function class a provider may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Text to vector.
    Embedding,
    /// Text to structured judgment.
    Reasoning,
}

impl Capability {
    /// Lowercase name, as used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Embedding => "embedding",
            Capability::Reasoning => "reasoning",
        }
    }

    /// Uppercase name, as used in model configuration keys.
    pub fn key_part(&self) -> &'static str {
        match self {
            Capability::Embedding => "EMBEDDING",
            Capability::Reasoning => "REASONING",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backends able to turn text into vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbeddingProvider {
    Gemini,
    OpenAi,
}

impl EmbeddingProvider {
    pub const ALL: [EmbeddingProvider; 2] = [EmbeddingProvider::Gemini, EmbeddingProvider::OpenAi];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingProvider::Gemini => "gemini",
            EmbeddingProvider::OpenAi => "openai",
        }
    }
}

impl fmt::Display for EmbeddingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbeddingProvider {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(EmbeddingProvider::Gemini),
            "openai" => Ok(EmbeddingProvider::OpenAi),
            _ => Err(ProviderError::UnsupportedProvider {
                capability: Capability::Embedding,
                name: s.to_string(),
            }),
        }
    }
}

/// Backends able to judge question quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasoningProvider {
    Gemini,
    OpenAi,
    DeepSeek,
}

impl ReasoningProvider {
    pub const ALL: [ReasoningProvider; 3] = [
        ReasoningProvider::Gemini,
        ReasoningProvider::OpenAi,
        ReasoningProvider::DeepSeek,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningProvider::Gemini => "gemini",
            ReasoningProvider::OpenAi => "openai",
            ReasoningProvider::DeepSeek => "deepseek",
        }
    }
}

impl fmt::Display for ReasoningProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReasoningProvider {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ReasoningProvider::Gemini),
            "openai" => Ok(ReasoningProvider::OpenAi),
            "deepseek" => Ok(ReasoningProvider::DeepSeek),
            _ => Err(ProviderError::UnsupportedProvider {
                capability: Capability::Reasoning,
                name: s.to_string(),
            }),
        }
    }
}

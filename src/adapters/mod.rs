pub mod llm;
pub mod openai;
pub mod groq;

pub use openai::OpenAIAdapter;
pub use groq::GroqAdapter;

mod chat_completion;
mod echo;

pub use chat_completion::{
    ChatCompletionStrategy, DEFAULT_CHAT_MODEL, DEFAULT_MAX_TOKENS, DEFAULT_MEMORY_WINDOW,
    DEFAULT_SYSTEM_MESSAGE, DEFAULT_TEMPERATURE, DEFAULT_TRANSCRIPTION_MODEL, TRANSCRIPTION_MARKER,
};
pub use echo::EchoStrategy;

mod openai_compatible_client;

pub use openai_compatible_client::{
    OpenAiCompatibleClient, SseLine, create_llm_client, parse_sse_line,
};

//! Prompt construction and answer generation

use crate::QueryError;
use clubhouse_domain::{GenerationRequest, LlmProvider, RetryPolicy};

/// Built-in system prompt
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a helpful assistant for university students looking for student clubs and organizations.

Your role is to:
1. Answer questions about student clubs based ONLY on the provided context
2. Be specific and cite your sources using [Source X] markers
3. If the context doesn't contain relevant information, say so honestly
4. Provide practical information like meeting times, dues, and membership requirements when available
5. Be concise but informative
6. If asked about fit or recommendations, consider the student's stated preferences and constraints

Only use information from the provided context. Do not make up information.";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Default completion length
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// User prompt embedding the context block and the question
pub fn user_prompt(question: &str, context: &str) -> String {
    format!(
        "Context from club documents:\n{}\n\nQuestion: {}\n\n\
         Please answer the question based on the context above. Cite your sources using [Source X] \
         format when referencing specific information. If you cannot answer based on the context, say so.",
        context, question
    )
}

/// Calls the LLM with the system and user prompts
///
/// The returned answer is passed through as-is; `[Source N]` markers in it
/// are not checked against the citations.
#[derive(Debug, Clone)]
pub struct AnswerAssembler {
    system_prompt: String,
    temperature: f32,
    max_tokens: u32,
    policy: RetryPolicy,
}

impl AnswerAssembler {
    /// Create an assembler with the default sampling parameters
    pub fn new(system_prompt: Option<String>, policy: RetryPolicy) -> Self {
        Self {
            system_prompt: system_prompt.unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            policy,
        }
    }

    /// Override sampling parameters
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// System prompt in use
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Build the request for `question` over `context`
    pub fn request(&self, question: &str, context: &str) -> GenerationRequest {
        GenerationRequest {
            system_prompt: self.system_prompt.clone(),
            user_prompt: user_prompt(question, context),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Generate an answer under the retry policy
    pub async fn answer<L: LlmProvider>(
        &self,
        llm: &L,
        question: &str,
        context: &str,
    ) -> Result<String, QueryError> {
        let request = self.request(question, context);
        self.policy
            .run("generate", || llm.generate(&request))
            .await
            .map_err(|e| {
                tracing::error!(provider = llm.name(), error = %e, "Answer generation failed");
                QueryError::Generation(e.to_string())
            })
    }
}

//! Blueprint generation agent.
//!
//! Drafts a structured LaTeX proof blueprint from a theorem statement, then
//! refines it a caller-chosen number of times and runs one formatting pass.
//! The pipeline is sequential and non-branching; each phase is a blocking
//! round trip and no phase output is validated before the next phase
//! consumes it.

use super::ChatAgent;
use crate::error::Result;
use crate::message::Content;
use crate::prompts::PromptSet;
use crate::provider::{GenerateConfig, Provider};
use std::sync::Arc;

/// Instruction sent after the refine prompt; each iteration fully replaces
/// the prior draft with the model's response.
const REFINE_INSTRUCTION: &str = "Now refine, split these lemmas / theorems, \
     and make them more detailed. Output the refined blueprint directly.";

/// Optional inputs for the original draft.
#[derive(Debug, Clone, Default)]
pub struct BlueprintOptions {
    /// PDF files to upload and reference.
    pub pdf_files: Vec<String>,
    /// Reference URLs appended to the prompt.
    pub reference_urls: Vec<String>,
    /// Free-text context or constraints.
    pub additional_context: Option<String>,
}

/// Agent specialized in generating Lean4 proof blueprints.
pub struct BlueprintAgent {
    chat: ChatAgent,
    prompts: Arc<PromptSet>,
}

impl BlueprintAgent {
    /// Create the agent over `provider`.
    pub fn new(provider: Box<dyn Provider>, prompts: Arc<PromptSet>) -> Self {
        Self {
            chat: ChatAgent::new(provider, "BlueprintGenerator", None),
            prompts,
        }
    }

    /// Access the underlying conversation.
    pub fn chat(&self) -> &ChatAgent {
        &self.chat
    }

    /// Draft the original blueprint, attaching files and reference URLs and
    /// enabling the provider's web-search tool.
    pub async fn generate_original(
        &mut self,
        statement: &str,
        opts: &BlueprintOptions,
    ) -> Result<String> {
        let mut uploaded = Vec::new();
        for pdf in &opts.pdf_files {
            self.chat.upload_file(pdf).await?;
            uploaded.push(pdf.clone());
        }

        let mut prompt = self.prompts.generate_blueprint.clone();
        prompt.push_str(&format!("\nTheorem statement:\n{}\n", statement));

        if !opts.reference_urls.is_empty() {
            prompt.push_str("\nReference URLs:");
            for url in &opts.reference_urls {
                prompt.push_str(&format!("\n- {}", url));
            }
            prompt.push('\n');
        }

        if let Some(ref context) = opts.additional_context {
            prompt.push_str(&format!("\nAdditional context:\n{}", context));
        }

        if !uploaded.is_empty() {
            prompt.push_str("\nReference files:");
            for file in &uploaded {
                prompt.push_str(&format!("\n- {}", file));
            }
            prompt.push('\n');
        }

        let config = GenerateConfig::default().with_web_search(true);
        self.chat.send_message(Content::from(prompt), &config).await
    }

    /// One refinement iteration: identify non-trivial statements, then ask
    /// for the refined blueprint. Returns the refined draft.
    pub async fn refine(&mut self) -> Result<String> {
        let config = GenerateConfig::default();
        self.chat
            .send_message(self.prompts.refine_blueprint.clone(), &config)
            .await?;
        self.chat.send_message(REFINE_INSTRUCTION, &config).await
    }

    /// Single corrective formatting pass over the current draft.
    pub async fn fix_format(&mut self) -> Result<String> {
        self.chat
            .send_message(
                self.prompts.fix_blueprint_format.clone(),
                &GenerateConfig::default(),
            )
            .await
    }

    /// Full pipeline: original draft, exactly `refine_times` refinement
    /// iterations, then the formatting fix. Returns the final text.
    pub async fn generate(
        &mut self,
        statement: &str,
        refine_times: usize,
        opts: &BlueprintOptions,
    ) -> Result<String> {
        self.generate_original(statement, opts).await?;
        for round in 0..refine_times {
            tracing::debug!(agent = self.chat.agent_id(), round, "refining blueprint");
            self.refine().await?;
        }
        self.fix_format().await
    }
}

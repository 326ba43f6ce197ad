//! Prompt templates.
//!
//! Static text blocks loaded from fixed filenames at process start. A missing
//! file degrades to an empty template with a warning rather than refusing to
//! boot.

use std::path::{Path, PathBuf};

/// Fixed template filenames, one per workflow step.
const GENERATE_BLUEPRINT_FILE: &str = "prompt_generate_blueprint.txt";
const REFINE_BLUEPRINT_FILE: &str = "prompt_identify_nontrivial.txt";
const FIX_BLUEPRINT_FORMAT_FILE: &str = "prompt_fix_blueprint_format.txt";
const CREATE_QUERY_FILE: &str = "prompt_create_leansearch_query.txt";
const IDENTIFY_RESULT_FILE: &str = "prompt_identify_leansearch_result.txt";

/// The set of prompt templates used by the agents.
///
/// Loaded once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct PromptSet {
    /// Instruction for drafting an original blueprint.
    pub generate_blueprint: String,
    /// Instruction for identifying non-trivial statements to refine.
    pub refine_blueprint: String,
    /// Instruction for the final formatting pass.
    pub fix_blueprint_format: String,
    /// Instruction for turning a user query into a search query.
    pub create_search_query: String,
    /// Instruction for analyzing search results.
    pub identify_search_result: String,
}

impl PromptSet {
    /// Load all templates from `dir`, warning on each missing file.
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            generate_blueprint: load_template(&dir.join(GENERATE_BLUEPRINT_FILE)),
            refine_blueprint: load_template(&dir.join(REFINE_BLUEPRINT_FILE)),
            fix_blueprint_format: load_template(&dir.join(FIX_BLUEPRINT_FORMAT_FILE)),
            create_search_query: load_template(&dir.join(CREATE_QUERY_FILE)),
            identify_search_result: load_template(&dir.join(IDENTIFY_RESULT_FILE)),
        }
    }
}

/// Read a template file, stripping the legacy `r"""..."""` wrapper if present.
///
/// Returns an empty string (with a warning) when the file is absent or
/// unreadable.
fn load_template(path: &PathBuf) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => normalize_template(&content),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "prompt template missing, using empty template");
            String::new()
        }
    }
}

fn normalize_template(content: &str) -> String {
    let trimmed = content.trim();
    if let Some(inner) = trimmed
        .strip_prefix("r\"\"\"")
        .and_then(|rest| rest.strip_suffix("\"\"\""))
    {
        return inner.trim().to_string();
    }
    trimmed.to_string()
}

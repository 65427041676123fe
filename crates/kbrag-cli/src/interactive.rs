//! Interactive Q&A session

use crate::commands::{ask_one, display_result};
use crate::output::OutputWriter;
use anyhow::Result;
use console::style;
use dialoguer::Input;
use kbrag_llm::{OllamaEmbedder, OllamaGenerator};
use kbrag_retrieval::pipeline::RetrievalPipeline;

/// Run an interactive question loop until the user quits
pub async fn run(
    pipeline: &RetrievalPipeline<OllamaEmbedder, OllamaGenerator>,
    top_k: usize,
    output: &OutputWriter,
    embedder_model: &str,
    generator_model: &str,
) -> Result<()> {
    println!("\n{}", style("Interactive Q&A").bold());
    println!("Ask questions about your knowledge base.");
    println!("Type 'quit', 'exit', or 'q' to stop.\n");

    loop {
        let question: String = Input::new()
            .with_prompt("Your question")
            .allow_empty(true)
            .interact_text()?;

        let trimmed = question.trim();
        if trimmed.is_empty() || matches!(trimmed.to_lowercase().as_str(), "quit" | "exit" | "q") {
            println!("\nGoodbye!");
            break;
        }

        match ask_one(pipeline, trimmed, top_k, false, embedder_model, generator_model).await {
            Ok(result) => display_result(&result, output, false)?,
            Err(e) => output.error(e),
        }
    }

    Ok(())
}

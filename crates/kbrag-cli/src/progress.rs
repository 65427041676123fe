use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Finish a progress bar with success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Progress tracker for build operations
pub struct BuildProgress {
    pub multi: MultiProgress,
    pub load: ProgressBar,
    pub chunk: ProgressBar,
    pub embeddings: ProgressBar,
    pub finalize: ProgressBar,
}

impl BuildProgress {
    pub fn new() -> Self {
        let multi = MultiProgress::new();

        let load = multi.add(create_spinner("Loading documents..."));
        let chunk = multi.add(create_spinner("Splitting into chunks..."));
        let embeddings = multi.add(create_spinner("Generating embeddings..."));
        let finalize = multi.add(create_spinner("Saving index..."));

        Self {
            multi,
            load,
            chunk,
            embeddings,
            finalize,
        }
    }

    pub fn finish_load(&self, documents: usize, words: usize) {
        finish_success(&self.load, &format!("Loaded {} documents ({} words)", documents, words));
    }

    pub fn finish_chunk(&self, chunks: usize) {
        finish_success(&self.chunk, &format!("Created {} chunks", chunks));
    }

    pub fn start_embeddings(&self, total: u64) {
        self.embeddings.set_length(total);
        self.embeddings.set_style(
            ProgressStyle::default_bar()
                .template("{msg}\n[{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
                .unwrap()
                .progress_chars("█▓▒░ "),
        );
        self.embeddings.set_message("Generating embeddings".to_string());
        self.embeddings.set_position(0);
    }

    pub fn update_embeddings(&self, current: u64) {
        self.embeddings.set_position(current);
    }

    pub fn finish_embeddings(&self, count: usize) {
        finish_success(&self.embeddings, &format!("Generated {} embeddings", count));
    }

    pub fn finish_finalize(&self, hash: &str) {
        let short = &hash[..hash.len().min(8)];
        finish_success(&self.finalize, &format!("Index saved (hash: {})", short));
    }
}

//! Progress indicator for frame extraction.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner counting processed frames.
///
/// The upstream sequence length is unknown, so this is a spinner rather
/// than a bar.
pub fn create_frame_progress(source: &str, enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] {{pos}} frames ({{per_sec}}) - {source}"
            ))
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Finish a progress indicator with a message.
pub fn finish_progress(pb: Option<ProgressBar>, message: &str) {
    if let Some(pb) = pb {
        pb.finish_with_message(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_progress_is_none() {
        assert!(create_frame_progress("frames.ndjson", false).is_none());
    }
}

use taskdeck_core::models::Task;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// One line per task for `--plain` listings: id, status, title, and a marker when
/// an image is attached.
pub fn task_line(task: &Task) -> String {
    format!(
        "{}  {:<11}  {}{}",
        task.id,
        task.status.as_str(),
        truncate_string(&task.title, 60),
        if task.image_url.is_some() { "  [image]" } else { "" }
    )
}

/// Initialize tracing for the CLI.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

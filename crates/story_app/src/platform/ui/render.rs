use story_core::{AppViewModel, Choice, ProfileRowView, StatusKind};

/// Renders the review screen as plain text lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let stats = view.stats;
    let mut header = format!(
        "Story Checker | {}/{} | YES {} NO {} Pending {} ({}%)",
        view.position, view.source_len, stats.yes, stats.no, stats.pending, stats.percent
    );
    if let Some(filter) = view.filter {
        header.push_str(&format!(" | filter: {}", filter.label()));
    }
    if view.search.active {
        header.push_str(" | search mode");
    }
    if view.loading {
        header.push_str(" | loading");
    }
    lines.push(header);

    lines.extend(view.rows.iter().map(render_row));
    if view.can_load_more {
        lines.push("  ... more profiles available (more)".to_string());
    }

    if let Some(current) = &view.current {
        lines.push(format!(
            "Current: {} [{}] {} {}",
            current.name,
            current.platform,
            current.url,
            choice_tag(current.choice)
        ));
    }
    if view.search.active && view.search.total > 0 {
        let location = view
            .search
            .location
            .map(|cell| format!(" at {cell}"))
            .unwrap_or_default();
        lines.push(format!(
            "Search \"{}\": match {} of {}{}",
            view.search.name, view.search.current, view.search.total, location
        ));
    }
    if view.completed {
        lines.push(format!(
            "All profiles checked | YES {} NO {}",
            stats.yes, stats.no
        ));
    }
    if let Some(status) = &view.status {
        let prefix = match status.kind {
            StatusKind::Info => "..",
            StatusKind::Success => "ok",
            StatusKind::Error => "!!",
        };
        lines.push(format!("{prefix} {}", status.text));
    }
    lines
}

fn render_row(row: &ProfileRowView) -> String {
    let marker = if row.active { ">" } else { " " };
    let mut flags = String::new();
    if row.skipped {
        flags.push('S');
    }
    if row.special {
        flags.push('*');
    }
    if row.preloaded {
        flags.push('~');
    }
    format!(
        "{marker}{:>3}. {:<5} {:<3} {} ({}) {}",
        row.index + 1,
        choice_tag(row.choice),
        flags,
        row.name,
        row.platform,
        row.short_url
    )
    .trim_end()
    .to_string()
}

fn choice_tag(choice: Option<Choice>) -> &'static str {
    match choice {
        Some(Choice::Yes) => "[YES]",
        Some(Choice::No) => "[NO]",
        None => "[ ]",
    }
}

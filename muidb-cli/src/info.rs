use muidb::{Summary, summary::UnknownStateEntry};

/// Renders the human-readable report printed by `muidb info`.
pub fn render_summary(summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Items: {}\n", summary.items));
    if summary.languages.is_empty() {
        out.push_str("Languages: 0\n");
    } else {
        out.push_str(&format!(
            "Languages: {} ({})\n",
            summary.languages.len(),
            summary.languages.join(", ")
        ));
    }

    out.push_str("States:\n");
    for (label, count) in summary.states.labeled() {
        out.push_str(&format!("  {}: {}\n", label, count));
    }

    for (lang, counts) in &summary.per_language {
        out.push_str(&format!("\nLanguage: {}\n", lang));
        out.push_str(&format!("  Total: {}\n", counts.total()));
        for (label, count) in counts.labeled() {
            if count > 0 {
                out.push_str(&format!("  {}: {}\n", label, count));
            }
        }
    }

    out.push_str("\nOutput files:");
    if summary.output_files.is_empty() {
        out.push_str(" none\n");
    } else {
        out.push('\n');
        for spec in &summary.output_files {
            out.push_str(&format!("  {} [{}]\n", spec.name, spec.lang));
        }
    }
    out
}

pub fn unknown_state_warning(entry: &UnknownStateEntry) -> String {
    format!(
        "Warning: item {} [{}] has unknown state '{}'",
        entry.id, entry.lang, entry.state
    )
}

pub fn print_info(summary: &Summary, json_output: bool) -> Result<(), muidb::Error> {
    for entry in &summary.unknown_states {
        eprintln!("{}", unknown_state_warning(entry));
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print!("{}", render_summary(summary));
    }
    Ok(())
}

//! Numbered pick-one-of-N prompt.

use dialoguer::Select;

/// Menu entries as shown to the user (`1. invoices.csv`).
pub fn numbered(options: &[String]) -> Vec<String> {
    options
        .iter()
        .enumerate()
        .map(|(i, option)| format!("{}. {}", i + 1, option))
        .collect()
}

/// Show `options` under `title` and return the chosen index.
///
/// Returns `Ok(None)` when there is nothing to choose from or the user
/// cancels with Esc or `q`.
pub fn choose_interactive(
    title: &str,
    prompt: &str,
    options: &[String],
) -> dialoguer::Result<Option<usize>> {
    if options.is_empty() {
        return Ok(None);
    }

    println!("\n{title}");
    Select::new()
        .with_prompt(prompt)
        .default(0)
        .items(&numbered(options))
        .interact_opt()
}

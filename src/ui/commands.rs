use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::App;
use crate::config::normalize_currency;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App),
}

/// Registers one command under each of its aliases.
macro_rules! register_command {
    ($registry:expr, [$($name:literal),+], $desc:literal, $func:expr) => {{
        $(
            $registry.insert(
                $name,
                Command {
                    description: $desc,
                    run: $func,
                },
            );
        )+
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!(r, ["q", "quit"], "Quit", cmd_quit);
    register_command!(r, ["h", "help"], "Show available commands", cmd_help);
    register_command!(r, ["n", "new"], "Create a budget", cmd_new);
    register_command!(r, ["e", "edit"], "Edit selected budget", cmd_edit);
    register_command!(r, ["del", "delete"], "Delete selected budget", cmd_delete);
    register_command!(
        r,
        ["r", "refresh"],
        "Refetch budgets and transactions",
        cmd_refresh
    );
    register_command!(
        r,
        ["currency"],
        "Set display currency (e.g. :currency EUR)",
        cmd_currency
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App) {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app);
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }
}

/// Nearest multi-letter command name, ties broken alphabetically.
fn find_closest(input: &str) -> &'static str {
    COMMANDS
        .keys()
        .copied()
        .filter(|name| name.len() > 1)
        .min_by_key(|name| (levenshtein(input, name), *name))
        .unwrap_or("help")
}

/// Edit distance over chars, one row of the table at a time.
fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = (above + 1)
                .min(row[j] + 1)
                .min(diag + usize::from(ca != cb));
            diag = above;
        }
    }

    row[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App) {
    app.running = false;
}

fn cmd_help(_args: &str, app: &mut App) {
    app.show_help = true;
}

fn cmd_new(_args: &str, app: &mut App) {
    app.open_new_form();
}

fn cmd_edit(_args: &str, app: &mut App) {
    app.open_edit_form();
}

fn cmd_delete(_args: &str, app: &mut App) {
    app.request_delete();
}

fn cmd_refresh(_args: &str, app: &mut App) {
    app.schedule_refresh();
}

fn cmd_currency(args: &str, app: &mut App) {
    if args.is_empty() {
        let current = app.currency.clone();
        app.set_status(format!("Currency: {current}"));
        return;
    }
    match normalize_currency(args) {
        Ok(code) => {
            app.set_status(format!("Currency set to {code}"));
            app.currency = code;
        }
        Err(e) => app.set_status(e.to_string()),
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod commands_tests;

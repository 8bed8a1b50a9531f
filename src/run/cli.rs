use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::api::BudgetBackend;
use crate::metrics::round_half_up;
use crate::models::{BudgetId, Category};
use crate::ui::app::App;
use crate::ui::form::parse_form;
use crate::ui::state::Phase;
use crate::ui::util::format_currency;

pub(crate) fn as_cli(
    args: &[String],
    app: &mut App,
    api: &dyn BudgetBackend,
    out: &mut impl Write,
    input: &mut impl BufRead,
) -> Result<()> {
    match args[1].as_str() {
        "list" | "ls" => cli_list(app, api, out),
        "alerts" => cli_alerts(app, api, out),
        "categories" => cli_categories(app, api, out),
        "add" => cli_add(&args[2..], app, api, out),
        "edit" => cli_edit(&args[2..], app, api, out),
        "delete" | "rm" => cli_delete(&args[2..], app, api, out, input),
        "--help" | "-h" | "help" => print_usage(out),
        "--version" | "-V" | "version" => {
            writeln!(out, "budgetview {}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
        other => {
            print_usage(out)?;
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage(out: &mut impl Write) -> Result<()> {
    writeln!(out, "budgetview - budget tracking client for a finance REST API")?;
    writeln!(out)?;
    writeln!(out, "Usage: budgetview [--api-url <url>] [--currency <ISO>] [command]")?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    writeln!(out, "  (none)                                   Launch interactive TUI")?;
    writeln!(out, "  list                                     Print budgets with spend and alerts")?;
    writeln!(out, "  alerts                                   Print budget alerts only")?;
    writeln!(out, "  categories                               List expense categories")?;
    writeln!(out, "  add <category> <month> <year> <amount>   Create a budget")?;
    writeln!(out, "  edit <id> <category> <month> <year> <amount>")?;
    writeln!(out, "                                           Replace an existing budget")?;
    writeln!(out, "  delete <id> [--yes]                      Delete a budget (asks first)")?;
    writeln!(out, "  --help, -h                               Show this help")?;
    writeln!(out, "  --version, -V                            Show version")?;
    Ok(())
}

/// Run one full fetch; a failed fetch becomes the command's error.
fn fetch(app: &mut App, api: &dyn BudgetBackend) -> Result<()> {
    app.refresh_all(api);
    if app.view.phase == Phase::Failed {
        anyhow::bail!("{}", app.view.error.clone().unwrap_or_default());
    }
    Ok(())
}

fn cli_list(app: &mut App, api: &dyn BudgetBackend, out: &mut impl Write) -> Result<()> {
    fetch(app, api)?;
    write_budgets(app, out)?;
    if !app.view.alerts.is_empty() {
        writeln!(out)?;
        write_alerts(app, out)?;
    }
    Ok(())
}

fn write_budgets(app: &App, out: &mut impl Write) -> Result<()> {
    if app.view.budgets.is_empty() {
        writeln!(out, "No budgets")?;
        return Ok(());
    }

    let currency = app.currency.as_str();
    writeln!(
        out,
        "{:<26} {:<20} {:<8} {:>12} {:>12} {:>12} {:>7}",
        "ID", "Category", "Period", "Budget", "Spent", "Remaining", "Used"
    )?;
    writeln!(out, "{}", "─".repeat(103))?;
    for (budget, row) in app.view.rows() {
        let used = match row.percent {
            Some(p) => format!("{:.1}%", round_half_up(p, 1)),
            None => "-".into(),
        };
        writeln!(
            out,
            "{:<26} {:<20} {:<8} {:>12} {:>12} {:>12} {:>7}",
            budget.id,
            budget.category,
            budget.period(),
            format_currency(budget.amount, currency),
            format_currency(row.spent, currency),
            format_currency(row.remaining, currency),
            used,
        )?;
    }
    Ok(())
}

fn write_alerts(app: &App, out: &mut impl Write) -> Result<()> {
    for alert in &app.view.alerts {
        writeln!(out, "[{}] {}", alert.severity, alert.message)?;
    }
    Ok(())
}

fn cli_alerts(app: &mut App, api: &dyn BudgetBackend, out: &mut impl Write) -> Result<()> {
    fetch(app, api)?;
    if app.view.alerts.is_empty() {
        writeln!(out, "No alerts")?;
        return Ok(());
    }
    write_alerts(app, out)
}

fn cli_categories(app: &mut App, api: &dyn BudgetBackend, out: &mut impl Write) -> Result<()> {
    fetch(app, api)?;
    if app.view.categories.is_empty() {
        writeln!(out, "No categories")?;
        return Ok(());
    }
    for category in &app.view.categories {
        writeln!(out, "{category}")?;
    }
    Ok(())
}

/// Use the backend's spelling when the name matches a known category.
fn canonical_category(app: &App, name: &str) -> String {
    Category::find_by_name(&app.view.categories, name)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| name.to_string())
}

fn cli_add(
    args: &[String],
    app: &mut App,
    api: &dyn BudgetBackend,
    out: &mut impl Write,
) -> Result<()> {
    let [category, month, year, amount] = args else {
        anyhow::bail!("Usage: budgetview add <category> <month> <year> <amount>");
    };
    fetch(app, api)?;
    let category = canonical_category(app, category);
    let form = parse_form(&category, month, year, amount).map_err(anyhow::Error::msg)?;

    if !app.save_budget(api, &form, None) {
        anyhow::bail!("{}", app.view.error.clone().unwrap_or_default());
    }
    writeln!(out, "{}", app.status_message)?;
    fetch(app, api)?;
    write_budgets(app, out)
}

fn cli_edit(
    args: &[String],
    app: &mut App,
    api: &dyn BudgetBackend,
    out: &mut impl Write,
) -> Result<()> {
    let [id, category, month, year, amount] = args else {
        anyhow::bail!("Usage: budgetview edit <id> <category> <month> <year> <amount>");
    };
    let id = BudgetId::new(id.as_str());
    fetch(app, api)?;
    if !app.view.budgets.iter().any(|b| b.id == id) {
        anyhow::bail!("Budget not found: {id}");
    }
    let category = canonical_category(app, category);
    let form = parse_form(&category, month, year, amount).map_err(anyhow::Error::msg)?;

    if !app.save_budget(api, &form, Some(&id)) {
        anyhow::bail!("{}", app.view.error.clone().unwrap_or_default());
    }
    writeln!(out, "{}", app.status_message)?;
    fetch(app, api)?;
    write_budgets(app, out)
}

fn cli_delete(
    args: &[String],
    app: &mut App,
    api: &dyn BudgetBackend,
    out: &mut impl Write,
    input: &mut impl BufRead,
) -> Result<()> {
    let assume_yes = args.iter().any(|a| a == "--yes" || a == "-y");
    let Some(id) = args.iter().find(|a| !a.starts_with('-')) else {
        anyhow::bail!("Usage: budgetview delete <id> [--yes]");
    };
    let id = BudgetId::new(id.as_str());
    fetch(app, api)?;
    let Some(label) = app
        .view
        .budgets
        .iter()
        .find(|b| b.id == id)
        .map(|b| format!("{} {}", b.category, b.period()))
    else {
        anyhow::bail!("Budget not found: {id}");
    };

    if !assume_yes {
        write!(out, "Delete budget {id}? [y/N] ")?;
        out.flush()?;
        let mut answer = String::new();
        input
            .read_line(&mut answer)
            .context("Failed to read confirmation")?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            writeln!(out, "Cancelled")?;
            return Ok(());
        }
    }

    if !app.delete_budget(api, &id) {
        anyhow::bail!("{}", app.view.error.clone().unwrap_or_default());
    }
    fetch(app, api)?;
    writeln!(out, "Deleted budget: {label}")?;
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;

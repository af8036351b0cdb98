use colored::Colorize;
use recon_core::category::Flow;
use recon_core::model::{Statement, Transaction, TransactionType};
use recon_core::summary::Summary;
use recon_core::validate::Check;

pub fn print_statement(statement: &Statement) {
    println!(
        "{}",
        format!("=== {} - {} ===", statement.provider, statement.month_range)
            .blue()
            .bold()
    );
    println!();
    print_transactions(&statement.transactions);
    println!();

    if statement.checks.is_empty() {
        println!(
            "{}",
            "  No control totals declared; statement not validated".yellow()
        );
    } else {
        print_checks(&statement.checks);
    }
}

pub fn print_transactions(transactions: &[Transaction]) {
    let width = transactions
        .iter()
        .map(|t| t.description.len())
        .max()
        .unwrap_or(10);

    for t in transactions {
        println!(
            "  {}  {:<width$}  {:>10}  {}",
            t.date.format("%d %b %Y"),
            t.description,
            t.amount.to_string(),
            t.kind,
            width = width
        );
    }
}

pub fn print_checks(checks: &[Check]) {
    for check in checks {
        println!(
            "  {} {} ({} = {})",
            "ok".green(),
            check.name,
            check.computed,
            check.declared
        );
    }
}

pub fn print_summary(summary: &Summary) {
    println!("  {} transactions", summary.count);

    for kind in TransactionType::ALL {
        let total = summary.total(kind);
        if !total.is_zero() {
            println!("  {:<14} {:>12}", kind.label(), total.to_string());
        }
    }

    if !summary.by_category.is_empty() {
        println!();
        for (category, total) in &summary.by_category {
            let line = format!("  {:<14} {:>12}", category.to_string(), total.to_string());
            match category.flow() {
                Flow::Income => println!("{}", line.green()),
                Flow::Expense => println!("{}", line.red()),
                Flow::Transfer => println!("{line}"),
            }
        }
        if !summary.uncategorised.is_zero() {
            println!(
                "  {:<14} {:>12}",
                "Other",
                summary.uncategorised.to_string()
            );
        }
    }

    println!();
    println!("  {:<14} {:>12}", "Income", summary.income().to_string());
    println!("  {:<14} {:>12}", "Outgoings", summary.outgoings().to_string());

    let net = summary.net_change();
    let line = format!("  {:<14} {:>12}", "Net change", net.to_string());
    if net.is_sign_negative() && !net.is_zero() {
        println!("{}", line.red().bold());
    } else {
        println!("{}", line.green().bold());
    }
}

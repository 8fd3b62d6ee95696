use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::application::{BenchmarkVerdict, FinanceService, PEER_BENCHMARK_CENTS};
use crate::domain::{convert, format_cents, parse_cents, Currency, UserId};

/// FinFlow - Personal Expense Tracker
#[derive(Parser)]
#[command(name = "finflow")]
#[command(about = "A local-first personal expense and savings tracker")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "finflow.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Create a new account
    Signup {
        /// Username (must be unique)
        username: String,

        /// Password
        password: String,
    },

    /// Verify credentials for an account
    Login {
        /// Username
        username: String,

        /// Password
        password: String,
    },

    /// Set up (or replace) a user's profile
    Setup {
        /// Username the profile belongs to
        #[arg(long)]
        user: String,

        /// Age in years
        #[arg(long)]
        age: i64,

        /// Occupation
        #[arg(long)]
        occupation: String,

        /// Initial bank balance (e.g., "15000.00")
        #[arg(long)]
        balance: String,
    },

    /// Expense tracking commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Savings(SavingsCommands),

    /// Emergency fund commands
    #[command(subcommand)]
    Emergency(EmergencyCommands),

    /// Spending summary: expenses, savings, emergency fund, available balance
    Summary {
        /// Username
        #[arg(long)]
        user: String,

        /// Bank balance to compute the available balance against
        /// (omit to use the balance saved in the profile)
        #[arg(long)]
        balance: Option<String>,
    },

    /// Per-product spending breakdown and peer benchmark comparison
    Report {
        /// Username
        #[arg(long)]
        user: String,
    },

    /// Convert an amount between INR and USD at the fixed rates
    Convert {
        /// Amount to convert (e.g., "100" or "100.00")
        amount: String,

        /// Source currency: INR or USD
        #[arg(long)]
        from: String,

        /// Target currency: INR or USD
        #[arg(long)]
        to: String,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: expenses, savings
        export_type: String,

        /// Username
        #[arg(long)]
        user: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json (default: csv)
        #[arg(short, long)]
        format: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Product or category name (e.g., "Food")
        product: String,

        /// Amount (e.g., "300" or "300.00")
        amount: String,

        /// Username
        #[arg(long)]
        user: String,

        /// Expense date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List all expenses
    List {
        /// Username
        #[arg(long)]
        user: String,
    },

    /// Remove an expense by id
    Remove {
        /// Expense id (as shown by `expense list`)
        id: i64,

        /// Username
        #[arg(long)]
        user: String,
    },
}

#[derive(Subcommand)]
pub enum SavingsCommands {
    /// Plan savings towards an asset
    Add {
        /// Asset name (unique per user)
        asset: String,

        /// Username
        #[arg(long)]
        user: String,

        /// Total worth of the asset (e.g., "120000")
        #[arg(long)]
        worth: String,

        /// Monthly savings commitment (e.g., "10000")
        #[arg(long)]
        monthly: String,
    },

    /// List all savings goals
    List {
        /// Username
        #[arg(long)]
        user: String,
    },

    /// Remove a savings goal by asset name
    Remove {
        /// Asset name
        asset: String,

        /// Username
        #[arg(long)]
        user: String,
    },
}

#[derive(Subcommand)]
pub enum EmergencyCommands {
    /// Set up or update the monthly emergency fund commitment
    Set {
        /// Monthly amount (e.g., "500")
        amount: String,

        /// Username
        #[arg(long)]
        user: String,
    },

    /// Show the current emergency fund
    Show {
        /// Username
        #[arg(long)]
        user: String,
    },

    /// Remove the emergency fund
    Remove {
        /// Username
        #[arg(long)]
        user: String,
    },
}

impl Cli {
    /// Log level implied by the verbosity flag. RUST_LOG still takes
    /// precedence when set.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }

    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                FinanceService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Signup { username, password } => {
                let service = FinanceService::connect(&self.database).await?;
                let user = service.sign_up(username, &password).await?;
                println!(
                    "Account created: {} (id {}). You can now log in.",
                    user.username, user.id
                );
            }

            Commands::Login { username, password } => {
                let service = FinanceService::connect(&self.database).await?;
                let user_id = service.authenticate(&username, &password).await?;
                println!("Login successful. Welcome, {} (id {}).", username, user_id);
            }

            Commands::Setup {
                user,
                age,
                occupation,
                balance,
            } => {
                let service = FinanceService::connect(&self.database).await?;
                let user_id = resolve_user(&service, &user).await?;
                let balance_cents = parse_cents(&balance)
                    .context("Invalid balance format. Use '15000.00' or '15000'")?;

                let profile = service
                    .save_profile(user_id, age, occupation, balance_cents)
                    .await?;
                println!(
                    "Profile saved for {}: age {}, occupation {}, bank balance {}",
                    user,
                    profile.age,
                    profile.occupation,
                    format_cents(profile.bank_balance_cents)
                );
            }

            Commands::Expense(expense_cmd) => {
                let service = FinanceService::connect(&self.database).await?;
                run_expense_command(&service, expense_cmd).await?;
            }

            Commands::Savings(savings_cmd) => {
                let service = FinanceService::connect(&self.database).await?;
                run_savings_command(&service, savings_cmd).await?;
            }

            Commands::Emergency(emergency_cmd) => {
                let service = FinanceService::connect(&self.database).await?;
                run_emergency_command(&service, emergency_cmd).await?;
            }

            Commands::Summary { user, balance } => {
                let service = FinanceService::connect(&self.database).await?;
                let user_id = resolve_user(&service, &user).await?;

                let balance_cents = match balance {
                    Some(b) => {
                        parse_cents(&b).context("Invalid balance format. Use '15000.00'")?
                    }
                    None => service.get_profile(user_id).await?.bank_balance_cents,
                };

                run_summary_command(&service, user_id, balance_cents).await?;
            }

            Commands::Report { user } => {
                let service = FinanceService::connect(&self.database).await?;
                let user_id = resolve_user(&service, &user).await?;
                run_report_command(&service, user_id).await?;
            }

            Commands::Convert { amount, from, to } => {
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '100.00' or '100'")?;
                let from = parse_currency(&from)?;
                let to = parse_currency(&to)?;

                let result = convert(amount_cents, from, to);
                println!(
                    "{} {} is equal to {} {}",
                    format_cents(amount_cents),
                    from,
                    format_cents(result),
                    to
                );
            }

            Commands::Export {
                export_type,
                user,
                output,
                format,
            } => {
                let service = FinanceService::connect(&self.database).await?;
                let user_id = resolve_user(&service, &user).await?;
                run_export_command(
                    &service,
                    user_id,
                    &export_type,
                    output.as_deref(),
                    format.as_deref(),
                )
                .await?;
            }
        }

        Ok(())
    }
}

/// Resolve a `--user USERNAME` argument to its id through the store.
async fn resolve_user(service: &FinanceService, username: &str) -> Result<UserId> {
    let user = service.get_user(username).await?;
    Ok(user.id)
}

fn parse_currency(s: &str) -> Result<Currency> {
    Currency::from_str(s)
        .ok_or_else(|| anyhow::anyhow!("Invalid currency '{}'. Valid currencies: INR, USD", s))
}

/// Parse a YYYY-MM-DD date, defaulting to today when absent.
fn parse_date_or_today(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(date_str) => NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str)),
        None => Ok(Utc::now().date_naive()),
    }
}

async fn run_expense_command(service: &FinanceService, cmd: ExpenseCommands) -> Result<()> {
    match cmd {
        ExpenseCommands::Add {
            product,
            amount,
            user,
            date,
            notes,
        } => {
            let user_id = resolve_user(service, &user).await?;
            let amount_cents =
                parse_cents(&amount).context("Invalid amount format. Use '300.00' or '300'")?;
            let date = parse_date_or_today(date.as_deref())?;

            let expense = service
                .add_expense(user_id, product, amount_cents, date, notes)
                .await?;
            println!(
                "Added expense {}: {} {} on {}",
                expense.id,
                expense.product_name,
                format_cents(expense.amount_cents),
                expense.date
            );
        }

        ExpenseCommands::List { user } => {
            let user_id = resolve_user(service, &user).await?;
            let expenses = service.list_expenses(user_id).await?;

            if expenses.is_empty() {
                println!("No expenses found.");
            } else {
                println!(
                    "{:<6} {:<20} {:>12} {:<12} {}",
                    "ID", "PRODUCT", "AMOUNT", "DATE", "NOTES"
                );
                println!("{}", "-".repeat(64));
                for expense in &expenses {
                    println!(
                        "{:<6} {:<20} {:>12} {:<12} {}",
                        expense.id,
                        expense.product_name,
                        format_cents(expense.amount_cents),
                        expense.date.to_string(),
                        expense.notes.as_deref().unwrap_or("")
                    );
                }
                println!("{}", "-".repeat(64));
                let total = service.total_expenses(user_id).await?;
                println!("{:<27} {:>12}", "TOTAL", format_cents(total));
            }
        }

        ExpenseCommands::Remove { id, user } => {
            let user_id = resolve_user(service, &user).await?;
            let removed = service.remove_expense(user_id, id).await?;
            println!(
                "Removed expense {}: {} {}",
                removed.id,
                removed.product_name,
                format_cents(removed.amount_cents)
            );
        }
    }
    Ok(())
}

async fn run_savings_command(service: &FinanceService, cmd: SavingsCommands) -> Result<()> {
    match cmd {
        SavingsCommands::Add {
            asset,
            user,
            worth,
            monthly,
        } => {
            let user_id = resolve_user(service, &user).await?;
            let worth_cents =
                parse_cents(&worth).context("Invalid worth format. Use '120000.00'")?;
            let monthly_cents =
                parse_cents(&monthly).context("Invalid monthly format. Use '10000.00'")?;

            let goal = service
                .add_savings_goal(user_id, asset, worth_cents, monthly_cents)
                .await?;
            println!(
                "Added savings goal: {} (worth {}, {} per month)",
                goal.asset_name,
                format_cents(goal.total_worth_cents),
                format_cents(goal.monthly_savings_cents)
            );

            if let Some(months) = goal.months_to_goal() {
                println!(
                    "You will reach the total worth in approximately {} months.",
                    months
                );
            }
        }

        SavingsCommands::List { user } => {
            let user_id = resolve_user(service, &user).await?;
            let goals = service.list_savings_goals(user_id).await?;

            if goals.is_empty() {
                println!("No savings goals found.");
            } else {
                println!(
                    "{:<20} {:>14} {:>14} {:>8}",
                    "ASSET", "TOTAL WORTH", "MONTHLY", "MONTHS"
                );
                println!("{}", "-".repeat(60));
                for goal in &goals {
                    let months = goal
                        .months_to_goal()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<20} {:>14} {:>14} {:>8}",
                        goal.asset_name,
                        format_cents(goal.total_worth_cents),
                        format_cents(goal.monthly_savings_cents),
                        months
                    );
                }
            }
        }

        SavingsCommands::Remove { asset, user } => {
            let user_id = resolve_user(service, &user).await?;
            let removed = service.remove_savings_goal(user_id, &asset).await?;
            println!("Removed savings goal: {}", removed.asset_name);
        }
    }
    Ok(())
}

async fn run_emergency_command(service: &FinanceService, cmd: EmergencyCommands) -> Result<()> {
    match cmd {
        EmergencyCommands::Set { amount, user } => {
            let user_id = resolve_user(service, &user).await?;
            let amount_cents =
                parse_cents(&amount).context("Invalid amount format. Use '500.00' or '500'")?;

            let fund = service.set_emergency_fund(user_id, amount_cents).await?;
            println!(
                "Emergency fund set up: {} per month",
                format_cents(fund.monthly_savings_cents)
            );
        }

        EmergencyCommands::Show { user } => {
            let user_id = resolve_user(service, &user).await?;
            match service.get_emergency_fund(user_id).await? {
                Some(fund) => println!(
                    "Emergency fund: {} per month",
                    format_cents(fund.monthly_savings_cents)
                ),
                None => println!("No emergency fund set up."),
            }
        }

        EmergencyCommands::Remove { user } => {
            let user_id = resolve_user(service, &user).await?;
            let removed = service.remove_emergency_fund(user_id).await?;
            println!(
                "Removed emergency fund ({} per month)",
                format_cents(removed.monthly_savings_cents)
            );
        }
    }
    Ok(())
}

async fn run_summary_command(
    service: &FinanceService,
    user_id: UserId,
    balance_cents: i64,
) -> Result<()> {
    let summary = service.spending_summary(user_id, balance_cents).await?;

    println!("Spending Summary");
    println!();
    println!("{:<20} {:>14}", "CATEGORY", "AMOUNT");
    println!("{}", "-".repeat(35));
    println!(
        "{:<20} {:>14}",
        "Bank Balance",
        format_cents(summary.bank_balance_cents)
    );
    println!(
        "{:<20} {:>14}",
        "Expenses",
        format_cents(summary.total_expenses_cents)
    );
    println!(
        "{:<20} {:>14}",
        "Savings",
        format_cents(summary.total_savings_cents)
    );
    println!(
        "{:<20} {:>14}",
        "Emergency Fund",
        format_cents(summary.total_emergency_cents)
    );
    println!("{}", "-".repeat(35));
    println!(
        "{:<20} {:>14}",
        "Available Balance",
        format_cents(summary.available_balance_cents)
    );

    if summary.available_balance_cents < 0 {
        println!();
        println!("Warning: available balance is negative. You are overspending.");
    }

    Ok(())
}

async fn run_report_command(service: &FinanceService, user_id: UserId) -> Result<()> {
    let by_product = service.expenses_by_product(user_id).await?;

    if by_product.is_empty() {
        println!("No expenses found to report on. Add expenses to see the statistics.");
        return Ok(());
    }

    println!("Expense Breakdown by Product");
    println!();
    println!("{:<20} {:>12} {:>8}", "PRODUCT", "TOTAL", "COUNT");
    println!("{}", "-".repeat(42));
    for spend in &by_product {
        println!(
            "{:<20} {:>12} {:>8}",
            spend.product_name,
            format_cents(spend.total_cents),
            spend.count
        );
    }

    let total = service.total_expenses(user_id).await?;
    println!("{}", "-".repeat(42));
    println!("{:<20} {:>12}", "TOTAL", format_cents(total));
    println!();
    println!(
        "Peer benchmark (avg student expense): {}",
        format_cents(PEER_BENCHMARK_CENTS)
    );
    if let Some(message) = BenchmarkVerdict::classify(total).message() {
        println!("{}", message);
    }

    Ok(())
}

async fn run_export_command(
    service: &FinanceService,
    user_id: UserId,
    export_type: &str,
    output: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let format = format.unwrap_or("csv");
    let count = match (export_type, format) {
        ("expenses", "csv") => exporter.export_expenses_csv(user_id, writer).await?,
        ("expenses", "json") => exporter.export_expenses_json(user_id, writer).await?,
        ("savings", "csv") => exporter.export_savings_csv(user_id, writer).await?,
        ("savings", "json") => exporter.export_savings_json(user_id, writer).await?,
        ("expenses" | "savings", _) => {
            anyhow::bail!("Invalid format '{}'. Valid formats: csv, json", format);
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: expenses, savings",
                export_type
            );
        }
    };

    if output.is_some() {
        eprintln!("Exported {} records", count);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_flag_raises_log_level() {
        let cli = Cli::try_parse_from(["finflow", "--verbose", "init"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);

        let cli = Cli::try_parse_from(["finflow", "init"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Info);
    }
}

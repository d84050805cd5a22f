//! Interactive terminal adapter for the account ledger
//!
//! A thin menu loop over the same `Ledger` facade the HTTP gateway
//! uses. The one-time code is printed to the terminal in place of
//! out-of-band delivery.

use anyhow::Result;
use clap::Parser;
use ledger::{Ledger, LedgerConfig, ProfileUpdate, RegisterRequest, Session};
use rust_decimal::Decimal;
use std::io::{self, Write};
use types::account::{Account, AccountStatus};
use types::errors::LedgerError;

#[derive(Parser)]
#[command(name = "bank-console")]
#[command(about = "Interactive console for the account ledger", long_about = None)]
struct Cli {
    /// Path to the durable JSON dataset
    #[arg(long, default_value = "database.json")]
    db: String,

    /// Ceiling per deposit call
    #[arg(long, default_value = "100000")]
    deposit_limit: Decimal,

    /// Admin account email (seeded on first run)
    #[arg(long, default_value = "admin@bank.com")]
    admin_email: String,

    /// Admin account PIN (seeded on first run)
    #[arg(long, default_value = "9999")]
    admin_pin: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = LedgerConfig {
        deposit_limit: cli.deposit_limit,
        ..LedgerConfig::default()
    };
    let ledger = Ledger::open(&cli.db, config);
    ledger.ensure_admin(RegisterRequest {
        name: "Admin".to_string(),
        age: 30,
        email: cli.admin_email.clone(),
        credential: cli.admin_pin.clone(),
    })?;
    tracing::info!(db = %cli.db, "ledger opened");

    println!("=== Bank Management Console ===");
    loop {
        println!();
        println!("1) Login  2) Register  3) Exit");
        match prompt("> ")?.as_str() {
            "1" => {
                if let Some(session) = login(&ledger)? {
                    session_menu(&ledger, &session)?;
                }
            }
            "2" => register(&ledger)?,
            "3" => break,
            _ => println!("Unknown choice."),
        }
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_amount() -> Result<Option<Decimal>> {
    let raw = prompt("Amount: ")?;
    match raw.parse::<Decimal>() {
        Ok(amount) => Ok(Some(amount)),
        Err(_) => {
            println!("Not a valid amount.");
            Ok(None)
        }
    }
}

fn report(err: LedgerError) {
    println!("Error: {}", err);
}

fn register(ledger: &Ledger) -> Result<()> {
    let name = prompt("Full name: ")?;
    let age: u32 = match prompt("Age: ")?.parse() {
        Ok(age) => age,
        Err(_) => {
            println!("Not a valid age.");
            return Ok(());
        }
    };
    let email = prompt("Email: ")?;
    let credential = prompt("4-digit PIN: ")?;

    match ledger.register(RegisterRequest {
        name,
        age,
        email,
        credential,
    }) {
        Ok(account) => {
            println!("Account created successfully!");
            println!("Your account number is: {}", account.account_number);
        }
        Err(err) => report(err),
    }
    Ok(())
}

fn login(ledger: &Ledger) -> Result<Option<Session>> {
    let email = prompt("Email: ")?;
    let credential = prompt("PIN: ")?;

    let code = match ledger.begin_login(&email, &credential) {
        Ok(code) => code,
        Err(err) => {
            report(err);
            return Ok(None);
        }
    };
    println!("(Demo OTP) {}", code);

    loop {
        let submitted = prompt("Enter OTP (blank to cancel): ")?;
        if submitted.is_empty() {
            return Ok(None);
        }
        match ledger.verify_code(&email, &submitted) {
            Ok(session) => {
                println!("Login successful!");
                return Ok(Some(session));
            }
            Err(err) => {
                report(err);
                // The code may already be invalidated; let the user bail out
            }
        }
    }
}

fn session_menu(ledger: &Ledger, session: &Session) -> Result<()> {
    loop {
        println!();
        if session.is_admin {
            println!("1) Dashboard  2) Deposit  3) Withdraw  4) History  5) Profile  6) Admin panel  7) Logout");
        } else {
            println!("1) Dashboard  2) Deposit  3) Withdraw  4) History  5) Profile  7) Logout");
        }
        match prompt("> ")?.as_str() {
            "1" => dashboard(ledger, session)?,
            "2" => deposit(ledger, session)?,
            "3" => withdraw(ledger, session)?,
            "4" => history(ledger, session)?,
            "5" => profile(ledger, session)?,
            "6" if session.is_admin => admin_panel(ledger)?,
            "7" => {
                ledger.logout(&session.token);
                println!("Logged out successfully.");
                return Ok(());
            }
            _ => println!("Unknown choice."),
        }
        // The account can disappear underneath the session (deletion)
        if !session.is_admin && ledger.account(&session.email).is_err() {
            return Ok(());
        }
    }
}

fn dashboard(ledger: &Ledger, session: &Session) -> Result<()> {
    if session.is_admin {
        match ledger.stats() {
            Ok(stats) => {
                println!("Total accounts:     {}", stats.total_accounts);
                println!("Total balance:      {}", stats.total_balance);
                println!("Total transactions: {}", stats.total_transactions);
                println!(
                    "Active/Suspended/Blocked: {}/{}/{}",
                    stats.active, stats.suspended, stats.blocked
                );
                println!("Total deposited:    {}", stats.total_deposited);
                println!("Total withdrawn:    {}", stats.total_withdrawn);
            }
            Err(err) => report(err),
        }
        return Ok(());
    }

    match ledger.account(&session.email) {
        Ok(account) => print_account(&account),
        Err(err) => report(err),
    }
    Ok(())
}

fn print_account(account: &Account) {
    println!("Name:           {}", account.name);
    println!("Email:          {}", account.email);
    println!("Age:            {}", account.age);
    println!("Account number: {}", account.account_number);
    println!("Balance:        {}", account.balance);
    println!("Status:         {}", account.status);
}

fn deposit(ledger: &Ledger, session: &Session) -> Result<()> {
    if session.is_admin {
        println!("Admin account cannot perform deposits.");
        return Ok(());
    }
    if let Some(amount) = prompt_amount()? {
        match ledger.deposit(&session.email, amount) {
            Ok(balance) => println!("Deposit successful. New balance: {}", balance),
            Err(err) => report(err),
        }
    }
    Ok(())
}

fn withdraw(ledger: &Ledger, session: &Session) -> Result<()> {
    if session.is_admin {
        println!("Admin account cannot perform withdrawals.");
        return Ok(());
    }
    if let Some(amount) = prompt_amount()? {
        let credential = prompt("Confirm PIN: ")?;
        match ledger.withdraw(&session.email, &credential, amount) {
            Ok(balance) => println!("Withdrawal successful. New balance: {}", balance),
            Err(err) => report(err),
        }
    }
    Ok(())
}

fn history(ledger: &Ledger, session: &Session) -> Result<()> {
    if session.is_admin {
        println!("Admin account has no personal transactions.");
        return Ok(());
    }
    let account = match ledger.account(&session.email) {
        Ok(account) => account,
        Err(err) => {
            report(err);
            return Ok(());
        }
    };
    if account.transactions.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }
    for tx in account.transactions.iter().rev() {
        println!(
            "{} | {} | {} | Balance: {}",
            tx.timestamp.format("%Y-%m-%d %H:%M:%S"),
            tx.kind,
            tx.amount,
            tx.balance_after
        );
    }
    Ok(())
}

fn profile(ledger: &Ledger, session: &Session) -> Result<()> {
    if session.is_admin {
        println!("Admin profile: {}", session.email);
        return Ok(());
    }
    match ledger.account(&session.email) {
        Ok(account) => print_account(&account),
        Err(err) => {
            report(err);
            return Ok(());
        }
    }

    println!();
    println!("1) Update details  2) Delete account  3) Back");
    match prompt("> ")?.as_str() {
        "1" => {
            let credential = prompt("Current PIN: ")?;
            let name = prompt("New name (blank to keep): ")?;
            let email = prompt("New email (blank to keep): ")?;
            let pin = prompt("New PIN (blank to keep): ")?;
            let update = ProfileUpdate {
                name: (!name.is_empty()).then_some(name),
                email: (!email.is_empty()).then_some(email),
                credential: (!pin.is_empty()).then_some(pin),
            };
            match ledger.update_profile(&session.email, &credential, update) {
                Ok(_) => println!("Profile updated successfully. Please log in again."),
                Err(err) => report(err),
            }
        }
        "2" => {
            let credential = prompt("Confirm PIN to delete: ")?;
            match ledger.delete_account(&session.email, &credential) {
                Ok(()) => println!("Account deleted successfully."),
                Err(err) => report(err),
            }
        }
        _ => {}
    }
    Ok(())
}

fn admin_panel(ledger: &Ledger) -> Result<()> {
    println!("1) List accounts  2) Set status  3) Back");
    match prompt("> ")?.as_str() {
        "1" => match ledger.accounts() {
            Ok(accounts) if accounts.is_empty() => println!("No accounts yet."),
            Ok(accounts) => {
                for account in accounts {
                    println!(
                        "{} | {} | {} | {} | {} | {} txs",
                        account.name,
                        account.email,
                        account.account_number,
                        account.balance,
                        account.status,
                        account.transactions.len()
                    );
                }
            }
            Err(err) => report(err),
        },
        "2" => {
            let email = prompt("Target email: ")?;
            let raw = prompt("New status (Active/Suspended/Blocked): ")?;
            match raw.parse::<AccountStatus>() {
                Ok(status) => match ledger.set_status(&email, status) {
                    Ok(()) => println!("User status updated to {}", status),
                    Err(err) => report(err),
                },
                Err(err) => report(err),
            }
        }
        _ => {}
    }
    Ok(())
}

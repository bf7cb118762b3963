//! Database seeder for Folio development and testing.
//!
//! Seeds a demo organization chart of accounts and a handful of journal
//! entries for local development and testing purposes.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::str::FromStr;
use uuid::Uuid;

use folio_core::account::AccountType;
use folio_core::journal::{CreateJournalEntryInput, JournalEntryType, JournalLineInput, LineSide};
use folio_db::repositories::{
    AccountRepository, CreateAccountInput, JournalEntryFilter, JournalEntryRepository,
    LedgerRepository,
};
use folio_db::StatementCache;
use folio_shared::types::{Currency, PageRequest};

/// Demo organization ID (consistent for all seeds)
const DEMO_ORG_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo user ID (consistent for all seeds)
const DEMO_USER_ID: &str = "00000000-0000-0000-0000-000000000002";

/// Standard chart of accounts for the demo organization.
const CHART_OF_ACCOUNTS: [(&str, &str, AccountType); 14] = [
    ("1000", "Cash", AccountType::Asset),
    ("1100", "Accounts Receivable", AccountType::Asset),
    ("1200", "Inventory", AccountType::Asset),
    ("1500", "Fixed Assets", AccountType::Asset),
    ("2000", "Accounts Payable", AccountType::Liability),
    ("2500", "Long-Term Loans", AccountType::Liability),
    ("3000", "Owner's Equity", AccountType::Equity),
    ("3900", "Retained Earnings", AccountType::Equity),
    ("4000", "Sales Revenue", AccountType::Revenue),
    ("4900", "Other Income", AccountType::Revenue),
    ("5000", "Cost of Goods Sold", AccountType::Expense),
    ("5100", "Salaries Expense", AccountType::Expense),
    ("5200", "Rent Expense", AccountType::Expense),
    ("5900", "Interest Expense", AccountType::Expense),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = folio_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding chart of accounts...");
    seed_chart_of_accounts(&db).await;

    println!("Seeding demo journal entries...");
    seed_demo_entries(&db).await;

    println!("Seeding complete!");
}

fn demo_org_id() -> Uuid {
    Uuid::parse_str(DEMO_ORG_ID).unwrap()
}

fn demo_user_id() -> Uuid {
    Uuid::parse_str(DEMO_USER_ID).unwrap()
}

async fn seed_chart_of_accounts(db: &DatabaseConnection) {
    let accounts = AccountRepository::new(db.clone());
    let org_id = demo_org_id();
    let mut inserted = 0;

    for (code, name, account_type) in CHART_OF_ACCOUNTS {
        match accounts.find_account_by_code(org_id, code).await {
            Ok(Some(_)) => {
                println!("  Account {code} already exists, skipping...");
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("Failed to look up account {code}: {e}");
                continue;
            }
        }

        let input = CreateAccountInput {
            organization_id: org_id,
            code: code.to_string(),
            name: name.to_string(),
            description: None,
            account_type,
            normal_balance: None,
            parent_id: None,
            currency: Currency::Usd,
            is_system: true,
        };

        if let Err(e) = accounts.create_account(input).await {
            eprintln!("Failed to insert account {code}: {e}");
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} accounts");
}

async fn lookup_account(
    accounts: &AccountRepository,
    org_id: Uuid,
    code: &str,
) -> Option<Uuid> {
    match accounts.find_account_by_code(org_id, code).await {
        Ok(Some(account)) => Some(account.id),
        Ok(None) => {
            eprintln!("Account {code} not found, run the chart seed first");
            None
        }
        Err(e) => {
            eprintln!("Failed to look up account {code}: {e}");
            None
        }
    }
}

/// Seeds two posted entries and one draft so statements and the entry
/// list have data to show.
#[allow(clippy::too_many_lines)]
async fn seed_demo_entries(db: &DatabaseConnection) {
    let org_id = demo_org_id();
    let user_id = demo_user_id();

    let entries = JournalEntryRepository::new(db.clone());
    match entries
        .list_entries(org_id, JournalEntryFilter::default(), PageRequest::default())
        .await
    {
        Ok(page) if page.meta.total > 0 => {
            println!("  Journal entries already exist, skipping...");
            return;
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!("Failed to check existing entries: {e}");
            return;
        }
    }

    let accounts = AccountRepository::new(db.clone());
    let Some(cash) = lookup_account(&accounts, org_id, "1000").await else {
        return;
    };
    let Some(sales) = lookup_account(&accounts, org_id, "4000").await else {
        return;
    };
    let Some(rent) = lookup_account(&accounts, org_id, "5200").await else {
        return;
    };
    let Some(salaries) = lookup_account(&accounts, org_id, "5100").await else {
        return;
    };
    let Some(payable) = lookup_account(&accounts, org_id, "2000").await else {
        return;
    };

    let today = Utc::now().date_naive();
    let ledger = LedgerRepository::new(db.clone(), StatementCache::new());

    // (description, reference, debit account, credit account, amount, post)
    let demo_entries = [
        ("Demo cash sale", "SEED-0001", cash, sales, "2500.00", true),
        ("Demo rent payment", "SEED-0002", rent, cash, "800.00", true),
        (
            "Demo salary accrual",
            "SEED-0003",
            salaries,
            payable,
            "1200.00",
            false,
        ),
    ];

    for (description, reference, debit_account, credit_account, amount, post) in demo_entries {
        let amount = Decimal::from_str(amount).unwrap();
        let input = CreateJournalEntryInput {
            organization_id: org_id,
            entry_type: JournalEntryType::Standard,
            entry_date: today,
            description: description.to_string(),
            reference: Some(reference.to_string()),
            currency: Currency::Usd,
            lines: vec![
                JournalLineInput {
                    account_id: debit_account,
                    side: LineSide::Debit,
                    amount,
                    description: None,
                    reference: None,
                },
                JournalLineInput {
                    account_id: credit_account,
                    side: LineSide::Credit,
                    amount,
                    description: None,
                    reference: None,
                },
            ],
            source: None,
            created_by: user_id,
        };

        let created = match entries.create_entry(input).await {
            Ok(created) => created,
            Err(e) => {
                eprintln!("Failed to create entry \"{description}\": {e}");
                continue;
            }
        };

        if post {
            match ledger.post_entry(org_id, created.entry.id, user_id).await {
                Ok(posted) => println!("  Created and posted {}", posted.entry_number),
                Err(e) => eprintln!("Failed to post {}: {e}", created.entry.entry_number),
            }
        } else {
            println!("  Created draft {}", created.entry.entry_number);
        }
    }
}

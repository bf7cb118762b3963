//! Initial database migration.
//!
//! Creates the ledger schema: enums, chart of accounts, journal tables,
//! the general ledger, and the integrity triggers that back up the
//! application-level posting rules.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: JOURNAL
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRY_LINES_SQL).await?;

        // ============================================================
        // PART 4: GENERAL LEDGER
        // ============================================================
        db.execute_unprepared(GENERAL_LEDGER_ENTRIES_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Account classification
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense'
);

-- Side on which an account balance normally sits
CREATE TYPE normal_balance AS ENUM ('debit', 'credit');

-- Journal entry classification
CREATE TYPE journal_entry_type AS ENUM (
    'standard',
    'adjusting',
    'closing',
    'reversing',
    'opening',
    'correction'
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL,
    code VARCHAR(4) NOT NULL,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    account_type account_type NOT NULL,
    normal_balance normal_balance NOT NULL,
    parent_id UUID REFERENCES accounts(id),
    currency CHAR(3) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    is_system BOOLEAN NOT NULL DEFAULT false,
    current_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_account_code CHECK (code ~ '^[0-9]{4}$'),
    CONSTRAINT chk_account_currency CHECK (currency ~ '^[A-Z]{3}$'),
    UNIQUE (organization_id, code)
);

CREATE INDEX idx_accounts_org ON accounts(organization_id) WHERE is_active = true;
CREATE INDEX idx_accounts_org_type ON accounts(organization_id, account_type);
CREATE INDEX idx_accounts_parent ON accounts(parent_id) WHERE parent_id IS NOT NULL;
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL,
    entry_number VARCHAR(20) NOT NULL,
    entry_type journal_entry_type NOT NULL DEFAULT 'standard',
    entry_date DATE NOT NULL,
    description TEXT NOT NULL,
    reference VARCHAR(100),
    currency CHAR(3) NOT NULL,
    total_debit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    total_credit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    is_posted BOOLEAN NOT NULL DEFAULT false,
    posted_at TIMESTAMPTZ,
    posted_by UUID,
    reverses_entry_id UUID REFERENCES journal_entries(id),
    reversed_by_entry_id UUID REFERENCES journal_entries(id),
    source_type VARCHAR(50),
    source_id UUID,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_entry_balanced CHECK (total_debit = total_credit),
    CONSTRAINT chk_entry_currency CHECK (currency ~ '^[A-Z]{3}$'),
    UNIQUE (organization_id, entry_number)
);

CREATE INDEX idx_journal_entries_org_date ON journal_entries(organization_id, entry_date);
CREATE INDEX idx_journal_entries_org_posted ON journal_entries(organization_id, is_posted);
CREATE INDEX idx_journal_entries_org_type ON journal_entries(organization_id, entry_type);
CREATE INDEX idx_journal_entries_source ON journal_entries(source_type, source_id) WHERE source_id IS NOT NULL;
";

const JOURNAL_ENTRY_LINES_SQL: &str = r"
CREATE TABLE journal_entry_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    line_number INTEGER NOT NULL,
    debit_account_id UUID REFERENCES accounts(id),
    credit_account_id UUID REFERENCES accounts(id),
    amount NUMERIC(19, 4) NOT NULL,
    description TEXT,
    reference VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_line_amount CHECK (amount > 0),
    CONSTRAINT chk_line_number CHECK (line_number > 0),
    CONSTRAINT chk_line_single_side CHECK (
        (debit_account_id IS NOT NULL AND credit_account_id IS NULL)
        OR (debit_account_id IS NULL AND credit_account_id IS NOT NULL)
    ),
    UNIQUE (journal_entry_id, line_number)
);

CREATE INDEX idx_journal_entry_lines_entry ON journal_entry_lines(journal_entry_id);
CREATE INDEX idx_journal_entry_lines_debit ON journal_entry_lines(debit_account_id) WHERE debit_account_id IS NOT NULL;
CREATE INDEX idx_journal_entry_lines_credit ON journal_entry_lines(credit_account_id) WHERE credit_account_id IS NOT NULL;
";

const GENERAL_LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE general_ledger_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    entry_date DATE NOT NULL,
    sequence BIGSERIAL,
    debit_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    running_balance NUMERIC(19, 4) NOT NULL,
    description TEXT,
    source_type VARCHAR(50),
    source_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_gl_single_side CHECK (
        (debit_amount > 0 AND credit_amount = 0)
        OR (debit_amount = 0 AND credit_amount > 0)
    )
);

CREATE INDEX idx_gl_account_date ON general_ledger_entries(account_id, entry_date, sequence);
CREATE INDEX idx_gl_org_date ON general_ledger_entries(organization_id, entry_date);
CREATE INDEX idx_gl_journal_entry ON general_ledger_entries(journal_entry_id);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: check_entry_balance
-- Ensures double-entry balance (debit = credit) when an entry is posted
-- ============================================================
CREATE OR REPLACE FUNCTION check_entry_balance()
RETURNS TRIGGER AS $$
DECLARE
    line_debits NUMERIC(19, 4);
    line_credits NUMERIC(19, 4);
BEGIN
    IF NEW.is_posted AND NOT OLD.is_posted THEN
        SELECT
            COALESCE(SUM(amount) FILTER (WHERE debit_account_id IS NOT NULL), 0),
            COALESCE(SUM(amount) FILTER (WHERE credit_account_id IS NOT NULL), 0)
        INTO line_debits, line_credits
        FROM journal_entry_lines
        WHERE journal_entry_id = NEW.id;

        IF line_debits <> line_credits THEN
            RAISE EXCEPTION 'Journal entry is not balanced. Debit: %, Credit: %',
                line_debits, line_credits;
        END IF;

        IF line_debits <> NEW.total_debit OR line_credits <> NEW.total_credit THEN
            RAISE EXCEPTION 'Journal entry totals do not match lines. Header: % / %, Lines: % / %',
                NEW.total_debit, NEW.total_credit, line_debits, line_credits;
        END IF;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_check_entry_balance
AFTER UPDATE ON journal_entries
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_entry_balance();

-- ============================================================
-- FUNCTION: prevent_posted_entry_modification
-- Prevents content edits on posted entries; posting flags and the
-- reversal back-link stay writable
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_posted_entry_modification()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.is_posted AND NEW.is_posted THEN
        IF NEW.entry_number <> OLD.entry_number
            OR NEW.entry_type <> OLD.entry_type
            OR NEW.entry_date <> OLD.entry_date
            OR NEW.description <> OLD.description
            OR COALESCE(NEW.reference, '') <> COALESCE(OLD.reference, '')
            OR NEW.currency <> OLD.currency
            OR NEW.total_debit <> OLD.total_debit
            OR NEW.total_credit <> OLD.total_credit THEN
            RAISE EXCEPTION 'Cannot modify a posted journal entry. Create a reversing entry instead.';
        END IF;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_posted_entry_mod
BEFORE UPDATE ON journal_entries
FOR EACH ROW
EXECUTE FUNCTION prevent_posted_entry_modification();

-- ============================================================
-- FUNCTION: prevent_posted_line_modification
-- Lines of a posted entry are immutable
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_posted_line_modification()
RETURNS TRIGGER AS $$
DECLARE
    posted BOOLEAN;
BEGIN
    SELECT je.is_posted INTO posted
    FROM journal_entries je
    WHERE je.id = COALESCE(NEW.journal_entry_id, OLD.journal_entry_id);

    IF posted THEN
        RAISE EXCEPTION 'Cannot modify lines of a posted journal entry.';
    END IF;

    RETURN COALESCE(NEW, OLD);
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_posted_line_mod
BEFORE INSERT OR UPDATE OR DELETE ON journal_entry_lines
FOR EACH ROW
EXECUTE FUNCTION prevent_posted_line_modification();
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

-- Drop triggers
DROP TRIGGER IF EXISTS trg_prevent_posted_line_mod ON journal_entry_lines;
DROP TRIGGER IF EXISTS trg_prevent_posted_entry_mod ON journal_entries;
DROP TRIGGER IF EXISTS trg_check_entry_balance ON journal_entries;

-- Drop functions
DROP FUNCTION IF EXISTS prevent_posted_line_modification();
DROP FUNCTION IF EXISTS prevent_posted_entry_modification();
DROP FUNCTION IF EXISTS check_entry_balance();

-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS general_ledger_entries CASCADE;
DROP TABLE IF EXISTS journal_entry_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;

-- Drop enums
DROP TYPE IF EXISTS journal_entry_type CASCADE;
DROP TYPE IF EXISTS normal_balance CASCADE;
DROP TYPE IF EXISTS account_type CASCADE;
";

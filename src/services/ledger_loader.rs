use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, trace};

use crate::date_utils::{infer_layout, parse_date};
use crate::error::{AppError, AppResult};
use crate::models::{Ledger, NewTransaction, Schema, Transaction};

/// Which statement layout a file follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    /// Merged bank statement: id, date, debit, credit and balance are required.
    Primary,
    /// Categorized export: id, date, debit and category are required.
    Categorized,
}

impl LedgerKind {
    fn required_columns(&self) -> &'static [&'static str] {
        match self {
            LedgerKind::Primary => &[ID_COL, DATE_COL, DEBIT_COL, CREDIT_COL, BALANCE_COL],
            LedgerKind::Categorized => &[ID_COL, DATE_COL, DEBIT_COL, CATEGORY_COL],
        }
    }
}

const ID_COL: &str = "Transaction_ID";
const DATE_COL: &str = "Transaction_Date";
const DEBIT_COL: &str = "Debit";
const CREDIT_COL: &str = "Credit";
const BALANCE_COL: &str = "Balance";
const RECIPIENT_COL: &str = "Recipient_Name";
const TYPE_COL: &str = "Transaction_Type";
const CATEGORY_COL: &str = "Transaction_Category";
const SUBCATEGORY_COL: &str = "Sub_Category";

/// Load a ledger from a CSV file on disk.
pub fn load(path: &Path, kind: LedgerKind) -> AppResult<Ledger> {
    let content = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::NotFound(format!("File {} not found", path.display())),
        _ => AppError::Load {
            source_name: path.display().to_string(),
            cause: e.to_string(),
        },
    })?;

    parse_ledger(&content, kind).map_err(|e| match e {
        AppError::Csv(cause) => AppError::Load {
            source_name: path.display().to_string(),
            cause: cause.to_string(),
        },
        other => other,
    })
}

/// Parse CSV content into a ledger. Any bad row fails the whole load.
pub fn parse_ledger(content: &[u8], kind: LedgerKind) -> AppResult<Ledger> {
    trace!(content_size = content.len(), ?kind, "Starting ledger parsing");

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers = reader.headers()?.clone();
    debug!(column_count = headers.len(), "Ledger headers parsed");

    let missing: Vec<&str> = kind
        .required_columns()
        .iter()
        .copied()
        .filter(|name| find_column(&headers, name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Schema(format!(
            "Missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let id_col = find_column(&headers, ID_COL);
    let date_col = find_column(&headers, DATE_COL);
    let debit_col = find_column(&headers, DEBIT_COL);
    let credit_col = find_column(&headers, CREDIT_COL);
    let balance_col = find_column(&headers, BALANCE_COL);
    let recipient_col = find_column(&headers, RECIPIENT_COL);
    let type_col = find_column(&headers, TYPE_COL);
    let category_col = find_column(&headers, CATEGORY_COL);
    let subcategory_col = find_column(&headers, SUBCATEGORY_COL);

    let schema = Schema {
        debit: debit_col.is_some(),
        credit: credit_col.is_some(),
        balance: balance_col.is_some(),
        recipient_name: recipient_col.is_some(),
        transaction_type: type_col.is_some(),
        category: category_col.is_some(),
        subcategory: subcategory_col.is_some(),
    };

    let mut layout = None;
    let mut seen_ids = HashSet::new();
    let mut transactions = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let row_number = row_idx + 2;
        let record = result?;

        let id = get_field(&record, id_col).unwrap_or_default();
        if id.is_empty() {
            return Err(AppError::Schema(format!(
                "Row {}: empty {}",
                row_number, ID_COL
            )));
        }
        if !seen_ids.insert(id.clone()) {
            return Err(AppError::Schema(format!(
                "Row {}: duplicate {} '{}'",
                row_number, ID_COL, id
            )));
        }

        let raw_date = get_field(&record, date_col).unwrap_or_default();
        if layout.is_none() {
            layout = infer_layout(&raw_date);
        }
        let date = parse_date(&raw_date, layout).ok_or_else(|| {
            AppError::Parse(format!(
                "Row {}: invalid {} '{}'",
                row_number, DATE_COL, raw_date
            ))
        })?;

        let debit = parse_amount(&record, debit_col, DEBIT_COL, row_number, Sign::NonNegative)?;
        let credit =
            parse_amount(&record, credit_col, CREDIT_COL, row_number, Sign::NonNegative)?;
        let balance = parse_amount(&record, balance_col, BALANCE_COL, row_number, Sign::Any)?;

        transactions.push(Transaction::from(NewTransaction {
            id,
            date,
            debit_cents: debit.unwrap_or(0),
            debit_blank: debit.is_none(),
            credit_cents: credit.unwrap_or(0),
            balance_cents: balance.unwrap_or(0),
            recipient_name: get_field(&record, recipient_col),
            transaction_type: get_field(&record, type_col),
            category: get_field(&record, category_col),
            subcategory: get_field(&record, subcategory_col),
        }));
    }

    debug!(
        row_count = transactions.len(),
        ?layout,
        "Ledger parsing completed"
    );

    Ok(Ledger::new(transactions, schema))
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn get_field(record: &csv::StringRecord, col: Option<usize>) -> Option<String> {
    col.and_then(|c| record.get(c))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    /// Debit and credit amounts.
    NonNegative,
    /// Running balances may go below zero.
    Any,
}

/// Largest accepted amount, one trillion in currency units. Keeps column
/// sums far from `i64` overflow.
const MAX_AMOUNT_CENTS: i64 = 100_000_000_000_000;

/// `None` for a blank or `nan` cell. Anything else must be a number.
fn parse_amount(
    record: &csv::StringRecord,
    col: Option<usize>,
    name: &str,
    row_number: usize,
    sign: Sign,
) -> AppResult<Option<i64>> {
    let Some(raw) = get_field(record, col) else {
        return Ok(None);
    };
    if raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    let invalid = |reason: &str| {
        AppError::Parse(format!(
            "Row {}: invalid {} '{}'{}",
            row_number, name, raw, reason
        ))
    };

    let cents = clean_amount(&raw)
        .and_then(|cleaned| amount_to_cents(&cleaned))
        .ok_or_else(|| invalid(""))?;
    if cents.abs() > MAX_AMOUNT_CENTS {
        return Err(invalid(": amount out of range"));
    }
    if sign == Sign::NonNegative && cents < 0 {
        return Err(invalid(": must not be negative"));
    }
    Ok(Some(cents))
}

const CURRENCY_SYMBOLS: &[char] = &['₹', '$', '€', '£', '¥'];

/// Strip currency symbols, whitespace and thousands separators, keeping one
/// decimal point. Returns `None` when the cell holds any other character or
/// the separators do not form a single number.
fn clean_amount(amount: &str) -> Option<String> {
    // If both . and , appear, the last one is the decimal separator
    let last_dot = amount.rfind('.');
    let last_comma = amount.rfind(',');

    let decimal_char = match (last_dot, last_comma) {
        (Some(d), Some(c)) => {
            if d > c {
                Some('.')
            } else {
                Some(',')
            }
        }
        (Some(_), None) => Some('.'),
        // Statement exports use comma only for grouping ("1,25,000")
        (None, Some(_)) => None,
        (None, None) => None,
    };

    let mut result = String::new();
    let mut has_decimal = false;
    let mut has_sign = false;

    for c in amount.chars() {
        if c.is_ascii_digit() {
            result.push(c);
        } else if Some(c) == decimal_char {
            if has_decimal {
                return None;
            }
            result.push('.');
            has_decimal = true;
        } else if c == '.' || c == ',' {
            // grouping separator, whole part only
            if has_decimal {
                return None;
            }
        } else if (c == '-' || c == '+') && !has_sign && result.is_empty() {
            if c == '-' {
                result.push(c);
            }
            has_sign = true;
        } else if !(c.is_whitespace() || CURRENCY_SYMBOLS.contains(&c)) {
            return None;
        }
    }

    Some(result)
}

/// Convert a cleaned decimal string to integer cents, rounding half away
/// from zero past the second decimal.
fn amount_to_cents(cleaned: &str) -> Option<i64> {
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned),
    };
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut frac_digits = frac.chars().chain(std::iter::repeat('0'));
    let tens = frac_digits.next()?.to_digit(10)? as i64;
    let ones = frac_digits.next()?.to_digit(10)? as i64;
    let round_up = frac_digits.next()?.to_digit(10)? >= 5;

    let cents = whole
        .checked_mul(100)?
        .checked_add(tens * 10 + ones + round_up as i64)?;
    Some(if negative { -cents } else { cents })
}

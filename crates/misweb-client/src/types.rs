//! Wire types returned by the upstream MIS backend
//!
//! Field names mirror the backend's JSON property names. Amount fields
//! default to zero when the backend omits them.

use serde::{Deserialize, Serialize};

/// Response envelope: the backend returns either a bare JSON array
/// or an object wrapping the array under a `data` key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Payload<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Payload<T> {
    /// Unwrap into the row list regardless of envelope shape
    pub fn into_rows(self) -> Vec<T> {
        match self {
            Payload::Wrapped { data } => data,
            Payload::Bare(rows) => rows,
        }
    }
}

/// A selectable reporting entity (company, cost centre, department)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    /// Region/area grouping, when the backend provides one
    #[serde(rename = "Region", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// General-ledger transaction row for the ledger-card family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    #[serde(rename = "GlCd")]
    pub gl_cd: String,
    /// Sub-account within the GL code; groups carry their own balances
    #[serde(rename = "SubAc")]
    pub sub_ac: String,
    #[serde(rename = "SubAcName", default)]
    pub sub_ac_name: String,
    #[serde(rename = "DocNo", default)]
    pub doc_no: String,
    #[serde(rename = "DocDt", default)]
    pub doc_date: String,
    #[serde(rename = "Narration", default)]
    pub narration: String,
    #[serde(rename = "DrAmt", default)]
    pub dr_amt: f64,
    #[serde(rename = "CrAmt", default)]
    pub cr_amt: f64,
    /// Opening balance of the row's sub-account, repeated on every row
    #[serde(rename = "OpeningBalance", default)]
    pub opening_balance: f64,
}

/// Income & expenditure row, one per account/cost-centre cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeExpenditureRow {
    /// "I" marks income; anything else is expenditure
    #[serde(rename = "Catflag")]
    pub catflag: String,
    #[serde(rename = "TitleCd")]
    pub title_cd: String,
    #[serde(rename = "Catcode")]
    pub catcode: String,
    #[serde(rename = "Account")]
    pub account: String,
    #[serde(rename = "AccountName", default)]
    pub account_name: String,
    #[serde(rename = "CostCenter")]
    pub cost_center: String,
    /// Signed amount; expenditure arrives already negative
    #[serde(rename = "Actual", default)]
    pub actual: f64,
}

/// Payment Instruction Voucher row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PivRow {
    #[serde(rename = "PivNo")]
    pub piv_no: String,
    #[serde(rename = "PivDate", default)]
    pub piv_date: String,
    #[serde(rename = "DeptId")]
    pub dept_id: String,
    #[serde(rename = "DeptName", default)]
    pub dept_name: String,
    #[serde(rename = "Payee", default)]
    pub payee: String,
    #[serde(rename = "Amount", default)]
    pub amount: f64,
}

/// Physical verification (stock count) row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRow {
    #[serde(rename = "MaterialCode")]
    pub material_code: String,
    #[serde(rename = "MaterialName", default)]
    pub material_name: String,
    #[serde(rename = "StockBook")]
    pub stock_book: String,
    #[serde(rename = "Unit", default)]
    pub unit: String,
    #[serde(rename = "BookQty", default)]
    pub book_qty: f64,
    #[serde(rename = "VerifiedQty", default)]
    pub verified_qty: f64,
    #[serde(rename = "SurplusAmount", default)]
    pub surplus_amount: f64,
    #[serde(rename = "ShortageAmount", default)]
    pub shortage_amount: f64,
}

/// Solar payment settlement row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolarRow {
    #[serde(rename = "AccountNo")]
    pub account_no: String,
    #[serde(rename = "ConsumerName", default)]
    pub consumer_name: String,
    /// Settlement date (YYYY-MM-DD)
    #[serde(rename = "SettleDate", default)]
    pub settle_date: String,
    #[serde(rename = "Units", default)]
    pub units: f64,
    #[serde(rename = "Amount", default)]
    pub amount: f64,
}

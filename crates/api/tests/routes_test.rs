//! Route tests driven through the full router with `oneshot`.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::util::ServiceExt;
use choubo_api::{AppState, create_router};
use choubo_core::accounts::{Account, AccountCategory, AccountType};
use choubo_core::ledger::{EntryStatus, JournalEntry, JournalLine};
use choubo_shared::AppConfig;
use choubo_shared::types::{JournalEntryId, OrganizationId, PartnerId};

struct Books {
    cash: Account,
    receivable: Account,
    sales: Account,
    entries: Vec<JournalEntry>,
    customer: PartnerId,
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn books() -> Books {
    let cash = Account::new("1110", "現金", AccountType::Asset).with_category(AccountCategory::CashAndDeposits);
    let receivable = Account::new("1130", "売掛金", AccountType::Asset);
    let sales = Account::new("4110", "売上高", AccountType::Revenue);
    let customer = PartnerId::new();
    let organization_id = OrganizationId::new();

    let entry = |date: NaiveDate, description: &str, lines: Vec<JournalLine>| JournalEntry {
        id: JournalEntryId::new(),
        organization_id,
        date,
        description: description.into(),
        status: EntryStatus::Approved,
        lines,
    };
    let entries = vec![
        entry(
            ymd(2024, 4, 5),
            "売上 株式会社サンプル",
            vec![
                JournalLine::debit(receivable.id, dec!(110000)).with_partner(customer),
                JournalLine::credit(sales.id, dec!(110000)),
            ],
        ),
        entry(
            ymd(2024, 4, 25),
            "入金 株式会社サンプル",
            vec![
                JournalLine::debit(cash.id, dec!(60000)),
                JournalLine::credit(receivable.id, dec!(60000)).with_partner(customer),
            ],
        ),
    ];

    Books {
        cash,
        receivable,
        sales,
        entries,
        customer,
    }
}

fn app() -> Router {
    create_router(AppState::new(AppConfig::default()))
}

fn snapshot(books: &Books) -> Value {
    json!({
        "accounts": [books.cash, books.receivable, books.sales],
        "entries": books.entries,
    })
}

async fn post(uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_check_works() {
    let response = app()
        .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn validate_entry_accepts_balanced_entry() {
    let b = books();
    let body = json!({
        "entry": {
            "organization_id": OrganizationId::new(),
            "date": "2024-05-01",
            "description": "現金売上",
            "lines": [
                {"account_id": b.cash.id, "debit": "5000"},
                {"account_id": b.sales.id, "credit": "5000"},
            ],
        },
        "accounts": [b.cash, b.sales],
    });

    let (status, json) = post("/api/v1/journal-entries/validate", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["entry"]["status"], "draft");
    assert_eq!(json["data"]["totals"]["is_balanced"], true);
}

#[tokio::test]
async fn validate_entry_reports_field_errors() {
    let b = books();
    let body = json!({
        "entry": {
            "organization_id": OrganizationId::new(),
            "date": "2024-05-01",
            "description": "",
            "lines": [
                {"account_id": b.cash.id, "debit": "5000"},
                {"account_id": b.sales.id, "credit": "4000"},
            ],
        },
        "accounts": [b.cash, b.sales],
    });

    let (status, json) = post("/api/v1/journal-entries/validate", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "validation");
    assert!(json["error"]["fields"]["description"].is_array());
    assert!(json["error"]["fields"]["lines"].is_array());
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let (status, json) = post("/api/v1/journal-entries/validate", &json!({"entry": 42})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation");
    assert!(json["error"]["fields"]["body"].is_array());
}

#[tokio::test]
async fn transition_rejects_locked_period() {
    let b = books();
    let mut draft = b.entries[0].clone();
    draft.status = EntryStatus::Draft;
    let body = json!({
        "entry": draft,
        "to": "approved",
        "period_lock": {"locked_through": "2024-04-30"},
    });

    let (status, json) = post("/api/v1/journal-entries/transition", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"]["fields"]["date"].is_array());
}

#[tokio::test]
async fn running_balance_lists_rows() {
    let b = books();
    let mut body = snapshot(&b);
    body["account_id"] = json!(b.receivable.id);

    let (status, json) = post("/api/v1/ledger/running-balance", &body).await;

    assert_eq!(status, StatusCode::OK);
    let rows = json["data"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(json["data"]["closing_balance"], "50000");
}

#[tokio::test]
async fn running_balance_unknown_account_is_not_found() {
    let b = books();
    let mut body = snapshot(&b);
    body["account_id"] = json!(Account::new("9999", "不明", AccountType::Asset).id);

    let (status, json) = post("/api/v1/ledger/running-balance", &body).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn partner_balances_use_configured_codes() {
    let b = books();

    let (status, json) = post("/api/v1/partners/balances", &snapshot(&b)).await;

    assert_eq!(status, StatusCode::OK);
    let balances = json["data"].as_array().unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0]["partner_id"], json!(b.customer));
    assert_eq!(balances[0]["receivable"], "50000");
    assert_eq!(balances[0]["net"], "50000");
}

#[tokio::test]
async fn trial_balance_report_balances() {
    let b = books();

    let (status, json) = post("/api/v1/reports/trial-balance", &snapshot(&b)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["kind"], "trial-balance");
    assert_eq!(json["data"]["is_balanced"], true);
    assert_eq!(json["data"]["total_debit"], "170000");
    assert_eq!(json["data"]["currency"], "JPY");
}

#[tokio::test]
async fn unknown_report_kind_is_not_found() {
    let b = books();

    let (status, json) = post("/api/v1/reports/aging", &snapshot(&b)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn report_export_is_csv() {
    let b = books();
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/reports/balance-sheet/export")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(snapshot(&b).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("section,code,name,amount\n"));
}

#[tokio::test]
async fn import_analyze_flags_booked_rows() {
    let b = books();
    let body = json!({
        "csv": "日付,摘要,金額\n2024-04-25,入金 株式会社サンプル,60000\n2024-04-26,電気代,-8800\n2024-13-01,壊れた行,100\n",
        "rules": [
            {"pattern": "電気", "match_type": "contains", "debit_account_code": "5210",
             "credit_account_code": "1110", "confidence": "0.9"},
        ],
        "entries": b.entries,
    });

    let (status, json) = post("/api/v1/import/analyze", &body).await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["summary"]["total"], 2);
    assert_eq!(data["summary"]["errors"], 1);
    assert_eq!(data["rows"][0]["action"], "skip");
    assert_eq!(data["rows"][1]["action"], "import");
    assert_eq!(data["rows"][1]["suggestion"]["debit_account_code"], "1110");
    assert_eq!(data["rows"][1]["suggestion"]["credit_account_code"], "5210");
}

#[tokio::test]
async fn import_rejects_invalid_rule() {
    let body = json!({
        "csv": "日付,摘要,金額\n2024-04-25,入金,100\n",
        "rules": [
            {"pattern": "", "debit_account_code": "1110", "credit_account_code": "4110", "confidence": "0.5"},
        ],
    });

    let (status, json) = post("/api/v1/import/analyze", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"]["fields"]["rules[0].pattern"].is_array());
}

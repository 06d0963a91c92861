//! CSV export of reports.
//!
//! Each report kind has a fixed column layout: account rows first, then
//! summary rows in the same columns.

use csv::Writer;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    BalanceSheetReport, CashFlowReport, CashFlowSection, ProfitLossReport, Report, ReportSection,
    TrialBalanceReport,
};

/// Header of the balance sheet and profit and loss exports.
pub const STATEMENT_HEADER: [&str; 4] = ["section", "code", "name", "amount"];
/// Header of the trial balance export.
pub const TRIAL_BALANCE_HEADER: [&str; 6] = ["code", "name", "type", "debit", "credit", "balance"];
/// Header of the cash flow export.
pub const CASH_FLOW_HEADER: [&str; 3] = ["activity", "description", "amount"];

/// Renders any report as CSV text.
///
/// # Errors
///
/// Returns [`ReportError::Export`] if the CSV writer fails.
pub fn export_csv(report: &Report) -> Result<String, ReportError> {
    match report {
        Report::BalanceSheet(r) => balance_sheet_csv(r),
        Report::ProfitLoss(r) => profit_loss_csv(r),
        Report::TrialBalance(r) => trial_balance_csv(r),
        Report::CashFlow(r) => cash_flow_csv(r),
    }
}

/// Suggested download file name, e.g. `balance-sheet.csv`.
#[must_use]
pub fn file_name(report: &Report) -> String {
    format!("{}.csv", report.kind())
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, ReportError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Export(e.to_string()))
}

fn write_section(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    section: &ReportSection,
) -> Result<(), ReportError> {
    for line in &section.accounts {
        writer.write_record([name, line.code.as_str(), line.name.as_str(), line.amount.to_string().as_str()])?;
    }
    Ok(())
}

fn write_summary(writer: &mut Writer<Vec<u8>>, label: &str, amount: Decimal) -> Result<(), ReportError> {
    writer.write_record(["total", "", label, amount.to_string().as_str()])?;
    Ok(())
}

/// Balance sheet as `section,code,name,amount`.
pub fn balance_sheet_csv(report: &BalanceSheetReport) -> Result<String, ReportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(STATEMENT_HEADER)?;

    write_section(&mut writer, "assets.current", &report.assets.current)?;
    write_section(&mut writer, "assets.fixed", &report.assets.fixed)?;
    write_section(&mut writer, "liabilities.current", &report.liabilities.current)?;
    write_section(&mut writer, "liabilities.long_term", &report.liabilities.long_term)?;
    write_section(&mut writer, "equity.capital", &report.equity.capital)?;
    write_section(&mut writer, "equity.retained", &report.equity.retained)?;

    write_summary(&mut writer, "assets", report.assets.total)?;
    write_summary(&mut writer, "liabilities", report.liabilities.total)?;
    write_summary(&mut writer, "equity", report.equity.total)?;
    write_summary(&mut writer, "net_profit", report.net_profit)?;
    write_summary(&mut writer, "liabilities_and_equity", report.liabilities_and_equity)?;
    finish(writer)
}

/// Profit and loss as `section,code,name,amount`.
pub fn profit_loss_csv(report: &ProfitLossReport) -> Result<String, ReportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(STATEMENT_HEADER)?;

    write_section(&mut writer, "revenue.sales", &report.revenue.sales)?;
    write_section(&mut writer, "revenue.other", &report.revenue.other)?;
    write_section(&mut writer, "expenses.cost_of_sales", &report.expenses.cost_of_sales)?;
    write_section(&mut writer, "expenses.operating", &report.expenses.operating)?;
    write_section(&mut writer, "expenses.financial", &report.expenses.financial)?;
    write_section(&mut writer, "expenses.other", &report.expenses.other)?;

    write_summary(&mut writer, "revenue", report.revenue.total)?;
    write_summary(&mut writer, "expenses", report.expenses.total)?;
    write_summary(&mut writer, "gross_profit", report.gross_profit)?;
    write_summary(&mut writer, "operating_profit", report.operating_profit)?;
    write_summary(&mut writer, "net_profit", report.net_profit)?;
    finish(writer)
}

/// Trial balance as `code,name,type,debit,credit,balance`.
pub fn trial_balance_csv(report: &TrialBalanceReport) -> Result<String, ReportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(TRIAL_BALANCE_HEADER)?;

    for row in &report.rows {
        writer.write_record([
            row.code.as_str(),
            row.name.as_str(),
            row.account_type.as_str(),
            row.debit.to_string().as_str(),
            row.credit.to_string().as_str(),
            row.balance.to_string().as_str(),
        ])?;
    }
    writer.write_record([
        "total",
        "",
        "",
        report.total_debit.to_string().as_str(),
        report.total_credit.to_string().as_str(),
        "",
    ])?;
    finish(writer)
}

/// Cash flow as `activity,description,amount`.
pub fn cash_flow_csv(report: &CashFlowReport) -> Result<String, ReportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(CASH_FLOW_HEADER)?;

    let sections: [(&str, &CashFlowSection); 3] = [
        ("operating", &report.operating),
        ("investing", &report.investing),
        ("financing", &report.financing),
    ];
    for (activity, section) in sections {
        for item in &section.items {
            let description = format!("{} {}", item.code, item.name);
            writer.write_record([activity, description.as_str(), item.amount.to_string().as_str()])?;
        }
        writer.write_record([activity, "subtotal", section.total.to_string().as_str()])?;
    }
    writer.write_record(["summary", "opening_cash", report.opening_cash.to_string().as_str()])?;
    writer.write_record(["summary", "net_change", report.net_change.to_string().as_str()])?;
    writer.write_record(["summary", "closing_cash", report.closing_cash.to_string().as_str()])?;
    finish(writer)
}

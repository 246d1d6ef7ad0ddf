//! Budget statistics routes.
//!
//! Read-only endpoints over `StatisticsService`. Amounts and percentages are
//! sent as plain JSON numbers; `formatted=true` adds display strings.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use lexbudget_core::statistics::{
    CategoryOptions, CategoryReport, CategoryRow, Dimension, MonthSlot, MonthlyAggregate,
    MonthlyReport, Report,
};
use lexbudget_shared::{
    AppError, ValueKind,
    format::{format_count, format_currency, format_percentage, format_value},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{error_response, statistics_error};

/// Creates the statistics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/statistiques/budget", get(get_budget))
        .route("/statistiques/categories", get(get_categories))
        .route("/statistiques/rapport", get(get_report))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for the monthly budget table.
#[derive(Debug, Deserialize)]
pub struct BudgetQuery {
    /// Year (defaults to the current year).
    pub annee: Option<String>,
    /// Add display strings.
    #[serde(default)]
    pub formatted: bool,
}

/// Query parameters for a category breakdown.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesQuery {
    /// Year (defaults to the current year).
    pub annee: Option<String>,
    /// `payer` or `budgetLine` (defaults to `payer`).
    pub dimension: Option<String>,
    /// Include payment count and average.
    #[serde(default)]
    pub with_secondary_stats: bool,
    /// Add display strings.
    #[serde(default)]
    pub formatted: bool,
}

/// Query parameters for the composed report.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    /// Year (defaults to the current year).
    pub annee: Option<String>,
    /// Include payment count and average.
    #[serde(default)]
    pub with_secondary_stats: bool,
    /// Add display strings.
    #[serde(default)]
    pub formatted: bool,
}

// ============================================================================
// Response Types
// ============================================================================

/// Monthly budget table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReportResponse {
    /// January through December.
    pub engagements_mensuels: Vec<MonthlyAggregateResponse>,
    /// Grand total.
    pub total: MonthlyAggregateResponse,
    /// Annual budget, if configured.
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget_total: Option<Decimal>,
    /// Year.
    pub annee: i32,
}

/// One line of the monthly table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAggregateResponse {
    /// Month label.
    pub mois: String,
    /// Month number, absent on the total line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero: Option<u32>,
    /// Whether this is the total line.
    pub is_total: bool,
    /// Amount paid during the month.
    #[serde(with = "rust_decimal::serde::float")]
    pub gross_amount: Decimal,
    /// Amount paid since January.
    #[serde(with = "rust_decimal::serde::float")]
    pub cumulative_amount: Decimal,
    /// Gross amount as % of budget.
    #[serde(with = "rust_decimal::serde::float")]
    pub gross_percentage: Decimal,
    /// Cumulative amount as % of budget.
    #[serde(with = "rust_decimal::serde::float")]
    pub cumulative_percentage: Decimal,
    /// Cumulative amount plus 10%.
    #[serde(with = "rust_decimal::serde::float")]
    pub forecast10: Decimal,
    /// Cumulative amount plus 20%.
    #[serde(with = "rust_decimal::serde::float")]
    pub forecast20: Decimal,
    /// +10% forecast as % of budget.
    #[serde(with = "rust_decimal::serde::float")]
    pub forecast10_percentage: Decimal,
    /// +20% forecast as % of budget.
    #[serde(with = "rust_decimal::serde::float")]
    pub forecast20_percentage: Decimal,
    /// Display strings, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<MonthlyDisplay>,
}

/// Display strings of a monthly line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyDisplay {
    /// Formatted gross amount.
    pub gross_amount: String,
    /// Formatted cumulative amount.
    pub cumulative_amount: String,
    /// Formatted gross percentage.
    pub gross_percentage: String,
    /// Formatted cumulative percentage.
    pub cumulative_percentage: String,
    /// Formatted +10% forecast.
    pub forecast10: String,
    /// Formatted +20% forecast.
    pub forecast20: String,
    /// Formatted +10% forecast percentage.
    pub forecast10_percentage: String,
    /// Formatted +20% forecast percentage.
    pub forecast20_percentage: String,
}

/// Category breakdown.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReportResponse {
    /// Grouping dimension.
    pub dimension: Dimension,
    /// Category rows, terminated by the total row.
    pub statistiques: Vec<CategoryAggregateResponse>,
    /// Annual budget, if configured.
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget_total: Option<Decimal>,
}

/// One category row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAggregateResponse {
    /// Category key (payer ID or budget-line code).
    pub key: String,
    /// Category label.
    pub label: String,
    /// Total amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Amount as % of budget.
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
    /// Display kind.
    pub kind: ValueKind,
    /// Render in bold.
    pub emphasis: bool,
    /// Whether this is the total row.
    pub is_total: bool,
    /// Number of payments, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_count: Option<u64>,
    /// Average payment, when requested.
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub average_amount: Option<Decimal>,
    /// Display strings, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<CategoryDisplay>,
}

/// Display strings of a category row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDisplay {
    /// Amount, with percentage when a budget exists.
    pub value: String,
    /// Formatted payment count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_count: Option<String>,
    /// Formatted average payment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_amount: Option<String>,
}

/// Composed report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    /// Year.
    pub annee: i32,
    /// Annual budget, if configured.
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget_total: Option<Decimal>,
    /// Monthly table, terminated by the total line.
    pub engagements_mensuels: Vec<MonthlyAggregateResponse>,
    /// One breakdown per dimension.
    pub categories: Vec<CategoryReportResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /statistiques/budget
async fn get_budget(State(state): State<AppState>, Query(query): Query<BudgetQuery>) -> Response {
    let year = match state.statistics.resolve_year(query.annee.as_deref()) {
        Ok(year) => year,
        Err(e) => return error_response(&statistics_error(e)),
    };

    match state.statistics.compute_monthly_report(year).await {
        Ok(report) => Json(monthly_report_to_response(&report, query.formatted)).into_response(),
        Err(e) => error_response(&statistics_error(e)),
    }
}

/// GET /statistiques/categories
async fn get_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoriesQuery>,
) -> Response {
    let year = match state.statistics.resolve_year(query.annee.as_deref()) {
        Ok(year) => year,
        Err(e) => return error_response(&statistics_error(e)),
    };

    let dimension = match query.dimension.as_deref().map(str::parse::<Dimension>) {
        None => Dimension::Payer,
        Some(Ok(dimension)) => dimension,
        Some(Err(message)) => return error_response(&AppError::Validation(message)),
    };

    let options = CategoryOptions {
        with_secondary_stats: query.with_secondary_stats,
    };

    match state
        .statistics
        .compute_category_report(year, dimension, options)
        .await
    {
        Ok(report) => Json(category_report_to_response(&report, query.formatted)).into_response(),
        Err(e) => error_response(&statistics_error(e)),
    }
}

/// GET /statistiques/rapport
async fn get_report(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Response {
    let year = match state.statistics.resolve_year(query.annee.as_deref()) {
        Ok(year) => year,
        Err(e) => return error_response(&statistics_error(e)),
    };

    let options = CategoryOptions {
        with_secondary_stats: query.with_secondary_stats,
    };

    match state
        .statistics
        .compute_report(year, &Dimension::ALL, options)
        .await
    {
        Ok(report) => Json(report_to_response(&report, query.formatted)).into_response(),
        Err(e) => error_response(&statistics_error(e)),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn monthly_report_to_response(report: &MonthlyReport, formatted: bool) -> MonthlyReportResponse {
    MonthlyReportResponse {
        engagements_mensuels: report
            .months
            .iter()
            .map(|m| monthly_to_response(m, formatted))
            .collect(),
        total: monthly_to_response(&report.total, formatted),
        budget_total: report.annual_budget,
        annee: report.year,
    }
}

fn monthly_to_response(line: &MonthlyAggregate, formatted: bool) -> MonthlyAggregateResponse {
    let numero = match line.slot {
        MonthSlot::Month(month) => Some(month),
        MonthSlot::Total => None,
    };

    MonthlyAggregateResponse {
        mois: line.label.clone(),
        numero,
        is_total: numero.is_none(),
        gross_amount: line.gross_amount,
        cumulative_amount: line.cumulative_amount,
        gross_percentage: line.gross_percentage,
        cumulative_percentage: line.cumulative_percentage,
        forecast10: line.forecast_10,
        forecast20: line.forecast_20,
        forecast10_percentage: line.forecast_10_percentage,
        forecast20_percentage: line.forecast_20_percentage,
        display: formatted.then(|| MonthlyDisplay {
            gross_amount: format_currency(line.gross_amount),
            cumulative_amount: format_currency(line.cumulative_amount),
            gross_percentage: format_percentage(line.gross_percentage),
            cumulative_percentage: format_percentage(line.cumulative_percentage),
            forecast10: format_currency(line.forecast_10),
            forecast20: format_currency(line.forecast_20),
            forecast10_percentage: format_percentage(line.forecast_10_percentage),
            forecast20_percentage: format_percentage(line.forecast_20_percentage),
        }),
    }
}

fn category_report_to_response(report: &CategoryReport, formatted: bool) -> CategoryReportResponse {
    CategoryReportResponse {
        dimension: report.dimension,
        statistiques: report
            .rows
            .iter()
            .map(|row| category_to_response(row, formatted))
            .collect(),
        budget_total: report.annual_budget,
    }
}

fn category_to_response(row: &CategoryRow, formatted: bool) -> CategoryAggregateResponse {
    let aggregate = row.aggregate();
    let secondary = aggregate.secondary.as_ref();

    CategoryAggregateResponse {
        key: aggregate.key.clone(),
        label: aggregate.label.clone(),
        amount: aggregate.amount,
        percentage: aggregate.percentage,
        kind: aggregate.kind,
        emphasis: aggregate.emphasis,
        is_total: row.is_total(),
        payment_count: secondary.map(|s| s.payment_count),
        average_amount: secondary.map(|s| s.average_amount),
        display: formatted.then(|| CategoryDisplay {
            value: format_value(aggregate.kind, aggregate.amount, aggregate.percentage),
            payment_count: secondary.map(|s| format_count(s.payment_count)),
            average_amount: secondary.map(|s| format_currency(s.average_amount)),
        }),
    }
}

fn report_to_response(report: &Report, formatted: bool) -> ReportResponse {
    ReportResponse {
        annee: report.year,
        budget_total: report.annual_budget,
        engagements_mensuels: report
            .monthly
            .months
            .iter()
            .chain(std::iter::once(&report.monthly.total))
            .map(|m| monthly_to_response(m, formatted))
            .collect(),
        categories: report
            .categories
            .iter()
            .map(|c| category_report_to_response(c, formatted))
            .collect(),
    }
}

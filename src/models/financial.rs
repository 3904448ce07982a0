// src/models/financial.rs
//
// Lançamentos financeiros (receitas e despesas) e o relatório mensal.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::common::validation::positive_amount;
use crate::models::payment::PaymentMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "financial_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FinancialType {
    Receita,
    Despesa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "financial_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FinancialCategory {
    // Receitas
    Vendas,
    Servicos,
    OutrasReceitas,
    // Despesas
    Salarios,
    Energia,
    Agua,
    Aluguel,
    Fornecedores,
    Impostos,
    Combustivel,
    Manutencao,
    OutrasDespesas,
}

impl FinancialCategory {
    pub fn financial_type(self) -> FinancialType {
        match self {
            FinancialCategory::Vendas
            | FinancialCategory::Servicos
            | FinancialCategory::OutrasReceitas => FinancialType::Receita,
            _ => FinancialType::Despesa,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "financial_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FinancialStatus {
    Pendente,
    Pago,
    Recebido,
    Cancelado,
}

impl FinancialStatus {
    /// Sem status informado: receita entra como recebida, despesa como paga.
    pub fn default_for(kind: FinancialType) -> Self {
        match kind {
            FinancialType::Receita => FinancialStatus::Recebido,
            FinancialType::Despesa => FinancialStatus::Pago,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "recurrence_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    Mensal,
    Bimestral,
    Trimestral,
    Semestral,
    Anual,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Financial {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: FinancialType,
    pub category: FinancialCategory,
    pub description: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub status: FinancialStatus,
    pub payment_method: Option<PaymentMethod>,
    pub employee_id: Option<Uuid>,
    pub sale_id: Option<Uuid>,
    pub invoice_id: Option<Uuid>,
    pub supplier: Option<String>,
    pub document: Option<String>,
    pub is_recurring: bool,
    pub recurrence_type: Option<RecurrenceType>,
    pub notes: Option<String>,

    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Financial {
    /// Regras que valem após criação ou merge de um PUT.
    pub fn check_consistency(&self) -> Result<(), AppError> {
        if self.category.financial_type() != self.kind {
            return Err(AppError::invalid(
                "category",
                "Categoria não pertence ao tipo do lançamento",
            ));
        }
        if self.is_recurring && self.recurrence_type.is_none() {
            return Err(AppError::invalid(
                "recurrenceType",
                "Tipo de recorrência é obrigatório para lançamentos recorrentes",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFinancialPayload {
    #[serde(rename = "type")]
    pub kind: FinancialType,

    pub category: FinancialCategory,

    #[validate(length(min = 3, max = 200, message = "Descrição deve ter entre 3 e 200 caracteres"))]
    pub description: String,

    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,

    pub date: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,

    /// Sem valor: padrão pelo tipo (ver `FinancialStatus::default_for`).
    pub status: Option<FinancialStatus>,

    pub payment_method: Option<PaymentMethod>,
    pub employee_id: Option<Uuid>,
    pub sale_id: Option<Uuid>,
    pub invoice_id: Option<Uuid>,

    #[validate(length(max = 100, message = "Fornecedor deve ter no máximo 100 caracteres"))]
    pub supplier: Option<String>,

    pub document: Option<String>,

    #[serde(default)]
    pub is_recurring: bool,

    pub recurrence_type: Option<RecurrenceType>,

    #[validate(length(max = 500, message = "Notas devem ter no máximo 500 caracteres"))]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFinancialPayload {
    #[serde(rename = "type")]
    pub kind: Option<FinancialType>,

    pub category: Option<FinancialCategory>,

    #[validate(length(min = 3, max = 200, message = "Descrição deve ter entre 3 e 200 caracteres"))]
    pub description: Option<String>,

    #[validate(custom(function = "positive_amount"))]
    pub amount: Option<Decimal>,

    pub date: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<FinancialStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub employee_id: Option<Uuid>,
    pub sale_id: Option<Uuid>,
    pub invoice_id: Option<Uuid>,

    #[validate(length(max = 100, message = "Fornecedor deve ter no máximo 100 caracteres"))]
    pub supplier: Option<String>,

    pub document: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurrence_type: Option<RecurrenceType>,

    #[validate(length(max = 500, message = "Notas devem ter no máximo 500 caracteres"))]
    pub notes: Option<String>,
}

impl UpdateFinancialPayload {
    pub fn apply(self, entry: &mut Financial) {
        if let Some(v) = self.kind {
            entry.kind = v;
        }
        if let Some(v) = self.category {
            entry.category = v;
        }
        if let Some(v) = self.description {
            entry.description = v;
        }
        if let Some(v) = self.amount {
            entry.amount = v;
        }
        if let Some(v) = self.date {
            entry.date = v;
        }
        if self.due_date.is_some() {
            entry.due_date = self.due_date;
        }
        if let Some(v) = self.status {
            entry.status = v;
        }
        if self.payment_method.is_some() {
            entry.payment_method = self.payment_method;
        }
        if self.employee_id.is_some() {
            entry.employee_id = self.employee_id;
        }
        if self.sale_id.is_some() {
            entry.sale_id = self.sale_id;
        }
        if self.invoice_id.is_some() {
            entry.invoice_id = self.invoice_id;
        }
        if self.supplier.is_some() {
            entry.supplier = self.supplier;
        }
        if self.document.is_some() {
            entry.document = self.document;
        }
        if let Some(v) = self.is_recurring {
            entry.is_recurring = v;
        }
        if self.recurrence_type.is_some() {
            entry.recurrence_type = self.recurrence_type;
        }
        if self.notes.is_some() {
            entry.notes = self.notes;
        }
    }
}

// =============================================================================
//  RELATÓRIO MENSAL
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: FinancialCategory,
    pub total: Decimal,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeTotal {
    #[serde(rename = "type")]
    pub kind: FinancialType,
    pub categories: Vec<CategoryTotal>,
    pub total_by_type: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub types: Vec<TypeTotal>,
    pub total_receitas: Decimal,
    pub total_despesas: Decimal,
    pub balance: Decimal,
}

impl MonthlyReport {
    /// Agrupa os lançamentos do mês por tipo e categoria.
    pub fn build(year: i32, month: u32, entries: &[Financial]) -> Self {
        let mut grouped: BTreeMap<FinancialType, BTreeMap<FinancialCategory, (Decimal, i64)>> =
            BTreeMap::new();

        for entry in entries {
            let slot = grouped
                .entry(entry.kind)
                .or_default()
                .entry(entry.category)
                .or_insert((Decimal::ZERO, 0));
            slot.0 += entry.amount;
            slot.1 += 1;
        }

        let types: Vec<TypeTotal> = grouped
            .into_iter()
            .map(|(kind, categories)| {
                let categories: Vec<CategoryTotal> = categories
                    .into_iter()
                    .map(|(category, (total, count))| CategoryTotal { category, total, count })
                    .collect();
                let total_by_type = categories.iter().map(|c| c.total).sum();
                TypeTotal {
                    kind,
                    categories,
                    total_by_type,
                }
            })
            .collect();

        let total_of = |kind: FinancialType| {
            types
                .iter()
                .find(|t| t.kind == kind)
                .map(|t| t.total_by_type)
                .unwrap_or(Decimal::ZERO)
        };
        let total_receitas = total_of(FinancialType::Receita);
        let total_despesas = total_of(FinancialType::Despesa);

        Self {
            year,
            month,
            types,
            total_receitas,
            total_despesas,
            balance: total_receitas - total_despesas,
        }
    }
}

/// Intervalo [início do mês, início do mês seguinte) em UTC.
pub fn month_bounds(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::invalid("month", "Mês deve estar entre 1 e 12"));
    }
    let (next_year, next_month) = if month == 12 {
        let next = year
            .checked_add(1)
            .ok_or_else(|| AppError::invalid("year", "Ano inválido"))?;
        (next, 1)
    } else {
        (year, month + 1)
    };

    let start = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single();
    let end = Utc.with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0).single();
    match (start, end) {
        (Some(s), Some(e)) => Ok((s, e)),
        _ => Err(AppError::invalid("year", "Ano inválido")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: FinancialType, category: FinancialCategory, amount: i64) -> Financial {
        let now = Utc::now();
        Financial {
            id: Uuid::new_v4(),
            kind,
            category,
            description: "Lançamento".into(),
            amount: Decimal::new(amount, 2),
            date: now,
            due_date: None,
            status: FinancialStatus::default_for(kind),
            payment_method: None,
            employee_id: None,
            sale_id: None,
            invoice_id: None,
            supplier: None,
            document: None,
            is_recurring: false,
            recurrence_type: None,
            notes: None,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn default_status_depends_on_type() {
        assert_eq!(FinancialStatus::default_for(FinancialType::Receita), FinancialStatus::Recebido);
        assert_eq!(FinancialStatus::default_for(FinancialType::Despesa), FinancialStatus::Pago);
    }

    #[test]
    fn category_must_match_type() {
        let ok = entry(FinancialType::Despesa, FinancialCategory::Energia, 100);
        assert!(ok.check_consistency().is_ok());

        let bad = entry(FinancialType::Receita, FinancialCategory::Aluguel, 100);
        assert!(bad.check_consistency().is_err());
    }

    #[test]
    fn recurring_requires_recurrence_type() {
        let mut e = entry(FinancialType::Despesa, FinancialCategory::Aluguel, 150000);
        e.is_recurring = true;
        assert!(e.check_consistency().is_err());
        e.recurrence_type = Some(RecurrenceType::Mensal);
        assert!(e.check_consistency().is_ok());
    }

    #[test]
    fn report_groups_by_type_and_category() {
        let entries = vec![
            entry(FinancialType::Receita, FinancialCategory::Servicos, 30000),
            entry(FinancialType::Receita, FinancialCategory::Servicos, 20000),
            entry(FinancialType::Receita, FinancialCategory::Vendas, 10000),
            entry(FinancialType::Despesa, FinancialCategory::Energia, 45000),
        ];
        let report = MonthlyReport::build(2024, 3, &entries);

        assert_eq!(report.types.len(), 2);
        let receitas = &report.types[0];
        assert_eq!(receitas.kind, FinancialType::Receita);
        assert_eq!(receitas.total_by_type, Decimal::new(60000, 2));
        let servicos = receitas
            .categories
            .iter()
            .find(|c| c.category == FinancialCategory::Servicos)
            .unwrap();
        assert_eq!((servicos.total, servicos.count), (Decimal::new(50000, 2), 2));

        assert_eq!(report.total_despesas, Decimal::new(45000, 2));
        assert_eq!(report.balance, Decimal::new(15000, 2));
    }

    #[test]
    fn empty_month_has_zero_balance() {
        let report = MonthlyReport::build(2024, 1, &[]);
        assert!(report.types.is_empty());
        assert_eq!(report.balance, Decimal::ZERO);
    }

    #[test]
    fn month_bounds_wrap_december() {
        let (start, end) = month_bounds(2024, 12).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-12-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert!(month_bounds(2024, 13).is_err());
        assert!(month_bounds(2024, 0).is_err());
    }

    #[test]
    fn month_bounds_reject_years_out_of_range() {
        assert!(month_bounds(i32::MAX, 12).is_err());
        assert!(month_bounds(i32::MAX, 1).is_err());
        assert!(month_bounds(i32::MIN, 1).is_err());
    }

    #[test]
    fn categories_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&FinancialCategory::OutrasDespesas).unwrap(),
            "\"outras_despesas\""
        );
    }
}

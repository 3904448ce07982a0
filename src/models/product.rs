// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::common::validation::{non_negative_amount, positive_amount, URL_RE};
use crate::models::employee::default_true;

// Mapeia o CREATE TYPE product_category do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "product_category")]
pub enum ProductCategory {
    #[sqlx(rename = "Óleo")]
    #[serde(rename = "Óleo")]
    Oleo,
    Filtro,
    Pneu,
    Bateria,
    #[sqlx(rename = "Peças")]
    #[serde(rename = "Peças")]
    Pecas,
    #[sqlx(rename = "Acessórios")]
    #[serde(rename = "Acessórios")]
    Acessorios,
    Ferramentas,
    Outros,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Entrada,
    Saida,
    Ajuste,
}

/// Entrada do histórico de estoque (coluna JSONB `movements`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    #[serde(rename = "type")]
    pub kind: MovementType,
    pub quantity: i32,
    pub reason: String,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub employee_id: Option<Uuid>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub brand: String,
    pub category: ProductCategory,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub cost_price: Option<Decimal>,
    pub min_stock: i32,
    pub max_stock: i32,
    pub supplier: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    #[sqlx(json)]
    pub movements: Vec<StockMovement>,

    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Aplica uma movimentação de estoque e registra no histórico.
    /// `entrada` soma, `saida` subtrai e `ajuste` define o saldo absoluto.
    pub fn add_movement(
        &mut self,
        kind: MovementType,
        quantity: i32,
        reason: String,
        employee_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<&StockMovement, AppError> {
        let previous_stock = self.quantity;
        let amount = quantity
            .checked_abs()
            .ok_or_else(|| AppError::invalid("quantity", "Quantidade inválida"))?;
        let new_stock = match kind {
            MovementType::Entrada => previous_stock
                .checked_add(amount)
                .filter(|v| *v <= MAX_STOCK)
                .ok_or_else(|| AppError::invalid("quantity", "Estoque excede o limite permitido"))?,
            MovementType::Saida => previous_stock
                .checked_sub(amount)
                .filter(|v| *v >= 0)
                .ok_or_else(|| AppError::invalid("quantity", "Estoque insuficiente"))?,
            MovementType::Ajuste if quantity < 0 => {
                return Err(AppError::invalid("quantity", "Estoque insuficiente"));
            }
            MovementType::Ajuste => quantity,
        };

        self.quantity = new_stock;
        self.movements.push(StockMovement {
            kind,
            quantity: amount,
            reason,
            previous_stock,
            new_stock,
            employee_id,
            date: now,
        });

        Ok(&self.movements[self.movements.len() - 1])
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }

    /// Regra de consistência do cadastro (vale após o merge de um PUT).
    pub fn check_stock_bounds(&self) -> Result<(), AppError> {
        if self.max_stock < self.min_stock {
            return Err(AppError::invalid(
                "maxStock",
                "Estoque máximo deve ser maior que o mínimo",
            ));
        }
        Ok(())
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn default_min_stock() -> i32 {
    5
}

fn default_max_stock() -> i32 {
    1000
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, max = 50, message = "Código é obrigatório"))]
    pub code: String,

    #[validate(length(min = 2, max = 100, message = "Nome deve ter entre 2 e 100 caracteres"))]
    pub name: String,

    #[validate(length(min = 2, max = 50, message = "Marca deve ter entre 2 e 50 caracteres"))]
    pub brand: String,

    pub category: ProductCategory,

    #[validate(range(min = 0, max = 1_000_000_000, message = "Quantidade deve estar entre 0 e 1.000.000.000"))]
    #[serde(default)]
    pub quantity: i32,

    #[validate(custom(function = "positive_amount"))]
    pub unit_price: Decimal,

    #[validate(custom(function = "non_negative_amount"))]
    pub cost_price: Option<Decimal>,

    #[validate(range(min = 0, message = "Estoque mínimo não pode ser negativo"))]
    #[serde(default = "default_min_stock")]
    pub min_stock: i32,

    #[validate(range(min = 0, message = "Estoque máximo não pode ser negativo"))]
    #[serde(default = "default_max_stock")]
    pub max_stock: i32,

    #[validate(length(max = 100, message = "Fornecedor deve ter no máximo 100 caracteres"))]
    pub supplier: Option<String>,

    #[validate(length(max = 500, message = "Descrição deve ter no máximo 500 caracteres"))]
    pub description: Option<String>,

    #[validate(regex(path = *URL_RE, message = "URL da imagem inválida"))]
    pub image: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

// Estoque não é alterado por PUT: use as movimentações.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, max = 50, message = "Código é obrigatório"))]
    pub code: Option<String>,

    #[validate(length(min = 2, max = 100, message = "Nome deve ter entre 2 e 100 caracteres"))]
    pub name: Option<String>,

    #[validate(length(min = 2, max = 50, message = "Marca deve ter entre 2 e 50 caracteres"))]
    pub brand: Option<String>,

    pub category: Option<ProductCategory>,

    #[validate(custom(function = "positive_amount"))]
    pub unit_price: Option<Decimal>,

    #[validate(custom(function = "non_negative_amount"))]
    pub cost_price: Option<Decimal>,

    #[validate(range(min = 0, message = "Estoque mínimo não pode ser negativo"))]
    pub min_stock: Option<i32>,

    #[validate(range(min = 0, message = "Estoque máximo não pode ser negativo"))]
    pub max_stock: Option<i32>,

    #[validate(length(max = 100, message = "Fornecedor deve ter no máximo 100 caracteres"))]
    pub supplier: Option<String>,

    #[validate(length(max = 500, message = "Descrição deve ter no máximo 500 caracteres"))]
    pub description: Option<String>,

    #[validate(regex(path = *URL_RE, message = "URL da imagem inválida"))]
    pub image: Option<String>,

    pub is_active: Option<bool>,
}

impl UpdateProductPayload {
    pub fn apply(self, product: &mut Product) {
        if let Some(v) = self.code {
            product.code = normalize_code(&v);
        }
        if let Some(v) = self.name {
            product.name = v;
        }
        if let Some(v) = self.brand {
            product.brand = v;
        }
        if let Some(v) = self.category {
            product.category = v;
        }
        if let Some(v) = self.unit_price {
            product.unit_price = v;
        }
        if self.cost_price.is_some() {
            product.cost_price = self.cost_price;
        }
        if let Some(v) = self.min_stock {
            product.min_stock = v;
        }
        if let Some(v) = self.max_stock {
            product.max_stock = v;
        }
        if self.supplier.is_some() {
            product.supplier = self.supplier;
        }
        if self.description.is_some() {
            product.description = self.description;
        }
        if self.image.is_some() {
            product.image = self.image;
        }
        if let Some(v) = self.is_active {
            product.is_active = v;
        }
    }
}

/// Teto de saldo e de quantidade movimentada.
pub const MAX_STOCK: i32 = 1_000_000_000;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementPayload {
    #[serde(rename = "type")]
    pub kind: MovementType,

    #[validate(range(min = 0, max = 1_000_000_000, message = "Quantidade deve estar entre 0 e 1.000.000.000"))]
    pub quantity: i32,

    #[validate(length(min = 1, max = 200, message = "Motivo deve ter entre 1 e 200 caracteres"))]
    pub reason: String,

    pub employee_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: i32) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            code: "OLEO-5W30".into(),
            name: "Óleo 5W30".into(),
            brand: "Lubrax".into(),
            category: ProductCategory::Oleo,
            quantity,
            unit_price: Decimal::new(4590, 2),
            cost_price: None,
            min_stock: 5,
            max_stock: 1000,
            supplier: None,
            description: None,
            image: None,
            is_active: true,
            movements: Vec::new(),
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn entrada_and_saida_move_stock() {
        let mut p = product(10);
        p.add_movement(MovementType::Entrada, 5, "Compra".into(), None, Utc::now()).unwrap();
        assert_eq!(p.quantity, 15);

        let m = p
            .add_movement(MovementType::Saida, -3, "Venda balcão".into(), None, Utc::now())
            .unwrap()
            .clone();
        assert_eq!(p.quantity, 12);
        assert_eq!(m.quantity, 3);
        assert_eq!((m.previous_stock, m.new_stock), (15, 12));
        assert_eq!(p.movements.len(), 2);
    }

    #[test]
    fn ajuste_sets_absolute_stock() {
        let mut p = product(10);
        p.add_movement(MovementType::Ajuste, 4, "Inventário".into(), None, Utc::now()).unwrap();
        assert_eq!(p.quantity, 4);
    }

    #[test]
    fn saida_cannot_go_negative() {
        let mut p = product(2);
        let err = p
            .add_movement(MovementType::Saida, 3, "Venda".into(), None, Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(p.quantity, 2);
        assert!(p.movements.is_empty());
    }

    #[test]
    fn entrada_near_the_limit_is_rejected_without_overflow() {
        let mut p = product(i32::MAX - 1);
        let err = p
            .add_movement(MovementType::Entrada, 10, "Compra".into(), None, Utc::now())
            .unwrap_err();
        match err {
            AppError::ValidationError(fields) => {
                assert_eq!(fields[0].field, "quantity");
                assert_eq!(fields[0].message, "Estoque excede o limite permitido");
            }
            other => panic!("erro inesperado: {other:?}"),
        }
        assert_eq!(p.quantity, i32::MAX - 1);
        assert!(p.movements.is_empty());
    }

    #[test]
    fn saida_with_extreme_quantity_does_not_panic() {
        let mut p = product(5);
        assert!(p.add_movement(MovementType::Saida, i32::MIN, "Venda".into(), None, Utc::now()).is_err());
        assert!(p.add_movement(MovementType::Saida, i32::MAX, "Venda".into(), None, Utc::now()).is_err());
        assert_eq!(p.quantity, 5);
    }

    #[test]
    fn movement_quantity_is_capped() {
        let payload: StockMovementPayload = serde_json::from_value(serde_json::json!({
            "type": "entrada",
            "quantity": i32::MAX,
            "reason": "Compra"
        }))
        .unwrap();
        assert!(payload.validate().unwrap_err().field_errors().contains_key("quantity"));
    }

    #[test]
    fn max_stock_below_min_is_rejected() {
        let mut p = product(0);
        p.max_stock = 3;
        assert!(p.check_stock_bounds().is_err());
        assert!(p.is_low_stock());
    }

    #[test]
    fn movement_serializes_type_field() {
        let mut p = product(1);
        p.add_movement(MovementType::Entrada, 1, "Compra".into(), None, Utc::now()).unwrap();
        let json = serde_json::to_value(&p.movements[0]).unwrap();
        assert_eq!(json["type"], "entrada");
        assert_eq!(json["newStock"], 2);
    }
}

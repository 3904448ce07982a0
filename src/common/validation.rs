// src/common/validation.rs
//
// Regras de validação compartilhadas pelos payloads (usadas via `validator`).

use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use validator::ValidationError;

use crate::common::error::AppError;

pub static CPF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$").unwrap());

pub static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s\-()+]{10,15}$").unwrap());

// ABC-1234, ABC1234 ou Mercosul ABC1D23
pub static PLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{3}-?\d{4}$|^[A-Za-z]{3}\d[A-Za-z]\d{2}$").unwrap());

pub static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

pub static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://\S+$").unwrap());

/// Maior valor que cabe em `NUMERIC(12,2)`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

fn amount_error(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("range");
    err.message = Some(message.into());
    err
}

// Valores monetários são gravados com 2 casas; mais que isso mudaria o total
// depois de arredondado pelo banco.
fn storable_amount(val: &Decimal) -> Result<(), ValidationError> {
    if val.normalize().scale() > 2 {
        return Err(amount_error("O valor deve ter no máximo 2 casas decimais."));
    }
    if *val > MAX_AMOUNT {
        return Err(amount_error("O valor excede o limite de 9.999.999.999,99."));
    }
    Ok(())
}

pub fn positive_amount(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        return Err(amount_error("O valor deve ser maior que zero."));
    }
    storable_amount(val)
}

pub fn non_negative_amount(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = amount_error("O valor não pode ser negativo.");
        err.add_param("min".into(), &0.0);
        return Err(err);
    }
    storable_amount(val)
}

/// Mínimo de 6 caracteres com ao menos uma minúscula, uma maiúscula e um número.
pub fn strong_password(val: &str) -> Result<(), ValidationError> {
    let long_enough = val.chars().count() >= 6;
    let has_lower = val.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = val.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = val.chars().any(|c| c.is_ascii_digit());

    if !(long_enough && has_lower && has_upper && has_digit) {
        let mut err = ValidationError::new("password");
        err.message = Some(
            "A senha deve ter no mínimo 6 caracteres, com ao menos uma letra minúscula, uma maiúscula e um número."
                .into(),
        );
        return Err(err);
    }
    Ok(())
}

pub fn vehicle_year(val: i32) -> Result<(), ValidationError> {
    let max = Utc::now().year() + 1;
    if !(1900..=max).contains(&val) {
        let mut err = ValidationError::new("range");
        err.message = Some(format!("Ano deve estar entre 1900 e {max}").into());
        return Err(err);
    }
    Ok(())
}

/// Converte um rótulo vindo da URL ("Em Andamento", "Mecânico") no enum
/// correspondente, usando os mesmos nomes do JSON.
pub fn parse_label<T: DeserializeOwned>(field: &str, raw: &str) -> Result<T, AppError> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| AppError::invalid(field, format!("Valor inválido: '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_from_path() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        enum Fuel {
            Flex,
            #[serde(rename = "Elétrico")]
            Eletrico,
        }
        assert_eq!(parse_label::<Fuel>("fuelType", "Elétrico").unwrap(), Fuel::Eletrico);
        assert!(parse_label::<Fuel>("fuelType", "Vapor").is_err());
    }

    #[test]
    fn plates_accept_old_and_mercosul_formats() {
        assert!(PLATE_RE.is_match("ABC-1234"));
        assert!(PLATE_RE.is_match("ABC1234"));
        assert!(PLATE_RE.is_match("ABC1D23"));
        assert!(!PLATE_RE.is_match("AB-12345"));
        assert!(!PLATE_RE.is_match("ABCD123"));
    }

    #[test]
    fn cpf_requires_punctuation() {
        assert!(CPF_RE.is_match("123.456.789-09"));
        assert!(!CPF_RE.is_match("12345678909"));
    }

    #[test]
    fn phone_accepts_common_formats() {
        assert!(PHONE_RE.is_match("(11) 98765-4321"));
        assert!(PHONE_RE.is_match("+5511987654321"));
        assert!(!PHONE_RE.is_match("123"));
    }

    #[test]
    fn password_policy() {
        assert!(strong_password("Senha1").is_ok());
        assert!(strong_password("senha1").is_err());
        assert!(strong_password("SENHA1").is_err());
        assert!(strong_password("Senhaa").is_err());
        assert!(strong_password("Se1").is_err());
    }

    #[test]
    fn amounts() {
        assert!(positive_amount(&Decimal::new(1, 2)).is_ok());
        assert!(positive_amount(&Decimal::ZERO).is_err());
        assert!(non_negative_amount(&Decimal::ZERO).is_ok());
        assert!(non_negative_amount(&Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn amounts_must_fit_the_money_columns() {
        assert_eq!(MAX_AMOUNT.to_string(), "9999999999.99");
        assert!(positive_amount(&MAX_AMOUNT).is_ok());
        assert!(positive_amount(&(MAX_AMOUNT + Decimal::new(1, 2))).is_err());
        assert!(positive_amount(&Decimal::MAX).is_err());
        assert!(non_negative_amount(&Decimal::MAX).is_err());
    }

    #[test]
    fn amounts_keep_at_most_two_decimal_places() {
        assert!(positive_amount(&Decimal::new(333, 3)).is_err());
        assert!(non_negative_amount(&Decimal::new(1, 3)).is_err());
        // zeros à direita não contam
        assert!(positive_amount(&Decimal::new(1000, 3)).is_ok());
        assert!(positive_amount(&Decimal::new(33, 2)).is_ok());
    }

    #[test]
    fn year_bounds() {
        let next = Utc::now().year() + 1;
        assert!(vehicle_year(1900).is_ok());
        assert!(vehicle_year(next).is_ok());
        assert!(vehicle_year(1899).is_err());
        assert!(vehicle_year(next + 1).is_err());
    }
}

// src/models/vehicle.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{vehicle_year, PLATE_RE};
use crate::models::employee::default_true;

// Mapeia o CREATE TYPE fuel_type do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "fuel_type")]
pub enum FuelType {
    Gasolina,
    Etanol,
    #[default]
    Flex,
    Diesel,
    #[sqlx(rename = "GNV")]
    #[serde(rename = "GNV")]
    Gnv,
    #[sqlx(rename = "Elétrico")]
    #[serde(rename = "Elétrico")]
    Eletrico,
    #[sqlx(rename = "Híbrido")]
    #[serde(rename = "Híbrido")]
    Hibrido,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub color: Option<String>,
    pub engine_size: Option<String>,
    pub fuel_type: FuelType,
    pub client_id: Uuid,
    pub annotations: Option<String>,
    pub is_active: bool,

    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Placas são gravadas sempre em maiúsculas.
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehiclePayload {
    #[validate(length(min = 2, max = 50, message = "Marca deve ter entre 2 e 50 caracteres"))]
    pub make: String,

    #[validate(length(min = 1, max = 50, message = "Modelo deve ter entre 1 e 50 caracteres"))]
    pub model: String,

    #[validate(custom(function = "vehicle_year"))]
    pub year: i32,

    #[validate(regex(path = *PLATE_RE, message = "Placa inválida. Use formato ABC-1234 ou ABC1D23"))]
    pub license_plate: String,

    #[validate(length(max = 30, message = "Cor deve ter no máximo 30 caracteres"))]
    pub color: Option<String>,

    #[validate(length(max = 20, message = "Tamanho do motor deve ter no máximo 20 caracteres"))]
    pub engine_size: Option<String>,

    #[serde(default)]
    pub fuel_type: FuelType,

    pub client_id: Uuid,

    #[validate(length(max = 1000, message = "Anotações devem ter no máximo 1000 caracteres"))]
    pub annotations: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehiclePayload {
    #[validate(length(min = 2, max = 50, message = "Marca deve ter entre 2 e 50 caracteres"))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Modelo deve ter entre 1 e 50 caracteres"))]
    pub model: Option<String>,

    #[validate(custom(function = "vehicle_year"))]
    pub year: Option<i32>,

    #[validate(regex(path = *PLATE_RE, message = "Placa inválida. Use formato ABC-1234 ou ABC1D23"))]
    pub license_plate: Option<String>,

    #[validate(length(max = 30, message = "Cor deve ter no máximo 30 caracteres"))]
    pub color: Option<String>,

    #[validate(length(max = 20, message = "Tamanho do motor deve ter no máximo 20 caracteres"))]
    pub engine_size: Option<String>,

    pub fuel_type: Option<FuelType>,
    pub client_id: Option<Uuid>,

    #[validate(length(max = 1000, message = "Anotações devem ter no máximo 1000 caracteres"))]
    pub annotations: Option<String>,

    pub is_active: Option<bool>,
}

impl UpdateVehiclePayload {
    pub fn apply(self, vehicle: &mut Vehicle) {
        if let Some(v) = self.make {
            vehicle.make = v;
        }
        if let Some(v) = self.model {
            vehicle.model = v;
        }
        if let Some(v) = self.year {
            vehicle.year = v;
        }
        if let Some(v) = self.license_plate {
            vehicle.license_plate = normalize_plate(&v);
        }
        if self.color.is_some() {
            vehicle.color = self.color;
        }
        if self.engine_size.is_some() {
            vehicle.engine_size = self.engine_size;
        }
        if let Some(v) = self.fuel_type {
            vehicle.fuel_type = v;
        }
        if let Some(v) = self.client_id {
            vehicle.client_id = v;
        }
        if self.annotations.is_some() {
            vehicle.annotations = self.annotations;
        }
        if let Some(v) = self.is_active {
            vehicle.is_active = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plates_are_uppercased() {
        assert_eq!(normalize_plate(" abc1d23 "), "ABC1D23");
    }

    #[test]
    fn fuel_type_defaults_to_flex() {
        let payload: CreateVehiclePayload = serde_json::from_value(serde_json::json!({
            "make": "Fiat",
            "model": "Uno",
            "year": 2015,
            "licensePlate": "abc-1234",
            "clientId": Uuid::new_v4()
        }))
        .unwrap();
        assert_eq!(payload.fuel_type, FuelType::Flex);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn year_and_plate_are_validated() {
        let payload = UpdateVehiclePayload {
            year: Some(1800),
            license_plate: Some("1234-ABC".into()),
            ..Default::default()
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("year"));
        assert!(fields.contains_key("license_plate"));
    }
}

// src/services/employee_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{EmployeeRepository, SoftDeleteRepository},
    models::employee::{CreateEmployeePayload, Employee, EmployeeRole, UpdateEmployeePayload},
};

#[derive(Clone)]
pub struct EmployeeService {
    repo: EmployeeRepository,
    records: SoftDeleteRepository<Employee>,
    pool: PgPool,
}

impl EmployeeService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: EmployeeRepository::new(pool.clone()),
            records: SoftDeleteRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn records(&self) -> &SoftDeleteRepository<Employee> {
        &self.records
    }

    pub async fn create(&self, payload: CreateEmployeePayload) -> Result<Employee, AppError> {
        let employee = self.repo.create(&payload).await?;
        tracing::info!(employee_id = %employee.id, role = ?employee.role, "Funcionário criado");
        Ok(employee)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateEmployeePayload) -> Result<Employee, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut employee = self.records.find_by_id_for_update(&mut *tx, id).await?;
        payload.apply(&mut employee);
        let employee = self.repo.update(&mut *tx, &employee).await?;

        tx.commit().await?;
        Ok(employee)
    }

    pub async fn find_by_role(&self, role: EmployeeRole) -> Result<Vec<Employee>, AppError> {
        self.records.find_active_by("role", role).await
    }
}

// src/db/employee_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::common::db_utils::{map_db_error, Constraint};
use crate::common::error::AppError;
use crate::db::soft_delete::SoftDeletable;
use crate::models::employee::{CreateEmployeePayload, Employee};

const UNIQUE_KEYS: &[Constraint] = &[
    Constraint::new("idx_employees_email_active", "email", "Email já cadastrado"),
    Constraint::new("idx_employees_cpf_active", "cpf", "CPF já cadastrado"),
];

impl SoftDeletable for Employee {
    const TABLE: &'static str = "employees";
    const NOT_FOUND: &'static str = "Funcionário não encontrado";
    const ORDER_BY: &'static str = "name ASC";
    const CONSTRAINTS: &'static [Constraint] = UNIQUE_KEYS;
}

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: &CreateEmployeePayload) -> Result<Employee, AppError> {
        sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (
                name, role, email, phone, cpf, salary, hire_date,
                is_active, specializations, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, CURRENT_DATE), $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(payload.name.trim())
        .bind(payload.role)
        .bind(payload.email.as_deref().map(str::to_lowercase))
        .bind(&payload.phone)
        .bind(&payload.cpf)
        .bind(payload.salary)
        .bind(payload.hire_date)
        .bind(payload.is_active)
        .bind(&payload.specializations)
        .bind(&payload.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, UNIQUE_KEYS))
    }

    pub async fn update<'e, E>(&self, executor: E, employee: &Employee) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET name = $2, role = $3, email = $4, phone = $5, cpf = $6, salary = $7,
                hire_date = $8, is_active = $9, specializations = $10, notes = $11,
                updated_at = NOW()
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(employee.id)
        .bind(&employee.name)
        .bind(employee.role)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(&employee.cpf)
        .bind(employee.salary)
        .bind(employee.hire_date)
        .bind(employee.is_active)
        .bind(&employee.specializations)
        .bind(&employee.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, UNIQUE_KEYS))
    }
}

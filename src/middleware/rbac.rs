// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::{auth::User, rbac::{Permission, UserRole}},
};

pub const ADMIN_ONLY_MESSAGE: &str = "Acesso restrito a administradores";
const MISSING_PERMISSION_MESSAGE: &str = "Permissão insuficiente para esta ação";

fn current_user(parts: &Parts) -> Result<&User, AppError> {
    parts.extensions.get::<User>().ok_or(AppError::InvalidToken)
}

// =============================================================================
//  PERMISSÕES
// =============================================================================

/// Liga um tipo marcador a uma `Permission`.
pub trait PermissionDef: Send + Sync + 'static {
    fn permission() -> Permission;
}

/// O Extractor (Guardião). 403 quando o papel do usuário não concede `T`.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;
        let required = T::permission();

        if !user.permissions().allows(required) {
            tracing::warn!(user_id = %user.id, permission = required.key(), "Acesso negado");
            return Err(AppError::Forbidden(MISSING_PERMISSION_MESSAGE.into()));
        }

        Ok(RequirePermission(PhantomData))
    }
}

pub struct CanViewClients;
impl PermissionDef for CanViewClients {
    fn permission() -> Permission { Permission::ViewClients }
}

pub struct CanManageClients;
impl PermissionDef for CanManageClients {
    fn permission() -> Permission { Permission::ManageClients }
}

pub struct CanViewProducts;
impl PermissionDef for CanViewProducts {
    fn permission() -> Permission { Permission::ViewProducts }
}

pub struct CanManageProducts;
impl PermissionDef for CanManageProducts {
    fn permission() -> Permission { Permission::ManageProducts }
}

pub struct CanViewSales;
impl PermissionDef for CanViewSales {
    fn permission() -> Permission { Permission::ViewSales }
}

pub struct CanManageSales;
impl PermissionDef for CanManageSales {
    fn permission() -> Permission { Permission::ManageSales }
}

pub struct CanViewFinancials;
impl PermissionDef for CanViewFinancials {
    fn permission() -> Permission { Permission::ViewFinancials }
}

pub struct CanManageEmployees;
impl PermissionDef for CanManageEmployees {
    fn permission() -> Permission { Permission::ManageEmployees }
}

pub struct CanViewReports;
impl PermissionDef for CanViewReports {
    fn permission() -> Permission { Permission::ViewReports }
}

// =============================================================================
//  PAPÉIS
// =============================================================================

pub trait RoleDef: Send + Sync + 'static {
    fn allows(role: UserRole) -> bool;
}

pub struct RequireRole<R>(pub PhantomData<R>);

impl<R, S> FromRequestParts<S> for RequireRole<R>
where
    R: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;

        if !R::allows(user.role) {
            tracing::warn!(user_id = %user.id, role = ?user.role, "Acesso negado por papel");
            return Err(AppError::Forbidden(ADMIN_ONLY_MESSAGE.into()));
        }

        Ok(RequireRole(PhantomData))
    }
}

pub struct AdminOnly;
impl RoleDef for AdminOnly {
    fn allows(role: UserRole) -> bool {
        role == UserRole::Admin
    }
}

/// Qualquer usuário da equipe (admin ou funcionário).
pub struct StaffOnly;
impl RoleDef for StaffOnly {
    fn allows(role: UserRole) -> bool {
        matches!(role, UserRole::Admin | UserRole::Employee)
    }
}

/// Para checagens que dependem da requisição (ex.: `?includeDeleted=true`).
pub fn require_admin(user: &AuthenticatedUser) -> Result<(), AppError> {
    if user.0.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(ADMIN_ONLY_MESSAGE.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_only_rejects_employees() {
        assert!(AdminOnly::allows(UserRole::Admin));
        assert!(!AdminOnly::allows(UserRole::Employee));
    }

    #[test]
    fn staff_accepts_both_roles() {
        assert!(StaffOnly::allows(UserRole::Admin));
        assert!(StaffOnly::allows(UserRole::Employee));
    }

    #[test]
    fn marker_types_point_to_their_permission() {
        assert_eq!(CanManageSales::permission(), Permission::ManageSales);
        assert_eq!(CanViewReports::permission().key(), "canViewReports");
    }
}

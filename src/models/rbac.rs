// src/models/rbac.rs

use serde::{Deserialize, Serialize};

// Mapeia o CREATE TYPE user_role do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Employee,
}

/// As capacidades verificadas pelas rotas. Conjunto fechado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ViewClients,
    ManageClients,
    ViewProducts,
    ManageProducts,
    ViewSales,
    ManageSales,
    ViewFinancials,
    ManageEmployees,
    ViewReports,
}

impl Permission {
    /// Nome usado nas mensagens e no JSON ("canViewClients").
    pub fn key(self) -> &'static str {
        match self {
            Permission::ViewClients => "canViewClients",
            Permission::ManageClients => "canManageClients",
            Permission::ViewProducts => "canViewProducts",
            Permission::ManageProducts => "canManageProducts",
            Permission::ViewSales => "canViewSales",
            Permission::ManageSales => "canManageSales",
            Permission::ViewFinancials => "canViewFinancials",
            Permission::ManageEmployees => "canManageEmployees",
            Permission::ViewReports => "canViewReports",
        }
    }
}

/// Permissões efetivas de um usuário. Derivadas do papel, nunca gravadas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    pub can_view_clients: bool,
    pub can_manage_clients: bool,
    pub can_view_products: bool,
    pub can_manage_products: bool,
    pub can_view_sales: bool,
    pub can_manage_sales: bool,
    pub can_view_financials: bool,
    pub can_manage_employees: bool,
    pub can_view_reports: bool,
}

impl PermissionSet {
    pub fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self {
                can_view_clients: true,
                can_manage_clients: true,
                can_view_products: true,
                can_manage_products: true,
                can_view_sales: true,
                can_manage_sales: true,
                can_view_financials: true,
                can_manage_employees: true,
                can_view_reports: true,
            },
            // Funcionário apenas consulta produtos, clientes e vendas.
            UserRole::Employee => Self {
                can_view_clients: true,
                can_manage_clients: false,
                can_view_products: true,
                can_manage_products: false,
                can_view_sales: true,
                can_manage_sales: false,
                can_view_financials: false,
                can_manage_employees: false,
                can_view_reports: false,
            },
        }
    }

    pub fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::ViewClients => self.can_view_clients,
            Permission::ManageClients => self.can_manage_clients,
            Permission::ViewProducts => self.can_view_products,
            Permission::ManageProducts => self.can_manage_products,
            Permission::ViewSales => self.can_view_sales,
            Permission::ManageSales => self.can_manage_sales,
            Permission::ViewFinancials => self.can_view_financials,
            Permission::ManageEmployees => self.can_manage_employees,
            Permission::ViewReports => self.can_view_reports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Permission; 9] = [
        Permission::ViewClients,
        Permission::ManageClients,
        Permission::ViewProducts,
        Permission::ManageProducts,
        Permission::ViewSales,
        Permission::ManageSales,
        Permission::ViewFinancials,
        Permission::ManageEmployees,
        Permission::ViewReports,
    ];

    #[test]
    fn admin_has_everything() {
        let set = PermissionSet::for_role(UserRole::Admin);
        assert!(ALL.iter().all(|p| set.allows(*p)));
    }

    #[test]
    fn employee_only_views_products_clients_and_sales() {
        let set = PermissionSet::for_role(UserRole::Employee);
        let granted: Vec<_> = ALL.iter().copied().filter(|p| set.allows(*p)).collect();
        assert_eq!(
            granted,
            vec![Permission::ViewClients, Permission::ViewProducts, Permission::ViewSales]
        );
    }

    #[test]
    fn serializes_with_can_prefix() {
        let json = serde_json::to_value(PermissionSet::for_role(UserRole::Employee)).unwrap();
        assert_eq!(json["canViewClients"], true);
        assert_eq!(json["canManageEmployees"], false);
        assert_eq!(json.as_object().unwrap().len(), 9);
    }
}

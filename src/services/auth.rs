// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{SoftDeleteRepository, UserRepository},
    models::{
        auth::{
            Claims, LoginResponse, PublicUser, RegisterPayload, UpdateProfilePayload,
            UpdateUserPayload, User,
        },
        employee::Employee,
        rbac::UserRole,
    },
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    users: SoftDeleteRepository<User>,
    employees: SoftDeleteRepository<Employee>,
    jwt_secret: String,
    jwt_expiration_hours: i64,
    bcrypt_cost: u32,
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt_secret: String, jwt_expiration_hours: i64, bcrypt_cost: u32) -> Self {
        Self {
            user_repo: UserRepository::new(pool.clone()),
            users: SoftDeleteRepository::new(pool.clone()),
            employees: SoftDeleteRepository::new(pool.clone()),
            jwt_secret,
            jwt_expiration_hours,
            bcrypt_cost,
            pool,
        }
    }

    // =========================================================================
    //  LOGIN / TOKEN
    // =========================================================================

    /// `identifier` é o username ou o e-mail. Usuário inexistente e senha
    /// errada devolvem o mesmo erro.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse, AppError> {
        let user = self
            .user_repo
            .find_for_login(identifier.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        self.user_repo.touch_last_login(user.id).await?;
        let user = self.users.get(user.id).await?;

        let token = issue_token(&self.jwt_secret, &user, self.jwt_expiration_hours)?;
        tracing::info!(user_id = %user.id, "Login realizado");

        Ok(LoginResponse {
            token,
            user: user.into(),
        })
    }

    /// Valida assinatura e expiração e recarrega o usuário: desativação ou
    /// exclusão valem a partir da próxima requisição.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(&self.jwt_secret, token)?;

        match self.users.find_by_id(claims.sub).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(AppError::InactiveUser),
        }
    }

    // =========================================================================
    //  CADASTRO E PERFIL
    // =========================================================================

    pub async fn register(&self, payload: RegisterPayload) -> Result<PublicUser, AppError> {
        self.check_employee_link(payload.role, payload.employee_id).await?;

        let password_hash = hash_password(&payload.password, self.bcrypt_cost).await?;

        let user = self
            .user_repo
            .create(
                payload.username.trim(),
                payload.email.trim(),
                &password_hash,
                payload.role,
                payload.employee_id,
            )
            .await?;

        tracing::info!(user_id = %user.id, role = ?user.role, "Usuário criado");
        Ok(user.into())
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self.users.get(user_id).await?;

        if !verify_password(current_password, &user.password_hash).await? {
            return Err(AppError::CurrentPasswordMismatch);
        }

        let password_hash = hash_password(new_password, self.bcrypt_cost).await?;
        self.user_repo.update_password(user.id, &password_hash).await
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        payload: UpdateProfilePayload,
    ) -> Result<PublicUser, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut user = self.users.find_by_id_for_update(&mut *tx, user_id).await?;
        if let Some(username) = payload.username {
            user.username = username.trim().to_string();
        }
        if let Some(email) = payload.email {
            user.email = email.trim().to_lowercase();
        }
        let user = self.user_repo.update(&mut *tx, &user).await?;

        tx.commit().await?;
        Ok(user.into())
    }

    /// Administração: papel, vínculo com funcionário e ativação.
    /// As permissões acompanham o papel automaticamente.
    pub async fn update_user(&self, id: Uuid, payload: UpdateUserPayload) -> Result<PublicUser, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut user = self.users.find_by_id_for_update(&mut *tx, id).await?;
        if let Some(role) = payload.role {
            user.role = role;
        }
        if payload.employee_id.is_some() {
            user.employee_id = payload.employee_id;
        }
        if let Some(active) = payload.is_active {
            user.is_active = active;
        }
        self.check_employee_link(user.role, user.employee_id).await?;

        let user = self.user_repo.update(&mut *tx, &user).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, role = ?user.role, active = user.is_active, "Usuário atualizado");
        Ok(user.into())
    }

    pub async fn list_users(&self) -> Result<Vec<PublicUser>, AppError> {
        let users = self.users.find_active().await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    /// Cria o primeiro administrador quando não existe nenhum ativo.
    pub async fn ensure_admin(&self, username: &str, email: &str, password: &str) -> Result<(), AppError> {
        if self.user_repo.has_active_admin().await? {
            return Ok(());
        }

        let password_hash = hash_password(password, self.bcrypt_cost).await?;
        let admin = self
            .user_repo
            .create(username, email, &password_hash, UserRole::Admin, None)
            .await?;

        tracing::info!(user_id = %admin.id, "Administrador inicial criado");
        Ok(())
    }

    // Funcionário precisa estar vinculado a um cadastro ativo de Employee.
    async fn check_employee_link(&self, role: UserRole, employee_id: Option<Uuid>) -> Result<(), AppError> {
        match (role, employee_id) {
            (UserRole::Employee, None) => Err(AppError::invalid(
                "employeeId",
                "ID do funcionário é obrigatório para usuários do tipo employee",
            )),
            (_, Some(id)) => match self.employees.find_by_id(id).await? {
                Some(_) => Ok(()),
                None => Err(AppError::invalid("employeeId", "Funcionário não encontrado")),
            },
            (UserRole::Admin, None) => Ok(()),
        }
    }
}

// =============================================================================
//  FUNÇÕES AUXILIARES (bcrypt / JWT)
// =============================================================================

pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, cost))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();

    // Executa a verificação em um thread separado
    let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}

pub(crate) fn issue_token(secret: &str, user: &User, expiration_hours: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::hours(expiration_hours);

    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        role: user.role,
        permissions: user.permissions(),
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

pub(crate) fn decode_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "segredo-de-teste";

    fn user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "admin".into(),
            email: "admin@oficina.com".into(),
            password_hash: String::new(),
            role,
            employee_id: None,
            is_active: true,
            last_login: None,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn token_carries_identity_and_permissions() {
        let u = user(UserRole::Employee);
        let token = issue_token(SECRET, &u, 24).unwrap();
        let claims = decode_token(SECRET, &token).unwrap();

        assert_eq!(claims.sub, u.id);
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.role, UserRole::Employee);
        assert!(claims.permissions.can_view_sales);
        assert!(!claims.permissions.can_manage_sales);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token("outro-segredo", &user(UserRole::Admin), 24).unwrap();
        assert!(matches!(decode_token(SECRET, &token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn tampered_token_is_rejected() {
        // Assinatura de um token com o payload de outro.
        let token = issue_token(SECRET, &user(UserRole::Employee), 24).unwrap();
        let forged = issue_token(SECRET, &user(UserRole::Admin), 24).unwrap();

        let header = token.split('.').next().unwrap();
        let signature = token.split('.').nth(2).unwrap();
        let forged_payload = forged.split('.').nth(1).unwrap();
        let tampered = format!("{header}.{forged_payload}.{signature}");
        assert!(matches!(decode_token(SECRET, &tampered), Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token(SECRET, &user(UserRole::Admin), -2).unwrap();
        assert!(matches!(decode_token(SECRET, &token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(decode_token(SECRET, "nao.e.jwt"), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn bcrypt_roundtrip() {
        let hashed = hash_password("Senha1", 4).await.unwrap();
        assert_ne!(hashed, "Senha1");
        assert!(verify_password("Senha1", &hashed).await.unwrap());
        assert!(!verify_password("Senha2", &hashed).await.unwrap());
    }
}

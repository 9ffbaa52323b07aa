// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::{Claims, User},
        rbac::Role,
    },
};

const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    bootstrap_admin_email: Option<String>,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        jwt_secret: String,
        bootstrap_admin_email: Option<String>,
    ) -> Self {
        Self { user_repo, jwt_secret, bootstrap_admin_email }
    }

    pub async fn register_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let email = email.trim().to_lowercase();

        // 1. Hashing num thread separado (bcrypt é caro)
        let password_clone = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))?
            ?;

        // 2. O e-mail configurado como administrador inicial ganha o papel ADMIN
        let role = if self.bootstrap_admin_email.as_deref() == Some(email.as_str()) {
            Role::Admin
        } else {
            Role::Member
        };

        let new_user = self.user_repo
            .create_user(&email, &hashed_password, role)
            .await?;

        tracing::info!(user_id = %new_user.id, role = ?new_user.role, "usuário registrado");

        // 3. Gera o token
        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self.user_repo
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
        ?;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = self.decode_token(token)?;

        // Token de usuário apagado também é inválido
        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    pub async fn change_role(&self, user_id: Uuid, role: Role) -> Result<User, AppError> {
        let user = self.user_repo
            .update_role(user_id, role)
            .await?
            .ok_or(AppError::UserNotFound)?;

        tracing::info!(user_id = %user.id, role = ?user.role, "papel alterado");
        Ok(user)
    }

    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service(secret: &str) -> AuthService {
        // Pool preguiçoso: nenhuma conexão é aberta nestes testes
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/chms_test")
            .expect("url válida");
        AuthService::new(UserRepository::new(pool), secret.to_string(), None)
    }

    #[tokio::test]
    async fn issued_token_decodes_to_same_user() {
        let auth = service("segredo");
        let user_id = Uuid::new_v4();

        let token = auth.create_token(user_id).unwrap();
        let claims = auth.decode_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let token = service("segredo-a").create_token(Uuid::new_v4()).unwrap();
        let result = service("segredo-b").decode_token(&token);

        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        assert!(matches!(service("segredo").decode_token("não-é-jwt"), Err(AppError::InvalidToken)));
    }
}

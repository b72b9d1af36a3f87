//! ecom-auth-core - 认证核心库
//!
//! 签发和校验 HS256 JWT。令牌是无状态、自包含的：不落库，也没有吊销列表，
//! 过期时间是唯一的生命周期约束。

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, TimeZone, Utc};
use ecom_errors::{AppError, AppResult};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 签名密钥最小字节数
pub const MIN_SECRET_LEN: usize = 32;

/// 令牌服务构造失败（启动期配置错误）
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenConfigError {
    #[error("JWT secret must be at least {min} bytes, got {actual}")]
    SecretTooShort { min: usize, actual: usize },

    #[error("token lifetime must be positive and representable, got {0}s")]
    InvalidLifetime(i64),
}

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "customer" => Ok(Role::Customer),
            other => Err(AppError::invalid_input("role", format!("unknown role `{other}`"))),
        }
    }
}

/// JWT Claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// 登录邮箱
    #[serde(default)]
    pub email: String,
    pub role: Role,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    pub iat: i64,
    /// JWT ID
    pub jti: String,
    pub iss: String,
    pub aud: String,
}

impl Claims {
    pub fn user_id(&self) -> AppResult<i64> {
        self.sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// 签发结果
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub claims: Claims,
}

/// Token 服务
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: i64,
    lifetime: Duration,
    issuer: String,
    audience: String,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("expires_in", &self.expires_in)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(
        secret: &str,
        expires_in: i64,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self, TokenConfigError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenConfigError::SecretTooShort {
                min: MIN_SECRET_LEN,
                actual: secret.len(),
            });
        }
        // 有效期必须能加到当前时间上，否则每次签发都会失败
        let lifetime = Duration::try_seconds(expires_in)
            .filter(|lifetime| expires_in > 0 && Utc::now().checked_add_signed(*lifetime).is_some())
            .ok_or(TokenConfigError::InvalidLifetime(expires_in))?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
            lifetime,
            issuer: issuer.into(),
            audience: audience.into(),
        })
    }

    /// 构造一份从现在起生效的 Claims
    pub fn claims_for(&self, user_id: i64, email: &str, role: Role) -> AppResult<Claims> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AppError::internal("Token expiry is out of range"))?;

        Ok(Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        })
    }

    /// 签名任意 Claims
    pub fn sign(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
    }

    /// 生成访问令牌
    pub fn issue(&self, user_id: i64, email: &str, role: Role) -> AppResult<IssuedToken> {
        let claims = self.claims_for(user_id, email, role)?;
        let token = self.sign(&claims)?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
            claims,
        })
    }

    /// 校验签名、签发方、受众和过期时间（不允许时间偏差）
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::unauthorized(format!("Invalid token: {}", e)))?;

        let claims = token_data.claims;
        // jsonwebtoken 只拒绝 exp < now，这里把 exp == now 也视为过期
        if claims.exp <= Utc::now().timestamp() {
            return Err(AppError::unauthorized("Invalid token: expired"));
        }
        if claims.jti.is_empty() {
            return Err(AppError::unauthorized("Token ID (jti) missing"));
        }
        claims.user_id()?;

        Ok(claims)
    }

    /// 令牌有效期（秒）
    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }
}

/// 从 `Authorization` 头的值中取出 Bearer 令牌
pub fn bearer_token(header_value: &str) -> AppResult<&str> {
    let (scheme, token) = header_value
        .split_once(' ')
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header"))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::unauthorized("Invalid authorization scheme"));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::unauthorized("Empty bearer token"));
    }
    Ok(token)
}

/// 角色检查宏
#[macro_export]
macro_rules! require_role {
    ($claims:expr, $role:expr) => {
        if !$claims.has_role($role) {
            return Err(ecom_errors::AppError::forbidden(format!(
                "Missing role: {}",
                $role
            )));
        }
    };
}

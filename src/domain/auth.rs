use serde::{Deserialize, Serialize};

/// Login payload accepted by the auth endpoint.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

/// Account returned alongside the token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Authenticated admin session; the token is attached as a bearer header.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub jwt: String,
    pub user: AdminUser,
}

//! Authentication: password hashing, JWT, login and refresh.

mod handlers;
mod jwt;
mod password;

pub use handlers::{login, refresh, LoginResponse, TokenResponse};
pub use jwt::{Claims, TokenIssuer};
pub use password::PasswordService;

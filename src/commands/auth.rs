use super::{Output, describe_user, json};
use crate::models::User;
use crate::{Board, Result};
use serde::Serialize;

/// Result of `auth register` and `auth login`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    pub action: &'static str,
    pub user: User,
}

impl Output for AuthResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match self.action {
            "register" => format!("Registered and signed in as {}", describe_user(&self.user)),
            _ => format!("Signed in as {}", describe_user(&self.user)),
        }
    }
}

pub fn auth_register(board: &mut Board, name: &str, email: &str, password: &str) -> Result<AuthResult> {
    let user = board.register(name, email, password)?;
    Ok(AuthResult {
        action: "register",
        user,
    })
}

pub fn auth_login(board: &mut Board, email: &str, password: &str) -> Result<AuthResult> {
    let user = board.login(email, password)?;
    Ok(AuthResult {
        action: "login",
        user,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResult {
    /// Whether a session was active before the call
    pub was_signed_in: bool,
}

impl Output for LogoutResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.was_signed_in {
            "Signed out".to_string()
        } else {
            "Not signed in".to_string()
        }
    }
}

pub fn auth_logout(board: &mut Board) -> Result<LogoutResult> {
    let was_signed_in = board.current_user().is_some();
    board.logout();
    Ok(LogoutResult { was_signed_in })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoamiResult {
    pub user: Option<User>,
}

impl Output for WhoamiResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match self.user {
            Some(ref user) => describe_user(user),
            None => "Not signed in".to_string(),
        }
    }
}

pub fn auth_whoami(board: &Board) -> Result<WhoamiResult> {
    Ok(WhoamiResult {
        user: board.current_user().cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoardConfig;
    use crate::Error;

    #[test]
    fn test_register_then_whoami() {
        let mut board = Board::in_memory(BoardConfig::immediate());
        let result = auth_register(&mut board, "Carol", "carol@x.io", "pw").unwrap();
        assert_eq!(result.action, "register");
        assert!(result.to_human().starts_with("Registered and signed in as Carol"));

        let whoami = auth_whoami(&board).unwrap();
        assert_eq!(whoami.user.unwrap().email, "carol@x.io");
    }

    #[test]
    fn test_login_failure_is_error() {
        let mut board = Board::in_memory(BoardConfig::immediate().with_seed_demo_data(true));
        let err = auth_login(&mut board, "alice@tech.com", "nope").unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert_eq!(err.to_string(), "Invalid email or password");
    }

    #[test]
    fn test_logout_reports_previous_state() {
        let mut board = Board::in_memory(BoardConfig::immediate());
        assert!(!auth_logout(&mut board).unwrap().was_signed_in);

        auth_register(&mut board, "Carol", "carol@x.io", "pw").unwrap();
        let result = auth_logout(&mut board).unwrap();
        assert!(result.was_signed_in);
        assert_eq!(result.to_json(), r#"{"wasSignedIn":true}"#);
        assert_eq!(auth_whoami(&board).unwrap().to_human(), "Not signed in");
    }
}

use super::{Output, describe_user, json};
use crate::models::User;
use crate::{Board, Result};
use serde::Serialize;

/// Everyone in the user directory, without credentials.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserList {
    pub users: Vec<User>,
    pub count: usize,
    /// ID of the signed-in user, if any
    pub current_user_id: Option<String>,
}

impl Output for UserList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.users.is_empty() {
            return "No users.".to_string();
        }

        let mut lines = vec![format!("{} user(s):", self.count)];
        for user in &self.users {
            let marker = if self.current_user_id.as_deref() == Some(user.id.as_str()) {
                " (you)"
            } else {
                ""
            };
            lines.push(format!("  {}{}", describe_user(user), marker));
        }
        lines.join("\n")
    }
}

pub fn user_list(board: &Board) -> Result<UserList> {
    let users = board.users();
    let count = users.len();
    Ok(UserList {
        users,
        count,
        current_user_id: board.current_user().map(|u| u.id.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoardConfig;

    #[test]
    fn test_user_list_empty() {
        let board = Board::in_memory(BoardConfig::immediate());
        let list = user_list(&board).unwrap();
        assert_eq!(list.count, 0);
        assert_eq!(list.to_human(), "No users.");
    }

    #[test]
    fn test_user_list_hides_passwords() {
        let mut board = Board::in_memory(BoardConfig::immediate().with_seed_demo_data(true));
        board.login("bob@tech.com", "password123").unwrap();

        let list = user_list(&board).unwrap();
        assert_eq!(list.count, 2);
        assert_eq!(list.current_user_id.as_deref(), Some("u2"));

        let json = list.to_json();
        assert!(json.contains("\"email\":\"alice@tech.com\""));
        assert!(json.contains("\"currentUserId\":\"u2\""));
        assert!(!json.contains("password123"));

        let human = list.to_human();
        assert!(human.contains("Alice Engineer <alice@tech.com> [u1]\n"));
        assert!(human.ends_with("Bob Manager <bob@tech.com> [u2] (you)"));
    }
}

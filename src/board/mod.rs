//! The task board: entity store, session and domain operations.
//!
//! A [`Board`] owns every entity collection. It is hydrated from a
//! [`Persistence`] at open, and each successful mutation rewrites the
//! affected collection right away. Views are computed on demand from the
//! current collections (see [`crate::views`]).
//!
//! Mutations take `&mut self`, so a login, a registration and any data change
//! are exclusive for a given board. Share a board across threads behind a
//! `Mutex` if needed.

pub mod seed;

use crate::auth::{LoadingFlag, Session, SessionState, UserDirectory};
use crate::models::{Comment, NewTask, PlannedTask, Project, Task, TaskStatus, User, UserRecord, timestamp};
use crate::storage::{
    COMMENTS_KEY, PROJECTS_KEY, Persistence, SESSION_USER_KEY, TASKS_KEY, USERS_DB_KEY,
    generate_id,
};
use crate::views::{self, BoardColumn};
use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// Default simulated latency for login and registration.
pub const DEFAULT_AUTH_DELAY: Duration = Duration::from_millis(800);

/// Behaviour knobs for a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Simulated latency before login/registration resolves
    pub auth_delay: Duration,
    /// Write demo users, a project, tasks and a comment into an empty store
    pub seed_demo_data: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            auth_delay: DEFAULT_AUTH_DELAY,
            seed_demo_data: true,
        }
    }
}

impl BoardConfig {
    /// No latency, no demo data.
    pub fn immediate() -> Self {
        Self {
            auth_delay: Duration::ZERO,
            seed_demo_data: false,
        }
    }

    pub fn with_auth_delay(mut self, delay: Duration) -> Self {
        self.auth_delay = delay;
        self
    }

    pub fn with_seed_demo_data(mut self, seed: bool) -> Self {
        self.seed_demo_data = seed;
        self
    }
}

/// In-memory board state backed by a key-value store.
#[derive(Debug)]
pub struct Board {
    persistence: Persistence,
    config: BoardConfig,
    directory: UserDirectory,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    comments: Vec<Comment>,
    session: Session,
}

impl Board {
    /// Hydrate a board from `persistence`.
    ///
    /// Malformed collections start empty and stay on disk untouched. Absent
    /// collections start empty, or with demo data when `config.seed_demo_data`
    /// is set (the seeded collections are saved).
    pub fn open(mut persistence: Persistence, config: BoardConfig) -> Self {
        let seed_demo = config.seed_demo_data;
        let now = timestamp::now();

        let directory =
            UserDirectory::new(hydrate(&mut persistence, USERS_DB_KEY, seed_demo, seed::users));
        let projects = hydrate(&mut persistence, PROJECTS_KEY, seed_demo, || seed::projects(now));
        let tasks = hydrate(&mut persistence, TASKS_KEY, seed_demo, || seed::tasks(now));
        let comments = hydrate(&mut persistence, COMMENTS_KEY, seed_demo, || seed::comments(now));
        let session = Session::restore(persistence.load::<User>(SESSION_USER_KEY));

        debug!(
            location = %persistence.location(),
            users = directory.len(),
            projects = projects.len(),
            tasks = tasks.len(),
            comments = comments.len(),
            signed_in = session.is_signed_in(),
            "board hydrated"
        );

        Self {
            persistence,
            config,
            directory,
            projects,
            tasks,
            comments,
            session,
        }
    }

    /// A board over a fresh in-memory store.
    pub fn in_memory(config: BoardConfig) -> Self {
        Self::open(Persistence::in_memory(), config)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    // === Auth ===

    /// Sign in with an exact email/password match.
    ///
    /// On failure the session is left as it was and [`auth_error`](Self::auth_error)
    /// carries the message.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let _loading = self.session.begin_attempt();
        self.simulate_latency();

        match self.directory.authenticate(email, password) {
            Ok(user) => {
                self.establish_session(user.clone());
                info!(user_id = %user.id, "signed in");
                Ok(user)
            }
            Err(e) => {
                self.session.record_failure(&e);
                debug!(email, "login rejected");
                Err(e.into())
            }
        }
    }

    /// Register a new user and sign them in.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<User> {
        let _loading = self.session.begin_attempt();
        self.simulate_latency();

        if let Err(e) = validate_registration(name, email, password) {
            self.session.record_message(e.to_string());
            return Err(e);
        }

        let record = UserRecord::new(
            generate_id("u"),
            name.to_string(),
            email.to_string(),
            password.to_string(),
        );

        match self.directory.register(record) {
            Ok(user) => {
                self.persistence.save(USERS_DB_KEY, self.directory.records());
                self.establish_session(user.clone());
                info!(user_id = %user.id, "registered");
                Ok(user)
            }
            Err(e) => {
                self.session.record_failure(&e);
                debug!(email, "registration rejected");
                Err(e.into())
            }
        }
    }

    /// Clear the session and its stored entry.
    pub fn logout(&mut self) {
        if let Some(user) = self.session.current_user() {
            info!(user_id = %user.id, "signed out");
        }
        self.session.sign_out();
        self.persistence.remove(SESSION_USER_KEY);
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    pub fn session_state(&self) -> &SessionState {
        self.session.state()
    }

    /// Message from the last failed login or registration.
    pub fn auth_error(&self) -> Option<&str> {
        self.session.error()
    }

    pub fn is_auth_loading(&self) -> bool {
        self.session.loading_flag().is_loading()
    }

    /// Shareable handle on the auth loading flag.
    pub fn loading_flag(&self) -> LoadingFlag {
        self.session.loading_flag()
    }

    fn establish_session(&mut self, user: User) {
        self.persistence.save(SESSION_USER_KEY, &user);
        self.session.sign_in(user);
    }

    fn simulate_latency(&self) {
        if !self.config.auth_delay.is_zero() {
            std::thread::sleep(self.config.auth_delay);
        }
    }

    // === Collections ===

    /// Registered users, credentials stripped.
    pub fn users(&self) -> Vec<User> {
        self.directory.users()
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    // === Project Operations ===

    /// Create a project owned by the signed-in user.
    pub fn create_project(&mut self, title: &str, description: &str) -> Result<Project> {
        let owner = self.current_user().ok_or(Error::NotSignedIn)?;
        if title.trim().is_empty() {
            return Err(Error::InvalidInput("Project title cannot be empty".to_string()));
        }

        let project = Project {
            id: generate_id("p"),
            title: title.to_string(),
            description: description.to_string(),
            owner_id: owner.id.clone(),
            created_at: timestamp::now(),
        };

        self.projects.push(project.clone());
        self.persistence.save(PROJECTS_KEY, &self.projects);
        info!(project_id = %project.id, "project created");
        Ok(project)
    }

    // === Task Operations ===

    /// Append a task to a project.
    ///
    /// The project id is not checked; a task for an unknown project is kept
    /// but never shows up on a board.
    pub fn create_task(&mut self, project_id: &str, new_task: NewTask) -> Task {
        let task = self.build_task(project_id, new_task);
        self.tasks.push(task.clone());
        self.persistence.save(TASKS_KEY, &self.tasks);
        info!(task_id = %task.id, project_id, "task created");
        task
    }

    /// Create one task per planned item, in plan order.
    pub fn import_plan(&mut self, project_id: &str, plan: &[PlannedTask]) -> Vec<Task> {
        let created: Vec<Task> = plan
            .iter()
            .map(|planned| self.build_task(project_id, NewTask::from(planned)))
            .collect();

        if !created.is_empty() {
            self.tasks.extend(created.iter().cloned());
            self.persistence.save(TASKS_KEY, &self.tasks);
            info!(project_id, count = created.len(), "plan imported");
        }
        created
    }

    fn build_task(&self, project_id: &str, new_task: NewTask) -> Task {
        Task {
            id: generate_id("t"),
            project_id: project_id.to_string(),
            title: new_task.title,
            description: new_task.description,
            status: new_task.status,
            assignee_id: new_task.assignee_id.filter(|id| !id.is_empty()),
            created_at: timestamp::now(),
        }
    }

    /// Move a task to another column. Returns `false` if the id is unknown.
    pub fn set_task_status(&mut self, task_id: &str, status: TaskStatus) -> bool {
        self.update_task(task_id, |task| task.status = status)
    }

    /// Assign a task; an empty `user_id` clears the assignment.
    pub fn set_task_assignee(&mut self, task_id: &str, user_id: &str) -> bool {
        let assignee = (!user_id.is_empty()).then(|| user_id.to_string());
        self.update_task(task_id, |task| task.assignee_id = assignee)
    }

    pub fn set_task_description(&mut self, task_id: &str, description: &str) -> bool {
        self.update_task(task_id, |task| task.description = description.to_string())
    }

    /// Remove a task. Its comments stay in the comment collection.
    pub fn delete_task(&mut self, task_id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task_id);
        if self.tasks.len() == before {
            debug!(task_id, "delete_task: unknown id, nothing to do");
            return false;
        }

        self.persistence.save(TASKS_KEY, &self.tasks);
        info!(task_id, "task deleted");
        true
    }

    fn update_task(&mut self, task_id: &str, apply: impl FnOnce(&mut Task)) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            debug!(task_id, "update_task: unknown id, nothing to do");
            return false;
        };

        apply(task);
        self.persistence.save(TASKS_KEY, &self.tasks);
        debug!(task_id, "task updated");
        true
    }

    // === Comment Operations ===

    /// Comment on a task as the signed-in user.
    ///
    /// Returns `Ok(None)` without changing anything when nobody is signed in.
    pub fn add_comment(&mut self, task_id: &str, text: &str) -> Result<Option<Comment>> {
        let Some(author) = self.current_user() else {
            debug!(task_id, "add_comment ignored: not signed in");
            return Ok(None);
        };
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("Comment text cannot be empty".to_string()));
        }

        let comment = Comment {
            id: generate_id("c"),
            task_id: task_id.to_string(),
            user_id: author.id.clone(),
            text: text.to_string(),
            created_at: timestamp::now(),
        };

        self.comments.push(comment.clone());
        self.persistence.save(COMMENTS_KEY, &self.comments);
        info!(comment_id = %comment.id, task_id, "comment added");
        Ok(Some(comment))
    }

    // === Views ===

    pub fn tasks_for_project(&self, project_id: &str) -> Vec<&Task> {
        views::tasks_for_project(&self.tasks, project_id)
    }

    pub fn tasks_by_status(&self, project_id: &str, status: TaskStatus) -> Vec<&Task> {
        views::tasks_by_status(&self.tasks, project_id, status)
    }

    pub fn comment_count_for_task(&self, task_id: &str) -> usize {
        views::comment_count_for_task(&self.comments, task_id)
    }

    pub fn comments_for_task(&self, task_id: &str) -> Vec<&Comment> {
        views::comments_for_task(&self.comments, task_id)
    }

    pub fn assignee_for_task(&self, task: &Task) -> Option<User> {
        let users = self.users();
        views::assignee_for_task(&users, task).cloned()
    }

    pub fn comment_author(&self, comment: &Comment) -> Option<User> {
        let users = self.users();
        views::comment_author(&users, comment).cloned()
    }

    pub fn board_columns(&self, project_id: &str) -> Vec<BoardColumn> {
        views::board_columns(&self.tasks, &self.comments, &self.users(), project_id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        views::project_by_id(&self.projects, id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        views::task_by_id(&self.tasks, id)
    }

    pub fn comment(&self, id: &str) -> Option<&Comment> {
        views::comment_by_id(&self.comments, id)
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.directory.find(id).map(UserRecord::to_user)
    }
}

/// Load a collection, seeding (and saving) it when absent and `seed` is set.
/// A malformed entry is never seeded over.
fn hydrate<T, F>(persistence: &mut Persistence, key: &str, seed: bool, seed_items: F) -> Vec<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Vec<T>,
{
    if let Some(items) = persistence.load::<Vec<T>>(key) {
        return items;
    }
    if !seed || persistence.contains(key) {
        return Vec::new();
    }

    let items = seed_items();
    persistence.save(key, &items);
    debug!(key, count = items.len(), "seeded demo data");
    items
}

fn validate_registration(name: &str, email: &str, password: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput("Name cannot be empty".to_string()));
    }
    if email.trim().is_empty() {
        return Err(Error::InvalidInput("Email cannot be empty".to_string()));
    }
    if password.is_empty() {
        return Err(Error::InvalidInput("Password cannot be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;
    use crate::storage::MemoryStore;
    use crate::test_utils::TestEnv;

    fn board() -> Board {
        Board::in_memory(BoardConfig::immediate())
    }

    fn signed_in_board() -> (Board, User) {
        let mut board = board();
        let user = board.register("Alice", "alice@x.com", "pw").unwrap();
        (board, user)
    }

    #[test]
    fn test_open_empty_store_without_seed() {
        let board = board();
        assert!(board.users().is_empty());
        assert!(board.projects().is_empty());
        assert!(board.tasks().is_empty());
        assert!(board.comments().is_empty());
        assert_eq!(board.session_state(), &SessionState::SignedOut);
    }

    #[test]
    fn test_open_seeds_demo_data() {
        let board = Board::in_memory(BoardConfig::immediate().with_seed_demo_data(true));
        assert_eq!(board.users().len(), 2);
        assert_eq!(board.projects().len(), 1);
        assert_eq!(board.tasks_for_project("p1").len(), 3);
        assert_eq!(board.comment_count_for_task("t2"), 1);
        assert!(board.persistence().contains(USERS_DB_KEY));
        assert!(board.persistence().contains(TASKS_KEY));
    }

    #[test]
    fn test_seeded_demo_account_can_log_in() {
        let mut board = Board::in_memory(BoardConfig::immediate().with_seed_demo_data(true));
        let user = board.login("alice@tech.com", seed::DEMO_PASSWORD).unwrap();
        assert_eq!(user.id, "u1");
    }

    #[test]
    fn test_register_establishes_and_persists_session() {
        let (board, user) = signed_in_board();
        assert_eq!(board.current_user(), Some(&user));
        assert!(board.persistence().contains(SESSION_USER_KEY));
        let stored: serde_json::Value = board.persistence().load(SESSION_USER_KEY).unwrap();
        assert!(stored.get("password").is_none());
    }

    #[test]
    fn test_register_duplicate_email() {
        let (mut board, _) = signed_in_board();
        let before: Vec<UserRecord> = board.persistence().load(USERS_DB_KEY).unwrap();

        let err = board.register("Other", "alice@x.com", "pw2").unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::EmailTaken)));
        assert_eq!(board.auth_error(), Some("Email already registered"));

        let after: Vec<UserRecord> = board.persistence().load(USERS_DB_KEY).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_register_rejects_blank_fields() {
        let mut board = board();
        assert!(matches!(
            board.register("", "a@x.com", "pw"),
            Err(Error::InvalidInput(_))
        ));
        assert!(board.auth_error().is_some());
        assert!(board.users().is_empty());
    }

    #[test]
    fn test_login_failure_keeps_prior_session() {
        let (mut board, user) = signed_in_board();
        let err = board.login("alice@x.com", "wrong").unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::InvalidCredentials)));
        assert_eq!(board.auth_error(), Some("Invalid email or password"));
        assert_eq!(board.current_user(), Some(&user));
    }

    #[test]
    fn test_login_success_clears_error() {
        let (mut board, _) = signed_in_board();
        board.logout();
        let _ = board.login("alice@x.com", "nope");
        assert!(board.auth_error().is_some());
        board.login("alice@x.com", "pw").unwrap();
        assert_eq!(board.auth_error(), None);
    }

    #[test]
    fn test_logout_clears_stored_session() {
        let (mut board, _) = signed_in_board();
        board.logout();
        assert_eq!(board.current_user(), None);
        assert!(!board.persistence().contains(SESSION_USER_KEY));
    }

    #[test]
    fn test_loading_flag_is_lowered_after_attempt() {
        let mut board = board();
        let flag = board.loading_flag();
        let _ = board.login("nobody@x.com", "pw");
        assert!(!flag.is_loading());
        assert!(!board.is_auth_loading());
    }

    #[test]
    fn test_create_project_requires_session() {
        let mut board = board();
        assert!(matches!(
            board.create_project("Launch", "desc"),
            Err(Error::NotSignedIn)
        ));
        assert!(board.projects().is_empty());
    }

    #[test]
    fn test_create_project_sets_owner() {
        let (mut board, user) = signed_in_board();
        let project = board.create_project("Launch", "desc").unwrap();
        assert_eq!(project.owner_id, user.id);
        assert_eq!(board.project(&project.id), Some(&project));
    }

    #[test]
    fn test_create_project_rejects_blank_title() {
        let (mut board, _) = signed_in_board();
        assert!(matches!(
            board.create_project("  ", ""),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_task_updates() {
        let (mut board, user) = signed_in_board();
        let task = board.create_task("p1", NewTask::new("A").assignee(user.id.clone()));

        assert!(board.set_task_status(&task.id, TaskStatus::Done));
        assert_eq!(board.task(&task.id).unwrap().status, TaskStatus::Done);

        assert!(board.set_task_description(&task.id, "new text"));
        assert_eq!(board.task(&task.id).unwrap().description, "new text");

        assert!(board.set_task_assignee(&task.id, ""));
        assert_eq!(board.task(&task.id).unwrap().assignee_id, None);
        assert!(board.assignee_for_task(board.task(&task.id).unwrap()).is_none());

        assert!(board.set_task_assignee(&task.id, &user.id));
        assert_eq!(
            board.assignee_for_task(board.task(&task.id).unwrap()),
            Some(user)
        );
    }

    #[test]
    fn test_unknown_task_updates_are_noops() {
        let mut board = board();
        board.create_task("p1", NewTask::new("A"));
        let before = board.tasks().to_vec();

        assert!(!board.set_task_status("missing", TaskStatus::Done));
        assert!(!board.set_task_assignee("missing", "u1"));
        assert!(!board.set_task_description("missing", "x"));
        assert!(!board.delete_task("missing"));
        assert_eq!(board.tasks(), before.as_slice());
    }

    #[test]
    fn test_delete_task_keeps_comments() {
        let (mut board, _) = signed_in_board();
        let task = board.create_task("p1", NewTask::new("A"));
        let comment = board.add_comment(&task.id, "hi").unwrap().unwrap();

        assert!(board.delete_task(&task.id));
        assert!(board.task(&task.id).is_none());
        assert!(board.tasks_for_project("p1").is_empty());
        assert_eq!(board.comment(&comment.id), Some(&comment));
    }

    #[test]
    fn test_add_comment_signed_out_is_silent_noop() {
        let mut board = board();
        let task = board.create_task("p1", NewTask::new("A"));
        assert_eq!(board.add_comment(&task.id, "hi").unwrap(), None);
        assert_eq!(board.comment_count_for_task(&task.id), 0);
    }

    #[test]
    fn test_add_comment_rejects_blank_text() {
        let (mut board, _) = signed_in_board();
        let task = board.create_task("p1", NewTask::new("A"));
        assert!(matches!(
            board.add_comment(&task.id, "   "),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_comment_author() {
        let (mut board, user) = signed_in_board();
        let task = board.create_task("p1", NewTask::new("A"));
        let comment = board.add_comment(&task.id, "hi").unwrap().unwrap();
        assert_eq!(board.comment_author(&comment), Some(user));
    }

    #[test]
    fn test_import_plan() {
        let mut board = board();
        let plan = vec![
            PlannedTask::new("One", "first", TaskStatus::Todo),
            PlannedTask::new("Two", "second", TaskStatus::InProgress),
        ];
        let created = board.import_plan("p1", &plan);
        assert_eq!(created.len(), 2);
        let titles: Vec<_> = board
            .tasks_for_project("p1")
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["One", "Two"]);
        assert_eq!(board.tasks_by_status("p1", TaskStatus::InProgress).len(), 1);
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let env = TestEnv::new();
        let task_id = {
            let mut board = env.open_board();
            board.register("Alice", "alice@x.com", "pw").unwrap();
            let project = board.create_project("Launch", "").unwrap();
            let task = board.create_task(&project.id, NewTask::new("A"));
            board.set_task_status(&task.id, TaskStatus::InProgress);
            board.add_comment(&task.id, "hi").unwrap();
            task.id
        };

        let board = env.open_board();
        assert!(board.current_user().is_some());
        assert_eq!(board.task(&task_id).unwrap().status, TaskStatus::InProgress);
        assert_eq!(board.comment_count_for_task(&task_id), 1);
    }

    #[test]
    fn test_quota_failure_keeps_in_memory_state() {
        let persistence = Persistence::new(Box::new(MemoryStore::with_quota(64)));
        let mut board = Board::open(persistence, BoardConfig::immediate());
        let task = board.create_task("p1", NewTask::new("A fairly long title for a task"));
        assert!(board.task(&task.id).is_some());
        assert!(board.persistence().load::<Vec<Task>>(TASKS_KEY).is_none());
    }

    #[test]
    fn test_malformed_collection_hydrates_as_empty() {
        let mut store = MemoryStore::new();
        crate::storage::KeyValueStore::set(&mut store, TASKS_KEY, "not json").unwrap();
        let board = Board::open(Persistence::new(Box::new(store)), BoardConfig::immediate());
        assert!(board.tasks().is_empty());
    }

    #[test]
    fn test_malformed_collection_not_seeded_over() {
        let mut store = MemoryStore::new();
        crate::storage::KeyValueStore::set(&mut store, TASKS_KEY, "not json").unwrap();
        let board = Board::open(
            Persistence::new(Box::new(store)),
            BoardConfig::immediate().with_seed_demo_data(true),
        );

        assert!(board.tasks().is_empty());
        assert_eq!(board.projects().len(), 1);
        assert!(board.persistence().load::<Vec<Task>>(TASKS_KEY).is_none());
        assert!(board.persistence().contains(TASKS_KEY));
    }
}

use super::{Output, json};
use crate::models::{Project, TaskStatus};
use crate::views::BoardColumn;
use crate::{Board, Error, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreated {
    pub project: Project,
}

impl Output for ProjectCreated {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Created project {} \"{}\"", self.project.id, self.project.title)
    }
}

pub fn project_create(board: &mut Board, title: &str, description: &str) -> Result<ProjectCreated> {
    let project = board.create_project(title, description)?;
    Ok(ProjectCreated { project })
}

/// A project with its per-column task counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectList {
    pub projects: Vec<ProjectSummary>,
    pub count: usize,
}

impl Output for ProjectList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.projects.is_empty() {
            return "No projects.".to_string();
        }

        let mut lines = vec![format!("{} project(s):", self.count)];
        for summary in &self.projects {
            lines.push(format!(
                "  [{}] {}  (todo {}, in progress {}, done {})",
                summary.project.id,
                summary.project.title,
                summary.todo,
                summary.in_progress,
                summary.done
            ));
        }
        lines.join("\n")
    }
}

pub fn project_list(board: &Board) -> Result<ProjectList> {
    let projects: Vec<ProjectSummary> = board
        .projects()
        .iter()
        .map(|project| ProjectSummary {
            todo: board.tasks_by_status(&project.id, TaskStatus::Todo).len(),
            in_progress: board.tasks_by_status(&project.id, TaskStatus::InProgress).len(),
            done: board.tasks_by_status(&project.id, TaskStatus::Done).len(),
            project: project.clone(),
        })
        .collect();
    let count = projects.len();
    Ok(ProjectList { projects, count })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub project: Project,
    pub columns: Vec<BoardColumn>,
}

impl Output for BoardView {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("{} [{}]", self.project.title, self.project.id)];
        if !self.project.description.is_empty() {
            lines.push(self.project.description.clone());
        }

        for column in &self.columns {
            lines.push(String::new());
            lines.push(format!("{} ({})", column.label, column.cards.len()));
            for card in &column.cards {
                let assignee = card
                    .assignee
                    .as_ref()
                    .map(|u| format!("  @{}", u.name))
                    .unwrap_or_default();
                let comments = match card.comment_count {
                    0 => String::new(),
                    1 => "  1 comment".to_string(),
                    n => format!("  {} comments", n),
                };
                lines.push(format!(
                    "  [{}] {}{}{}",
                    card.task.id, card.task.title, assignee, comments
                ));
            }
        }
        lines.join("\n")
    }
}

pub fn project_board(board: &Board, project_id: &str) -> Result<BoardView> {
    let project = board
        .project(project_id)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("Project {}", project_id)))?;
    Ok(BoardView {
        columns: board.board_columns(project_id),
        project,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoardConfig;

    fn demo_board() -> Board {
        Board::in_memory(BoardConfig::immediate().with_seed_demo_data(true))
    }

    #[test]
    fn test_project_create_requires_sign_in() {
        let mut board = Board::in_memory(BoardConfig::immediate());
        assert!(matches!(
            project_create(&mut board, "Launch", ""),
            Err(Error::NotSignedIn)
        ));
    }

    #[test]
    fn test_project_list_counts() {
        let board = demo_board();
        let list = project_list(&board).unwrap();
        assert_eq!(list.count, 1);
        let summary = &list.projects[0];
        assert_eq!((summary.todo, summary.in_progress, summary.done), (1, 1, 1));
        assert!(list.to_json().contains("\"inProgress\":1"));
    }

    #[test]
    fn test_project_board_human() {
        let board = demo_board();
        let view = project_board(&board, "p1").unwrap();
        let human = view.to_human();

        assert!(human.starts_with("Website Redesign [p1]"));
        let todo = human.find("To Do (1)").unwrap();
        let in_progress = human.find("In Progress (1)").unwrap();
        let done = human.find("Done (1)").unwrap();
        assert!(todo < in_progress && in_progress < done);
        assert!(human.contains("[t2] Design Homepage  @Bob Manager  1 comment"));
    }

    #[test]
    fn test_project_board_unknown() {
        let board = demo_board();
        assert!(matches!(project_board(&board, "nope"), Err(Error::NotFound(_))));
    }
}

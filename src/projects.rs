use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::client::JsonClient;
use crate::error::ApiError;
use crate::types::Project;

/// Relative to the base URL; the trailing slash is part of the route.
const PROJECTS_PATH: &str = "api/backend/projects/";

#[async_trait]
pub trait ProjectsApi: Send + Sync {
    /// List every project visible to the caller, in server order.
    async fn get(&self) -> Result<Vec<Project>, ApiError>;

    /// Find a project by its `projectId`. The backend has no single-project
    /// route, so this scans the full list.
    async fn get_by_id(&self, id: &str) -> Result<Project, ApiError> {
        let projects = self.get().await?;
        find_by_project_id(projects, id)
    }
}

fn find_by_project_id(projects: Vec<Project>, id: &str) -> Result<Project, ApiError> {
    projects
        .into_iter()
        .find(|project| project.project_id == id)
        .ok_or_else(|| ApiError::ProjectNotFound(id.to_string()))
}

pub struct ProjectsClient {
    transport: Arc<JsonClient>,
}

impl ProjectsClient {
    pub fn new(transport: Arc<JsonClient>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ProjectsApi for ProjectsClient {
    async fn get(&self) -> Result<Vec<Project>, ApiError> {
        let projects: Vec<Project> = self.transport.get(PROJECTS_PATH).await?;
        debug!(count = projects.len(), "projects fetched");
        Ok(projects)
    }
}

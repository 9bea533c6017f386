use colored::Colorize;

use crate::error::Result;
use crate::factory::CommandContext;
use crate::output::Renderer;
use crate::types::Project;

const PROJECT_HEADERS: [&str; 4] = ["#", "Name", "Configuration Git Path", "Project id"];
const ENVIRONMENT_HEADERS: [&str; 4] = ["Environment", "Name", "Cluster", "Namespace"];

pub async fn list_projects(ctx: &CommandContext) -> Result<()> {
    let f = ctx.connect()?;
    let projects = f.client().projects.get().await?;

    f.renderer().list(&projects, &PROJECT_HEADERS, |i, project| {
        vec![
            (i + 1).to_string(),
            project.name.clone(),
            project.configuration_git_path.clone(),
            project.project_id.clone(),
        ]
    })?;

    Ok(())
}

pub async fn show_project(ctx: &CommandContext, id: &str) -> Result<()> {
    let f = ctx.connect()?;
    let project = f.client().projects.get_by_id(id).await?;

    f.renderer().item(&project, |r| print_details(r, &project))?;

    Ok(())
}

fn print_details(r: &Renderer, project: &Project) -> std::io::Result<()> {
    let pipeline = if project.pipelines.is_configured() {
        project.pipelines.pipeline_type.as_str()
    } else {
        "none"
    };

    r.line(&format!("{} {}", "Name:".bold(), project.name))?;
    r.line(&format!("{} {}", "Project id:".bold(), project.project_id))?;
    r.line(&format!("{} {}", "Id:".bold(), project.id))?;
    r.line(&format!(
        "{} {}",
        "Configuration Git Path:".bold(),
        project.configuration_git_path
    ))?;
    r.line(&format!("{} {pipeline}", "Pipeline:".bold()))?;

    if project.environments.is_empty() {
        return r.line("No environments");
    }

    r.table(
        &ENVIRONMENT_HEADERS,
        project.environments.iter().map(|env| {
            vec![
                env.env_id.clone(),
                env.display_name.clone(),
                env.cluster.hostname.clone(),
                env.cluster.namespace.clone(),
            ]
        }),
    )
}

use api_types::charity_project::{ProjectNew, ProjectUpdate, ProjectView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{CharityProject, ProjectNewCmd, ProjectUpdateCmd, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn project_view(project: CharityProject) -> ProjectView {
    ProjectView {
        id: project.id,
        name: project.name,
        description: project.description,
        full_amount: project.funding.full_amount,
        invested_amount: project.funding.invested_amount,
        fully_invested: project.funding.fully_invested,
        create_date: project.funding.create_date,
        close_date: project.funding.close_date,
    }
}

/// Public list of every project.
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ProjectView>>, ServerError> {
    let projects = state.engine.list_projects().await?;
    Ok(Json(projects.into_iter().map(project_view).collect()))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<ProjectNew>,
) -> Result<(StatusCode, Json<ProjectView>), ServerError> {
    let cmd = ProjectNewCmd::new(payload.name, payload.description, payload.full_amount);
    let project = state.engine.create_project(cmd, &user.username).await?;
    Ok((StatusCode::CREATED, Json(project_view(project))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProjectUpdate>,
) -> Result<Json<ProjectView>, ServerError> {
    let cmd = ProjectUpdateCmd {
        name: payload.name,
        description: payload.description,
        full_amount: payload.full_amount,
    };
    let project = state.engine.update_project(id, cmd, &user.username).await?;
    Ok(Json(project_view(project)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectView>, ServerError> {
    let project = state.engine.delete_project(id, &user.username).await?;
    Ok(Json(project_view(project)))
}

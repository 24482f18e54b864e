//! Closing-time report of fully funded projects, as CSV.

use std::io::Write;

use axum::{
    Extension,
    extract::State,
    http::header,
    response::IntoResponse,
};
use engine::{CharityProject, EngineError, User};
use serde::Serialize;

use crate::{ServerError, server::ServerState};

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    name: &'a str,
    /// Seconds between creation and closing.
    collection_time: i64,
    description: &'a str,
}

/// Write one row per closed project, in the given order.
///
/// Open projects are skipped.
pub fn write_csv<W: Write>(projects: &[CharityProject], out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    for project in projects {
        let Some(collection_time) = project.collection_time() else {
            continue;
        };
        writer.serialize(ReportRow {
            name: &project.name,
            collection_time: collection_time.num_seconds(),
            description: &project.description,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<impl IntoResponse, ServerError> {
    if !user.is_superuser {
        return Err(EngineError::Forbidden("superuser required".to_string()).into());
    }

    let projects = state.engine.projects_by_completion_rate().await?;
    let mut body = Vec::new();
    write_csv(&projects, &mut body).map_err(|err| ServerError::Internal(err.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"report.csv\"",
            ),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use engine::{Funding, allocate_at};

    use super::*;

    #[test]
    fn closed_projects_become_rows() {
        let created = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut closed = CharityProject::new(
            "Shelter".to_string(),
            "Roof, walls".to_string(),
            10,
            created,
        )
        .unwrap();
        let mut donations = [Funding::new(10, created).unwrap()];
        allocate_at(&mut closed, &mut donations, created + Duration::seconds(90));
        assert!(closed.funding.fully_invested);
        let open =
            CharityProject::new("Food".to_string(), "Bowls".to_string(), 10, created).unwrap();

        let mut out = Vec::new();
        write_csv(&[closed, open], &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,collection_time,description\nShelter,90,\"Roof, walls\"\n"
        );
    }
}

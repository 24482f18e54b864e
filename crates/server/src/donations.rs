use api_types::donation::{DonationAdminView, DonationNew, DonationView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{Donation, DonationNewCmd, User};

use crate::{ServerError, server::ServerState};

fn donation_view(donation: Donation) -> DonationView {
    DonationView {
        id: donation.id,
        full_amount: donation.funding.full_amount,
        comment: donation.comment,
        create_date: donation.funding.create_date,
    }
}

fn donation_admin_view(donation: Donation) -> DonationAdminView {
    DonationAdminView {
        id: donation.id,
        user_id: donation.user_id,
        full_amount: donation.funding.full_amount,
        comment: donation.comment,
        invested_amount: donation.funding.invested_amount,
        fully_invested: donation.funding.fully_invested,
        create_date: donation.funding.create_date,
        close_date: donation.funding.close_date,
    }
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<DonationNew>,
) -> Result<(StatusCode, Json<DonationView>), ServerError> {
    let mut cmd = DonationNewCmd::new(payload.full_amount);
    if let Some(comment) = payload.comment {
        cmd = cmd.comment(comment);
    }
    let donation = state.engine.create_donation(cmd, &user.username).await?;
    Ok((StatusCode::CREATED, Json(donation_view(donation))))
}

/// All donations (superuser only).
pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<DonationAdminView>>, ServerError> {
    let donations = state.engine.list_donations(&user.username).await?;
    Ok(Json(donations.into_iter().map(donation_admin_view).collect()))
}

pub async fn my(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<DonationView>>, ServerError> {
    let donations = state.engine.user_donations(&user.username).await?;
    Ok(Json(donations.into_iter().map(donation_view).collect()))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod charity_project {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct ProjectNew {
        pub name: String,
        pub description: String,
        pub full_amount: i64,
    }

    /// Partial update. Absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct ProjectUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub full_amount: Option<i64>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct ProjectView {
        pub id: Uuid,
        pub name: String,
        pub description: String,
        pub full_amount: i64,
        pub invested_amount: i64,
        pub fully_invested: bool,
        pub create_date: DateTime<Utc>,
        pub close_date: Option<DateTime<Utc>>,
    }
}

pub mod donation {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct DonationNew {
        pub full_amount: i64,
        pub comment: Option<String>,
    }

    /// What a donor sees of their own donation.
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct DonationView {
        pub id: Uuid,
        pub full_amount: i64,
        pub comment: Option<String>,
        pub create_date: DateTime<Utc>,
    }

    /// Full donation record, including how much of it has been invested.
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct DonationAdminView {
        pub id: Uuid,
        pub user_id: String,
        pub full_amount: i64,
        pub comment: Option<String>,
        pub invested_amount: i64,
        pub fully_invested: bool,
        pub create_date: DateTime<Utc>,
        pub close_date: Option<DateTime<Utc>>,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct UserView {
        pub username: String,
        pub is_superuser: bool,
    }
}

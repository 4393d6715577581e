//! Practitioner roster administration.
//!
//! Every operation here is doubly gated: authenticated and administrator.

use crate::auth::RequireAdmin;
use crate::error::AppError;
use crate::server::state::AppState;
use crate::types::{Doctor, DoctorId};
use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for adding a practitioner.
#[derive(Debug, Deserialize)]
pub struct CreateDoctorRequest {
    /// Practitioner name.
    pub name: String,
    /// Specialty (a treatment name).
    pub specialty: String,
    /// Available slot labels.
    pub slots: Vec<String>,
}

/// Roster insertion acknowledgement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorAck {
    /// Whether the record was persisted.
    pub acknowledged: bool,
    /// Identity of the persisted practitioner.
    pub inserted_id: DoctorId,
}

/// Add a practitioner.
pub async fn create_doctor(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<DoctorAck>, AppError> {
    let doctor = Doctor {
        id: DoctorId::new(),
        name: request.name,
        specialty: request.specialty,
        slots: request.slots,
    };
    state.doctors.insert(&doctor).await?;

    Ok(Json(DoctorAck {
        acknowledged: true,
        inserted_id: doctor.id,
    }))
}

/// List all practitioners.
pub async fn list_doctors(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    Ok(Json(state.doctors.list().await?))
}

/// Roster deletion acknowledgement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    /// Whether the delete executed.
    pub acknowledged: bool,
    /// Rows removed (0 when the id matched nothing).
    pub deleted_count: u64,
}

/// Remove a practitioner.
pub async fn delete_doctor(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteAck>, AppError> {
    let deleted_count = state.doctors.delete(DoctorId::from_uuid(id)).await?;

    Ok(Json(DeleteAck {
        acknowledged: true,
        deleted_count,
    }))
}

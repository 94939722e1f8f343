use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{
    models::{ClientModel, ClientRecord, NewPrescription, PrescriptionModel},
    types::ClientRegistration,
};
use crate::program::{
    models::ProgramModel,
    repository::{InMemoryProgramRepository, ProgramRepository},
};
use crate::shared::AppError;

const CLIENT_NOT_FOUND: &str = "Client not found";
const PROGRAM_NOT_FOUND: &str = "Program not found";
const PRESCRIPTION_NOT_FOUND: &str = "Prescription not found";
const DOCTOR_NOT_FOUND: &str = "Doctor not found";

/// Trait for client repository operations.
///
/// Clients are addressed by phone number. Enrollments and prescriptions
/// belong to a client and are removed together with it.
#[async_trait]
pub trait ClientRepository {
    async fn create_client(&self, client: &ClientRegistration) -> Result<ClientModel, AppError>;
    async fn find_client(&self, phonenumber: &str) -> Result<Option<ClientModel>, AppError>;

    /// Reads the client, its programs and its prescriptions from one
    /// consistent snapshot
    async fn client_record(&self, phonenumber: &str) -> Result<Option<ClientRecord>, AppError>;

    async fn list_clients(&self) -> Result<Vec<ClientModel>, AppError>;

    /// Overwrites every field except the phone number. `NotFound` if no
    /// client has that phone number.
    async fn update_client(&self, client: &ClientRegistration) -> Result<(), AppError>;
    async fn delete_client(&self, phonenumber: &str) -> Result<(), AppError>;

    /// Links a client to a program. Nothing is written unless both exist.
    async fn enroll_client(&self, phonenumber: &str, program_name: &str) -> Result<(), AppError>;

    async fn create_prescription(
        &self,
        prescription: &NewPrescription,
    ) -> Result<PrescriptionModel, AppError>;
    async fn update_prescription(
        &self,
        id: i64,
        medicines: &[String],
        date_issued: Option<NaiveDate>,
    ) -> Result<(), AppError>;
    async fn prescriptions_for_client(
        &self,
        phonenumber: &str,
    ) -> Result<Vec<PrescriptionModel>, AppError>;
}

#[derive(Default)]
struct ClientTables {
    clients: Vec<ClientModel>,
    enrollments: Vec<(i64, i64)>, // (client_id, program_id)
    prescriptions: Vec<PrescriptionModel>,
    next_client_id: i64,
    next_prescription_id: i64,
}

impl ClientTables {
    fn client(&self, phonenumber: &str) -> Option<&ClientModel> {
        self.clients.iter().find(|c| c.phonenumber == phonenumber)
    }

    fn prescriptions_for(&self, phonenumber: &str) -> Vec<PrescriptionModel> {
        self.prescriptions
            .iter()
            .filter(|p| p.client_phone == phonenumber)
            .cloned()
            .collect()
    }
}

/// In-memory implementation of ClientRepository used as the test double.
///
/// Program lookups go through the shared in-memory program repository so
/// enrollment sees the same programs as the `/programs` routes.
pub struct InMemoryClientRepository {
    tables: RwLock<ClientTables>,
    programs: Arc<InMemoryProgramRepository>,
}

impl InMemoryClientRepository {
    pub fn new(programs: Arc<InMemoryProgramRepository>) -> Self {
        Self {
            tables: RwLock::new(ClientTables::default()),
            programs,
        }
    }

    pub async fn client_count(&self) -> usize {
        self.tables.read().await.clients.len()
    }

    pub async fn enrollment_count(&self) -> usize {
        self.tables.read().await.enrollments.len()
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    #[instrument(skip(self, client), fields(phonenumber = %client.phonenumber))]
    async fn create_client(&self, client: &ClientRegistration) -> Result<ClientModel, AppError> {
        let mut tables = self.tables.write().await;
        if tables.client(&client.phonenumber).is_some() {
            warn!("Client already exists in memory");
            return Err(AppError::Conflict("Client already exists".to_string()));
        }

        tables.next_client_id += 1;
        let model = ClientModel {
            id: tables.next_client_id,
            firstname: client.firstname.clone(),
            lastname: client.lastname.clone(),
            phonenumber: client.phonenumber.clone(),
            age: client.age,
            height: client.height,
            weight: client.weight,
            emergency_contact: client.emergency_contact.clone(),
            emergency_number: client.emergency_number.clone(),
        };
        tables.clients.push(model.clone());

        debug!(client_id = model.id, "Client created successfully in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn find_client(&self, phonenumber: &str) -> Result<Option<ClientModel>, AppError> {
        Ok(self.tables.read().await.client(phonenumber).cloned())
    }

    #[instrument(skip(self))]
    async fn client_record(&self, phonenumber: &str) -> Result<Option<ClientRecord>, AppError> {
        // The read guard is held across all three reads
        let tables = self.tables.read().await;
        let client = match tables.client(phonenumber) {
            Some(client) => client.clone(),
            None => {
                debug!("Client not found in memory");
                return Ok(None);
            }
        };

        let program_ids: Vec<i64> = tables
            .enrollments
            .iter()
            .filter(|(client_id, _)| *client_id == client.id)
            .map(|(_, program_id)| *program_id)
            .collect();
        let programs = self.programs.programs_by_ids(&program_ids).await;
        let prescriptions = tables.prescriptions_for(phonenumber);

        Ok(Some(ClientRecord {
            client,
            programs,
            prescriptions,
        }))
    }

    #[instrument(skip(self))]
    async fn list_clients(&self) -> Result<Vec<ClientModel>, AppError> {
        Ok(self.tables.read().await.clients.clone())
    }

    #[instrument(skip(self, client), fields(phonenumber = %client.phonenumber))]
    async fn update_client(&self, client: &ClientRegistration) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .clients
            .iter_mut()
            .find(|c| c.phonenumber == client.phonenumber)
            .ok_or_else(|| {
                warn!("Client not found for update in memory");
                AppError::NotFound(CLIENT_NOT_FOUND.to_string())
            })?;

        existing.firstname = client.firstname.clone();
        existing.lastname = client.lastname.clone();
        existing.age = client.age;
        existing.height = client.height;
        existing.weight = client.weight;
        existing.emergency_contact = client.emergency_contact.clone();
        existing.emergency_number = client.emergency_number.clone();

        debug!(client_id = existing.id, "Client updated successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_client(&self, phonenumber: &str) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let client_id = match tables.client(phonenumber) {
            Some(client) => client.id,
            None => {
                warn!("Client not found for deletion in memory");
                return Err(AppError::NotFound(CLIENT_NOT_FOUND.to_string()));
            }
        };

        tables.clients.retain(|c| c.id != client_id);
        tables.enrollments.retain(|(id, _)| *id != client_id);
        tables.prescriptions.retain(|p| p.client_phone != phonenumber);

        debug!(client_id, "Client deleted successfully from memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn enroll_client(&self, phonenumber: &str, program_name: &str) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let client_id = tables
            .client(phonenumber)
            .map(|c| c.id)
            .ok_or_else(|| AppError::NotFound(CLIENT_NOT_FOUND.to_string()))?;

        let program_id = self
            .programs
            .find_by_name(program_name)
            .await?
            .map(|p| p.id)
            .ok_or_else(|| AppError::NotFound(PROGRAM_NOT_FOUND.to_string()))?;

        if tables.enrollments.contains(&(client_id, program_id)) {
            warn!(client_id, program_id, "Client already enrolled in program");
            return Err(AppError::Conflict(
                "Client is already enrolled in this program".to_string(),
            ));
        }
        tables.enrollments.push((client_id, program_id));

        debug!(client_id, program_id, "Client enrolled successfully in memory");
        Ok(())
    }

    #[instrument(skip(self, prescription), fields(client_phone = %prescription.client_phone))]
    async fn create_prescription(
        &self,
        prescription: &NewPrescription,
    ) -> Result<PrescriptionModel, AppError> {
        let mut tables = self.tables.write().await;
        if tables.client(&prescription.client_phone).is_none() {
            return Err(AppError::NotFound(CLIENT_NOT_FOUND.to_string()));
        }

        tables.next_prescription_id += 1;
        let model = PrescriptionModel {
            id: tables.next_prescription_id,
            client_phone: prescription.client_phone.clone(),
            doctor_id: prescription.doctor_id,
            medicines: prescription.medicines.clone(),
            date_issued: prescription.date_issued,
        };
        tables.prescriptions.push(model.clone());

        debug!(prescription_id = model.id, "Prescription created successfully in memory");
        Ok(model)
    }

    #[instrument(skip(self, medicines))]
    async fn update_prescription(
        &self,
        id: i64,
        medicines: &[String],
        date_issued: Option<NaiveDate>,
    ) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .prescriptions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| {
                warn!("Prescription not found for update in memory");
                AppError::NotFound(PRESCRIPTION_NOT_FOUND.to_string())
            })?;

        existing.medicines = medicines.to_vec();
        if let Some(date) = date_issued {
            existing.date_issued = date;
        }

        debug!(prescription_id = id, "Prescription updated successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn prescriptions_for_client(
        &self,
        phonenumber: &str,
    ) -> Result<Vec<PrescriptionModel>, AppError> {
        Ok(self.tables.read().await.prescriptions_for(phonenumber))
    }
}

const CLIENT_COLUMNS: &str =
    "id, firstname, lastname, phonenumber, age, height, weight, emergency_contact, emergency_number";
const PRESCRIPTION_COLUMNS: &str = "id, client_phone, doctor_id, medicines, date_issued";

/// Names the missing side of a prescription foreign key
fn prescription_insert_error(err: sqlx::Error) -> AppError {
    let constraint = err
        .as_database_error()
        .filter(|db_err| db_err.is_foreign_key_violation())
        .and_then(|db_err| db_err.constraint().map(str::to_owned));

    match constraint.as_deref() {
        Some("prescriptions_doctor_id_fkey") => AppError::NotFound(DOCTOR_NOT_FOUND.to_string()),
        Some("prescriptions_client_phone_fkey") => {
            AppError::NotFound(CLIENT_NOT_FOUND.to_string())
        }
        _ => AppError::from(err),
    }
}

/// PostgreSQL implementation of client repository
pub struct PostgresClientRepository {
    pool: PgPool,
}

impl PostgresClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientRepository for PostgresClientRepository {
    #[instrument(skip(self, client), fields(phonenumber = %client.phonenumber))]
    async fn create_client(&self, client: &ClientRegistration) -> Result<ClientModel, AppError> {
        let model = sqlx::query_as::<_, ClientModel>(&format!(
            "INSERT INTO clients (firstname, lastname, phonenumber, age, height, weight, emergency_contact, emergency_number) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(&client.firstname)
        .bind(&client.lastname)
        .bind(&client.phonenumber)
        .bind(client.age)
        .bind(client.height)
        .bind(client.weight)
        .bind(&client.emergency_contact)
        .bind(&client.emergency_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to save client in database");
            match AppError::from(e) {
                AppError::Conflict(_) => AppError::Conflict("Client already exists".to_string()),
                other => other,
            }
        })?;

        debug!(client_id = model.id, "Client created successfully in database");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn find_client(&self, phonenumber: &str) -> Result<Option<ClientModel>, AppError> {
        sqlx::query_as::<_, ClientModel>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE phonenumber = $1"
        ))
        .bind(phonenumber)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to retrieve client");
            AppError::from(e)
        })
    }

    #[instrument(skip(self))]
    async fn client_record(&self, phonenumber: &str) -> Result<Option<ClientRecord>, AppError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            warn!(error = %e, "Failed to begin snapshot transaction");
            AppError::from(e)
        })?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let client = sqlx::query_as::<_, ClientModel>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE phonenumber = $1"
        ))
        .bind(phonenumber)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to retrieve client");
            AppError::from(e)
        })?;

        let client = match client {
            Some(client) => client,
            None => {
                debug!("Client not found in database");
                return Ok(None);
            }
        };

        let programs = sqlx::query_as::<_, ProgramModel>(
            "SELECT p.id, p.name, p.symptoms, p.severity \
             FROM enrollments e JOIN programs p ON e.program_id = p.id \
             WHERE e.client_id = $1 ORDER BY p.id",
        )
        .bind(client.id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to retrieve programs");
            AppError::from(e)
        })?;

        let prescriptions = sqlx::query_as::<_, PrescriptionModel>(&format!(
            "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE client_phone = $1 ORDER BY id"
        ))
        .bind(phonenumber)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to retrieve prescriptions");
            AppError::from(e)
        })?;

        tx.commit().await?;

        Ok(Some(ClientRecord {
            client,
            programs,
            prescriptions,
        }))
    }

    #[instrument(skip(self))]
    async fn list_clients(&self) -> Result<Vec<ClientModel>, AppError> {
        sqlx::query_as::<_, ClientModel>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to retrieve clients");
            AppError::from(e)
        })
    }

    #[instrument(skip(self, client), fields(phonenumber = %client.phonenumber))]
    async fn update_client(&self, client: &ClientRegistration) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE clients SET firstname = $2, lastname = $3, age = $4, height = $5, weight = $6, \
             emergency_contact = $7, emergency_number = $8 WHERE phonenumber = $1",
        )
        .bind(&client.phonenumber)
        .bind(&client.firstname)
        .bind(&client.lastname)
        .bind(client.age)
        .bind(client.height)
        .bind(client.weight)
        .bind(&client.emergency_contact)
        .bind(&client.emergency_number)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to update client");
            AppError::from(e)
        })?;

        if result.rows_affected() == 0 {
            warn!("Client not found for update");
            return Err(AppError::NotFound(CLIENT_NOT_FOUND.to_string()));
        }

        debug!("Client updated successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_client(&self, phonenumber: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE phonenumber = $1")
            .bind(phonenumber)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to delete client");
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            warn!("Client not found for deletion");
            return Err(AppError::NotFound(CLIENT_NOT_FOUND.to_string()));
        }

        debug!("Client deleted successfully from database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn enroll_client(&self, phonenumber: &str, program_name: &str) -> Result<(), AppError> {
        let client_id: i64 = sqlx::query_scalar("SELECT id FROM clients WHERE phonenumber = $1")
            .bind(phonenumber)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Could not look up client by phone number");
                AppError::from(e)
            })?
            .ok_or_else(|| AppError::NotFound(CLIENT_NOT_FOUND.to_string()))?;

        let program_id: i64 = sqlx::query_scalar("SELECT id FROM programs WHERE name = $1")
            .bind(program_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Could not look up program by name");
                AppError::from(e)
            })?
            .ok_or_else(|| AppError::NotFound(PROGRAM_NOT_FOUND.to_string()))?;

        sqlx::query("INSERT INTO enrollments (client_id, program_id) VALUES ($1, $2)")
            .bind(client_id)
            .bind(program_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, client_id, program_id, "Failed to enroll client in program");
                match AppError::from(e) {
                    AppError::Conflict(_) => AppError::Conflict(
                        "Client is already enrolled in this program".to_string(),
                    ),
                    other => other,
                }
            })?;

        debug!(client_id, program_id, "Client enrolled successfully in database");
        Ok(())
    }

    #[instrument(skip(self, prescription), fields(client_phone = %prescription.client_phone))]
    async fn create_prescription(
        &self,
        prescription: &NewPrescription,
    ) -> Result<PrescriptionModel, AppError> {
        let model = sqlx::query_as::<_, PrescriptionModel>(&format!(
            "INSERT INTO prescriptions (client_phone, doctor_id, medicines, date_issued) \
             VALUES ($1, $2, $3, $4) RETURNING {PRESCRIPTION_COLUMNS}"
        ))
        .bind(&prescription.client_phone)
        .bind(prescription.doctor_id)
        .bind(&prescription.medicines)
        .bind(prescription.date_issued)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to save prescription in database");
            prescription_insert_error(e)
        })?;

        debug!(prescription_id = model.id, "Prescription created successfully in database");
        Ok(model)
    }

    #[instrument(skip(self, medicines))]
    async fn update_prescription(
        &self,
        id: i64,
        medicines: &[String],
        date_issued: Option<NaiveDate>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE prescriptions SET medicines = $2, date_issued = COALESCE($3, date_issued) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(medicines.to_vec())
        .bind(date_issued)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to update prescription in database");
            AppError::from(e)
        })?;

        if result.rows_affected() == 0 {
            warn!("Prescription not found for update");
            return Err(AppError::NotFound(PRESCRIPTION_NOT_FOUND.to_string()));
        }

        debug!(prescription_id = id, "Prescription updated successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn prescriptions_for_client(
        &self,
        phonenumber: &str,
    ) -> Result<Vec<PrescriptionModel>, AppError> {
        sqlx::query_as::<_, PrescriptionModel>(&format!(
            "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE client_phone = $1 ORDER BY id"
        ))
        .bind(phonenumber)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to retrieve prescriptions");
            AppError::from(e)
        })
    }
}

use serde::{Deserialize, Serialize};

/// JWT claims carried by a doctor's bearer token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorClaims {
    pub email: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

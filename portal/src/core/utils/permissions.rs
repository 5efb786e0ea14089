use salvo::Depot;

use crate::core::entities::models::Role;
use crate::core::types::errors::access_error::AccessError;
use crate::core::utils::jwt_utils::JwtClaims;

/// Everything a caller may be allowed to do. Each role grants a fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ViewMeetings,
    ManageMeetings,
    ManageUsers,
    ViewAnalytics,
    ViewStatistics,
    UploadRecords,
}

impl Capability {
    pub fn granted_to(self) -> &'static [Role] {
        match self {
            Capability::ViewMeetings => &[Role::Doctor, Role::Admin, Role::Monitoring],
            Capability::ManageMeetings | Capability::ManageUsers | Capability::UploadRecords => {
                &[Role::Admin]
            }
            Capability::ViewAnalytics | Capability::ViewStatistics => {
                &[Role::Admin, Role::Monitoring]
            }
        }
    }

    /// Human readable requirement, e.g. "Admin or monitoring privileges".
    pub fn requirement(self) -> String {
        let roles = self
            .granted_to()
            .iter()
            .map(|role| role.as_str())
            .collect::<Vec<_>>()
            .join(" or ");

        let mut chars = roles.chars();
        match chars.next() {
            Some(first) => format!("{}{} privileges", first.to_uppercase(), chars.as_str()),
            None => "Privileges".to_string(),
        }
    }
}

impl Role {
    pub fn can(self, capability: Capability) -> bool {
        capability.granted_to().contains(&self)
    }
}

/// Returns the caller's claims if their role grants `capability`.
pub fn authorize(depot: &Depot, capability: Capability) -> Result<&JwtClaims, AccessError> {
    let claims = depot
        .obtain::<JwtClaims>()
        .map_err(|_| AccessError::MissingToken)?;

    if claims.role.can(capability) {
        Ok(claims)
    } else {
        Err(AccessError::Forbidden(capability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_table() {
        assert!(Role::Doctor.can(Capability::ViewMeetings));
        assert!(!Role::Doctor.can(Capability::ManageMeetings));
        assert!(!Role::Doctor.can(Capability::ViewAnalytics));
        assert!(!Role::Doctor.can(Capability::ManageUsers));

        assert!(Role::Monitoring.can(Capability::ViewAnalytics));
        assert!(Role::Monitoring.can(Capability::ViewStatistics));
        assert!(!Role::Monitoring.can(Capability::UploadRecords));

        for capability in [
            Capability::ViewMeetings,
            Capability::ManageMeetings,
            Capability::ManageUsers,
            Capability::ViewAnalytics,
            Capability::ViewStatistics,
            Capability::UploadRecords,
        ] {
            assert!(Role::Admin.can(capability), "admin lacks {capability:?}");
        }
    }

    #[test]
    fn test_forbidden_message() {
        assert_eq!(
            AccessError::Forbidden(Capability::ManageUsers).to_string(),
            "Access denied. Admin privileges required."
        );
        assert_eq!(
            AccessError::Forbidden(Capability::ViewAnalytics).to_string(),
            "Access denied. Admin or monitoring privileges required."
        );
    }

    #[test]
    fn test_authorize_reads_claims_from_depot() {
        let mut depot = Depot::new();
        assert_eq!(
            authorize(&depot, Capability::ViewMeetings).unwrap_err(),
            AccessError::MissingToken
        );

        depot.inject(JwtClaims {
            user_id: 3,
            email: "priya@mediguru.com".to_string(),
            role: Role::Doctor,
            exp: 0,
        });

        assert_eq!(authorize(&depot, Capability::ViewMeetings).unwrap().user_id, 3);
        assert_eq!(
            authorize(&depot, Capability::ManageUsers).unwrap_err(),
            AccessError::Forbidden(Capability::ManageUsers)
        );
    }
}

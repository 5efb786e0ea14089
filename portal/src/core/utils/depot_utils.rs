use std::any::type_name;

use salvo::Depot;

use crate::core::types::errors::general::GeneralError;

/// Fetches state injected into the depot by `affix_state` or `set_services`.
pub fn obtain<T: Send + Sync + 'static>(depot: &Depot) -> Result<&T, GeneralError> {
    depot
        .obtain::<T>()
        .map_err(|_| GeneralError::MissingState(type_name::<T>()))
}

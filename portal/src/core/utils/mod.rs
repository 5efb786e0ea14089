pub mod bcrypt_utils;
pub mod depot_utils;
pub mod jwt_utils;
pub mod permissions;
pub mod stats_utils;

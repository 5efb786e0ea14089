//! Loads the starter accounts into an empty database. Safe to run twice:
//! existing emails are left untouched.

use anyhow::Context;
use chrono::Utc;
use diesel::{RunQueryDsl, insert_into};
use portal::core::{
    database::{db::establish_connection, schema::users},
    entities::models::{NewUser, Role},
    env::app_env::AppEnv,
    utils::bcrypt_utils::hash_password,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct SeedUser {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
    department: &'static str,
    registration_number: &'static str,
}

const SEED_USERS: &[SeedUser] = &[
    SeedUser {
        name: "Dr. Amit Verma",
        email: "admin@mediguru.com",
        password: "admin123",
        role: Role::Admin,
        department: "Administration",
        registration_number: "CG/ADMIN/2018/005",
    },
    SeedUser {
        name: "Dr. Rajesh Kumar",
        email: "doctor@mediguru.com",
        password: "doctor123",
        role: Role::Doctor,
        department: "General Medicine",
        registration_number: "CG/MED/2019/001",
    },
    SeedUser {
        name: "Dr. Priya Sharma",
        email: "priya@mediguru.com",
        password: "priya123",
        role: Role::Doctor,
        department: "Pediatrics",
        registration_number: "CG/MED/2020/045",
    },
    SeedUser {
        name: "Dr. Sunita Verma",
        email: "sunita@mediguru.com",
        password: "sunita123",
        role: Role::Doctor,
        department: "Gynecology",
        registration_number: "CG/MED/2021/078",
    },
    SeedUser {
        name: "Dr. Vikram Singh",
        email: "vikram@mediguru.com",
        password: "vikram123",
        role: Role::Doctor,
        department: "Emergency Medicine",
        registration_number: "CG/MED/2022/102",
    },
    SeedUser {
        name: "Dr. Kavita Mishra",
        email: "monitor@mediguru.com",
        password: "monitor123",
        role: Role::Monitoring,
        department: "District Health Office",
        registration_number: "CG/MON/2020/011",
    },
];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let env = AppEnv::new()?;
    let pool = establish_connection(&env)?;
    let mut conn = pool.get().context("Failed to check out a connection")?;
    let now = Utc::now().naive_utc();

    for user in SEED_USERS {
        let password = hash_password(user.password)
            .with_context(|| format!("Failed to hash password for {}", user.email))?;

        let inserted = insert_into(users::table)
            .values(&NewUser {
                name: user.name,
                email: user.email,
                password: &password,
                role: user.role,
                department: Some(user.department),
                registration_number: Some(user.registration_number),
                created_at: now,
                updated_at: now,
            })
            .on_conflict(users::email)
            .do_nothing()
            .execute(&mut conn)
            .with_context(|| format!("Failed to insert {}", user.email))?;

        if inserted > 0 {
            info!(email = user.email, role = %user.role, "Seeded user");
        } else {
            info!(email = user.email, "User already exists, skipped");
        }
    }

    Ok(())
}

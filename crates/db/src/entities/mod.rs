//! `SeaORM` entities of the directory schema.

pub mod accounts;
pub mod memberships;
pub mod teams;

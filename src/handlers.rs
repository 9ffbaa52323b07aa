pub mod anexos;
pub mod auth;
pub mod epmi;
pub mod events;
pub mod finance;
pub mod indicators;
pub mod intercession;
pub mod members;
pub mod ministries;
pub mod missions;
pub mod rbac;

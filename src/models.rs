pub mod anexo;
pub mod auth;
pub mod epmi;
pub mod event;
pub mod finance;
pub mod indicator;
pub mod intercession;
pub mod member;
pub mod ministry;
pub mod mission;
pub mod rbac;

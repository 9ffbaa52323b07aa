pub mod auth;
pub mod indicators;
pub mod indicator_service;
pub mod member_service;
pub mod attendance_service;
pub mod finance_service;
pub mod intercession_service;
pub mod mission_service;
pub mod epmi_service;

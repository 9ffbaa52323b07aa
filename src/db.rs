pub mod user_repo;
pub use user_repo::UserRepository;
pub mod anexo_repo;
pub use anexo_repo::AnexoRepository;
pub mod member_repo;
pub use member_repo::MemberRepository;
pub mod ministry_repo;
pub use ministry_repo::MinistryRepository;
pub mod event_repo;
pub use event_repo::EventRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod intercession_repo;
pub use intercession_repo::IntercessionRepository;
pub mod mission_repo;
pub use mission_repo::MissionRepository;
pub mod epmi_repo;
pub use epmi_repo::EpmiRepository;

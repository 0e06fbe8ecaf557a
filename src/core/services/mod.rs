//! Stateless services that mutate the bank state aggregate.

pub mod account_service;
pub mod job_service;
pub mod notice_service;
pub mod transfer_service;

pub use account_service::AccountService;
pub use job_service::{JobReport, JobService};
pub use notice_service::NoticeService;
pub use transfer_service::{Resolution, TransferOutcome, TransferService};

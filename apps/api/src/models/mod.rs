pub mod application;

pub use application::{ApplicationDraft, ApplicationRecord, Status, UnknownStatus};

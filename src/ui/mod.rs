//! Presentation: plain-text reports and the analytics dashboard

pub mod dashboard;
pub mod report;

//! Services behind a multilingual (English, Arabic, French) real-estate
//! marketing site: content and property catalogs, contact intake with
//! notification fan-out, admin authentication, and SEO metadata resolution.

pub mod auth;
pub mod config;
pub mod contact;
pub mod content;
pub mod error;
pub mod notify;
pub mod pagination;
pub mod property;
pub mod seo;
pub mod telemetry;

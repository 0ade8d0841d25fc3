//! Send web texts (SMS) from the command line through Irish carrier portals.
//!
//! The crate is split the same way the `cliresms` binary uses it: a domain
//! layer of validated types, a transport layer for portal form details, and a
//! client that logs in and posts the send form over one cookie session.
//! Portal URLs and form layouts come from configuration ([`config`]).
//!
//! ```rust,no_run
//! use cliresms::{Carrier, Credentials, MessageText, PortalProfile, Recipient, SendWebText, WebTextClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cliresms::WebTextError> {
//!     let profile = PortalProfile::new("https://portal.example/login", "https://portal.example/send");
//!     let client = WebTextClient::builder(Carrier::Three, Credentials::new("0871234567", "...")?, profile)
//!         .build()?;
//!     let request = SendWebText::new(
//!         vec![Recipient::parse("086 123 4567")?],
//!         MessageText::new("hello")?,
//!         client.profile().max_recipients,
//!     )?;
//!     let _report = client.send(&request, false).await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod descriptor;
pub mod domain;
pub mod install;
pub mod portal;
mod transport;

pub use client::{Credentials, WebTextClient, WebTextClientBuilder, WebTextError};
pub use config::{AppConfig, CarrierAccount, ConfigError};
pub use descriptor::PackageDescriptor;
pub use domain::{
    Carrier, MessageText, Password, PhoneFormat, Recipient, SendReport, SendWebText, Username,
    ValidationError,
};
pub use install::{InstallError, InstallOutcome, install_scripts};
pub use portal::PortalProfile;

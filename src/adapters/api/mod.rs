//! Backend API Adapters
//!
//! HTTP clients for the MindMorph backend, built on a shared [`ApiClient`].
//!
//! - **HttpAuthGateway** - `/auth/login`, `/auth/signup`, `/auth/me`
//! - **QuestionnaireClient**, **TextClient**, **TwitterClient** - submissions
//! - **HttpResultReader** - `/{mode}/result/{id}` and `/{mode}/history`

mod assessment_clients;
mod auth_gateway;
mod client;
mod dto;

pub use assessment_clients::{HttpResultReader, QuestionnaireClient, TextClient, TwitterClient};
pub use auth_gateway::HttpAuthGateway;
pub use client::{ApiClient, Auth, REQUEST_ID_HEADER};

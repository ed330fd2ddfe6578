//! # gameplaza-network
//!
//! 프레즌스 하트비트 HTTP 어댑터.
//! `HeartbeatSender` 포트를 reqwest로 구현한다. 틱마다 인증된 POST 1회.

pub mod heartbeat_client;

pub use heartbeat_client::HttpHeartbeatClient;

//! 전망 계산 로직을 라이브러리로 분리하여 CLI 뿐 아니라 대시보드 등 외부 화면에서도 재사용한다.

pub mod app;
pub mod config;
pub mod finance;
pub mod i18n;
pub mod indicators;
pub mod projection;
pub mod report;

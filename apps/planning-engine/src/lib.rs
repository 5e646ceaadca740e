// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Planning Engine - Rust Core Library
//!
//! Bulk reconciliation and plan-vs-actual analysis engine for the Foresight
//! personal-finance planner.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure value objects and aggregation logic
//!   - `currency`: Single-source currency metadata registry and formatting
//!   - `account`, `category`, `instance`, `reconciliation`: Data model
//!   - `item`: Per-account reconciliation item with submission lifecycle
//!   - `grouping`: Institution grouping and deterministic sort
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Interfaces for the backend services (`CatalogPort`,
//!     `ForecastPort`, `ReconciliationPort`, `SchedulePort`)
//!   - `resolver`: Expected-balance resolution with forecast fallback
//!   - `coordinator`: Concurrent batch submission with isolated outcomes
//!   - `session`: Bulk reconciliation session state
//!
//! - **Analysis**: Plan-vs-actual aggregation
//!   - `types`: Analysis report model
//!   - `calculator`: Category/monthly/summary/trend/recommendation steps
//!   - `service`: Concurrent upstream fetch + calculation
//!
//! - **Infrastructure**: Adapters
//!   - `http`: reqwest client implementing all ports against the REST API

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - Pure value objects and aggregation logic.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Analysis layer - Plan-vs-actual aggregation.
pub mod analysis;

/// Infrastructure layer - Adapters for external services.
pub mod infrastructure;

/// Tracing subscriber setup.
pub mod telemetry;

// Domain re-exports
pub use domain::account::{Account, AccountId, AccountType, FinancialInstitution, InstitutionId};
pub use domain::category::{Category, CategoryType};
pub use domain::currency::{CurrencyInfo, CurrencyRegistry, SymbolPosition};
pub use domain::grouping::{InstitutionGroup, group_and_sort};
pub use domain::instance::ScheduledInstance;
pub use domain::item::{BulkReconciliationItem, DifferenceClass, SubmissionStatus};
pub use domain::reconciliation::{Reconciliation, ReconciliationDraft, ReconciliationSummary};

// Application re-exports
pub use application::coordinator::{BatchOutcome, BatchSubmissionCoordinator};
pub use application::ports::{
    AccountForecast, CatalogPort, ForecastData, ForecastPoint, ForecastPort, ForecastQuery,
    PortError, ReconciliationPort, SchedulePort,
};
pub use application::resolver::{ExpectedBalanceResolver, ResolvedBalances};
pub use application::session::{ReconciliationSession, SessionError};

// Analysis re-exports
pub use analysis::service::AnalysisService;
pub use analysis::types::{
    AnalysisData, AnalysisQuery, AnalysisSummary, CategoryAnalysis, MonthlyMetrics,
    PlanVsActualPoint,
};

// Infrastructure re-exports
pub use infrastructure::http::{ApiConfig, ApiError, ConfigError, PlanningApiClient, RetryConfig};

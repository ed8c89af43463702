#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod controller;
pub mod error;

pub use learn_core::Clock;

pub use api::{
    Advance, ApiCall, HttpLearningApi, InMemoryLearningApi, InjectedFailure, LearningApi,
    SessionSnapshot, StartedRoadmap,
};
pub use config::{ApiConfig, ControllerConfig};
pub use controller::{
    AppState, AssessmentStep, LearningController, NextOutcome, NoteState, Notice, PanelFetch,
    PanelFetcher, PanelState, PanelTicket, PendingActions, ResumeOutcome, StepPanels,
};
pub use error::{ApiError, ControllerError};

//! Integration tests for the draftsmith generation pipeline

mod support;

mod config_loading;
mod orchestrator_flow;
mod repair_loop;

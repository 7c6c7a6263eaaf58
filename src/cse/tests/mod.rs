//! Property tests for the CSE core.

//! View controllers for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each controller owns its view state in `ViewCell`s, its pollers and its
//! notifier subscriptions. A UI shell mounts it when the route renders and
//! unmounts it on teardown; unmounting stops timers, drops subscriptions and
//! closes the cells so in-flight fetches land nowhere.

pub mod connections;
pub mod edit;
pub mod nav;

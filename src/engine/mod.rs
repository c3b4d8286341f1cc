//! # Engine Module
//!
//! Internal kernel implementation.
//!
//! This module contains all core building blocks:
//! - Entity allocation and signatures
//! - Dense component storage
//! - Component type registration
//! - System dispatch and ticking
//! - The owning `World` facade
//!
//! Public API exposure is controlled by `lib.rs`.

pub mod types;
pub mod error;
pub mod entity;
pub mod storage;
pub mod component;
pub mod systems;
pub mod world;

// SPDX-License-Identifier: LGPL-3.0-only
#![warn(missing_docs)]

//! Core library for crumbbar => See `crumbbar` crate.
//!
//! Contains the headless overflow engine, the item data provider and the
//! layout primitives the breadcrumb widgets are built on.

/// Contains the [BreadcrumbConfig](config::BreadcrumbConfig) struct.
pub mod config;

/// Contains the [BreadcrumbCursor](cursor::BreadcrumbCursor) slot traversal.
pub mod cursor;

/// Contains the [OverflowEngine](engine::OverflowEngine) and its host trait.
pub mod engine;

/// Contains the [BreadcrumbError](error::BreadcrumbError) type.
pub mod error;

/// Contains the observable [ItemsSource](items::ItemsSource).
pub mod items;

/// Contains useful types and functions for layout interaction.
pub mod layout;

/// Contains the [ItemDataProvider](provider::ItemDataProvider).
pub mod provider;

pub use config::{BreadcrumbConfig, RetentionPolicy};
pub use engine::{ElementHost, MeasureOutcome, OverflowAction, OverflowEngine, OverflowRegime};
pub use error::{BreadcrumbError, BreadcrumbResult};
pub use items::{CollectionChange, ItemsSource};
pub use provider::ItemDataProvider;

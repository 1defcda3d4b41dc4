//! Common test utilities.
//!
//! Demo modules mirroring a typical deployment: an `Abstractions` module
//! declaring the contracts, and implementations living either next to the
//! contracts or in a `.Platform` module.

#![allow(dead_code)]

use platform_adapter::{ClassDefinition, Contract, Instance, ModuleDefinition, ModuleIdentity, ParamKind};

/// Install a test subscriber honouring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoService {
    pub origin: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    pub offset_minutes: i64,
}

pub fn abstractions() -> ModuleIdentity {
    ModuleIdentity::new("Abstractions")
}

pub fn demo_service_contract() -> Contract {
    Contract::interface(abstractions(), "Abstractions.IDemoService")
}

pub fn unimplemented_contract() -> Contract {
    Contract::interface(abstractions(), "Abstractions.IDemoServiceWithNoImplementation")
}

pub fn clock_contract() -> Contract {
    Contract::interface(abstractions(), "Abstractions.IClock")
}

/// The contracts module with a co-located `DemoService` and no platform module.
pub fn abstractions_module() -> ModuleDefinition {
    ModuleDefinition::new(abstractions()).with_class(
        ClassDefinition::new("Abstractions.DemoService")
            .with_default_constructor(|| DemoService { origin: "abstractions" }),
    )
}

/// A platform module implementing `IDemoService` and `IClock`.
pub fn platform_module() -> ModuleDefinition {
    ModuleDefinition::named("Abstractions.Platform")
        .with_class(
            ClassDefinition::new("Abstractions.DemoService")
                .with_default_constructor(|| DemoService { origin: "platform" }),
        )
        .with_class(
            ClassDefinition::new("Abstractions.Clock")
                .with_default_constructor(|| Clock { offset_minutes: 0 })
                .with_constructor(&[ParamKind::Integer], |args| {
                    let offset_minutes = args[0]
                        .as_i64()
                        .ok_or_else(|| anyhow::anyhow!("offset out of range"))?;
                    Ok(Instance::new("Abstractions.Clock", Clock { offset_minutes }))
                }),
        )
}

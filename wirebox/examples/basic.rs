//! Basic example of the wirebox container.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;
use wirebox::{Container, Definition, Inject, Result};

// === Define your traits and types ===

trait Render: Send + Sync {
    fn render(&self);
}

struct ServiceA {
    data: i32,
}

impl Render for ServiceA {
    fn render(&self) {
        println!("Data: {}", self.data);
    }
}

/// Asks for whatever was registered as "service-a".
#[derive(Default, Inject)]
struct ServiceB {
    #[inject("service-a")]
    service_a: Option<Arc<dyn Render>>,
}

impl Render for ServiceB {
    fn render(&self) {
        println!("Going to render ServiceA");
        if let Some(a) = &self.service_a {
            a.render();
        }
        println!("ServiceA is rendered");
    }
}

fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter("basic=info,wirebox_container=debug")
        .init();

    // Typically an application has exactly one container, filled during start-up
    let mut container = Container::new();

    info!("Wiring services");
    container.register("config", Definition::value(10i32))?;

    // Dependencies can be fetched by name and wired by hand
    let data: i32 = container.get_as("config")?;

    // Exposed as `Arc<dyn Render>` so it fits `ServiceB::service_a`
    container.register(
        "service-a",
        Definition::value(Arc::new(ServiceA { data }))
            .expose(|a: &Arc<ServiceA>| a.clone() as Arc<dyn Render>),
    )?;

    // Registering b also injects service-a into it; we keep a handle
    let b = Arc::new(Mutex::new(ServiceB::default()));
    container.register("service-b", Definition::locked(b.clone()))?;

    info!(registered = container.len(), "Wiring complete");

    b.lock().render();

    println!("Registered: {:?}", container.names());
    Ok(())
}

//! # wirebox
//!
//! Runtime object-graph wiring: register named values and factories, then
//! let the container fill in the annotated fields of whatever it stores.
//!
//! ```
//! use std::sync::Arc;
//! use wirebox::{Container, Definition, Inject};
//!
//! #[derive(Default, Inject)]
//! struct Server {
//!     #[inject("port")]
//!     port: u16,
//!     #[inject("auto")]
//!     name: Option<Arc<str>>,
//! }
//!
//! let mut container = Container::new();
//! container.register("port", Definition::value(8080u16)).unwrap();
//! container.register("name", Definition::value(Arc::<str>::from("edge"))).unwrap();
//! container.register("server", Definition::component(Server::default())).unwrap();
//!
//! let server: Arc<Server> = container.get_as("server").unwrap();
//! assert_eq!(server.port, 8080);
//! assert_eq!(server.name.as_deref(), Some("edge"));
//! ```

pub use wirebox_container::*;
pub use wirebox_derive::*;
pub use wirebox_support;

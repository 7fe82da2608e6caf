pub mod adapter;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod normalize;
pub mod render;
pub mod shell;
pub mod transport;

pub use crate::adapter::{BackendVariant, RequestBody, SummarizationRequest, build_request};
pub use crate::client::SummaryClient;
pub use crate::config::Config;
pub use crate::endpoint::{EndpointConfiguration, EndpointResolver, EndpointSource, SourceKind};
pub use crate::error::{Result, SmartCvError};
pub use crate::normalize::{SummarizationResult, normalize};
pub use crate::render::{BlockKind, RenderBlock, SummaryView, render};
pub use crate::shell::{Outcome, Shell, ShellState};
pub use crate::transport::{HttpTransport, RawResponse, Transport};

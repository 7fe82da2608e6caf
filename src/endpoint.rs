//! Backend base URL resolution from an ordered list of environment sources
use std::fmt;

use serde::Serialize;

use crate::config::EndpointConfig;

pub const FALLBACK_SOURCE: &str = "fallback";

type Lookup = Box<dyn Fn() -> Option<String> + Send + Sync>;

/// How a looked-up value becomes a base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Used verbatim
    Override,
    /// A workspace URL; the backend is exposed on a port-prefixed subdomain of it
    WorkspaceHost { port: u16 },
}

/// One candidate source for the backend URL
pub struct EndpointSource {
    name: String,
    kind: SourceKind,
    lookup: Lookup,
}

impl EndpointSource {
    pub fn new<F>(name: impl Into<String>, kind: SourceKind, lookup: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind,
            lookup: Box::new(lookup),
        }
    }

    /// Source backed by a process environment variable
    pub fn env_var(var: &str, kind: SourceKind) -> Self {
        let key = var.to_string();
        Self::new(var, kind, move || std::env::var(&key).ok())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn candidate(&self) -> Option<String> {
        let raw = (self.lookup)()?;
        if raw.trim().is_empty() {
            return None;
        }
        Some(match self.kind {
            SourceKind::Override => raw,
            SourceKind::WorkspaceHost { port } => workspace_backend_url(&raw, port),
        })
    }
}

impl fmt::Debug for EndpointSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointSource")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// `https://{port}-{host}` where `host` is the workspace URL without its `https://` scheme
pub fn workspace_backend_url(workspace_url: &str, port: u16) -> String {
    let host = workspace_url.strip_prefix("https://").unwrap_or(workspace_url);
    format!("https://{port}-{host}")
}

/// The backend base URL chosen for this session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointConfiguration {
    pub base_url: String,
    /// Name of the source that produced `base_url`
    pub source: String,
}

impl EndpointConfiguration {
    pub fn new(base_url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            source: source.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty()
    }
}

/// Tries each source in priority order; first non-empty value wins
#[derive(Debug)]
pub struct EndpointResolver {
    sources: Vec<EndpointSource>,
    fallback_url: String,
}

impl EndpointResolver {
    pub fn new(sources: Vec<EndpointSource>, fallback_url: impl Into<String>) -> Self {
        Self {
            sources,
            fallback_url: fallback_url.into(),
        }
    }

    /// Override variable first, then the workspace host variable, then the fallback
    pub fn from_config(cfg: &EndpointConfig) -> Self {
        let mut sources = Vec::with_capacity(2);
        if !cfg.override_var.trim().is_empty() {
            sources.push(EndpointSource::env_var(&cfg.override_var, SourceKind::Override));
        }
        if !cfg.workspace_var.trim().is_empty() {
            sources.push(EndpointSource::env_var(
                &cfg.workspace_var,
                SourceKind::WorkspaceHost {
                    port: cfg.backend_port,
                },
            ));
        }
        Self::new(sources, cfg.fallback_url.clone())
    }

    pub fn resolve(&self) -> EndpointConfiguration {
        for source in &self.sources {
            if let Some(base_url) = source.candidate() {
                tracing::info!(source = %source.name(), %base_url, "Resolved backend URL");
                return EndpointConfiguration::new(base_url, source.name());
            }
        }

        if self.fallback_url.trim().is_empty() {
            tracing::warn!("No backend URL source available and no fallback configured");
        } else {
            tracing::warn!("Using default backend URL as fallback: {}", self.fallback_url);
        }
        EndpointConfiguration::new(self.fallback_url.clone(), FALLBACK_SOURCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "http://localhost:8000";

    fn fixed(value: Option<String>) -> impl Fn() -> Option<String> + Send + Sync + 'static {
        move || value.clone()
    }

    fn resolver(override_value: Option<&str>, workspace: Option<&str>) -> EndpointResolver {
        EndpointResolver::new(
            vec![
                EndpointSource::new(
                    "override",
                    SourceKind::Override,
                    fixed(override_value.map(str::to_string)),
                ),
                EndpointSource::new(
                    "workspace",
                    SourceKind::WorkspaceHost { port: 8000 },
                    fixed(workspace.map(str::to_string)),
                ),
            ],
            FALLBACK,
        )
    }

    #[test]
    fn override_wins_over_everything() {
        let r = resolver(
            Some("https://x.example.com"),
            Some("https://workspace123.region.example.io"),
        );
        let cfg = r.resolve();
        assert_eq!(cfg.base_url, "https://x.example.com");
        assert_eq!(cfg.source, "override");
    }

    #[test]
    fn workspace_host_gets_port_prefix() {
        let r = resolver(None, Some("https://workspace123.region.example.io"));
        assert_eq!(
            r.resolve().base_url,
            "https://8000-workspace123.region.example.io"
        );
    }

    #[test]
    fn workspace_host_without_scheme() {
        assert_eq!(
            workspace_backend_url("workspace123.region.example.io", 8000),
            "https://8000-workspace123.region.example.io"
        );
    }

    #[test]
    fn empty_override_is_skipped() {
        let r = resolver(Some("   "), Some("https://ws.example.io"));
        assert_eq!(r.resolve().base_url, "https://8000-ws.example.io");
    }

    #[test]
    fn falls_back_to_localhost() {
        let cfg = resolver(None, None).resolve();
        assert_eq!(cfg.base_url, "http://localhost:8000");
        assert_eq!(cfg.source, FALLBACK_SOURCE);
        assert!(cfg.is_configured());
    }

    #[test]
    fn resolve_is_idempotent() {
        let r = resolver(None, Some("https://ws.example.io"));
        assert_eq!(r.resolve(), r.resolve());
    }

    #[test]
    fn empty_fallback_is_unconfigured() {
        let r = EndpointResolver::new(Vec::new(), "");
        let cfg = r.resolve();
        assert!(!cfg.is_configured());
    }

    #[test]
    fn from_config_skips_blank_variable_names() {
        let cfg = EndpointConfig {
            override_var: String::new(),
            workspace_var: String::new(),
            ..EndpointConfig::default()
        };
        let r = EndpointResolver::from_config(&cfg);
        assert!(r.sources.is_empty());
        assert_eq!(r.resolve().base_url, "http://localhost:8000");
    }
}
